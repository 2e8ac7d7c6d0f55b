//! WASM-compatible player wrapper

use super::element::{describe, DocumentFullscreen, DomMediaElement};
use crate::{MediaEvent, PlaybackController, PlayerConfig, PlayerEvent};
use js_sys::Function;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element, Event, EventTarget, HtmlMediaElement};

type Controller = PlaybackController<DomMediaElement, DocumentFullscreen>;

const MEDIA_EVENTS: [&str; 7] = [
    "loadedmetadata",
    "timeupdate",
    "play",
    "pause",
    "waiting",
    "playing",
    "ended",
];

const POINTER_EVENTS: [&str; 2] = ["mousemove", "click"];

/// State shared between the player handle and its DOM callbacks
struct Shared {
    controller: RefCell<Controller>,
    on_change: RefCell<Option<Function>>,
    on_ended: RefCell<Option<Function>>,

    // Hide-controls timeout
    hide_timer: Cell<Option<i32>>,
    scheduled_deadline: Cell<Option<Duration>>,
    hide_callback: RefCell<Option<Closure<dyn FnMut()>>>,
    // The closure that last fired; kept alive until the next one fires
    fired_callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// DOM listener removed on drop
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// WASM-compatible video player
///
/// Wraps the core controller and owns every DOM subscription it creates.
/// Dropping (or `free()` from JavaScript) unmounts the player.
#[wasm_bindgen]
pub struct WasmVideoPlayer {
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WasmVideoPlayer {
    /// Mount a player on `video` inside `container`
    ///
    /// `config` is an optional `PlayerConfig`-shaped object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        src: String,
        video: HtmlMediaElement,
        container: Element,
        config: JsValue,
    ) -> Result<WasmVideoPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid player config: {}", e)))?
        };

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let controller = PlaybackController::new(
            src,
            DomMediaElement::new(video.clone()),
            DocumentFullscreen::new(document.clone(), container.clone()),
            config,
        );

        let shared = Rc::new(Shared {
            controller: RefCell::new(controller),
            on_change: RefCell::new(None),
            on_ended: RefCell::new(None),
            hide_timer: Cell::new(None),
            scheduled_deadline: Cell::new(None),
            hide_callback: RefCell::new(None),
            fired_callback: RefCell::new(None),
        });

        let mut listeners = Vec::new();

        for kind in MEDIA_EVENTS {
            let weak = Rc::downgrade(&shared);
            let element = video.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                let event = match kind {
                    "loadedmetadata" => MediaEvent::LoadedMetadata {
                        duration: element.duration(),
                    },
                    "timeupdate" => MediaEvent::TimeUpdate {
                        current_time: element.current_time(),
                    },
                    "play" => MediaEvent::Play,
                    "pause" => MediaEvent::Pause,
                    "waiting" => MediaEvent::Waiting,
                    "playing" => MediaEvent::Playing,
                    _ => MediaEvent::Ended,
                };
                dispatch(&weak, event);
            });
            listeners.push(listen(video.clone().into(), kind, callback)?);
        }

        {
            let weak = Rc::downgrade(&shared);
            let doc = document.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                dispatch(
                    &weak,
                    MediaEvent::FullscreenChange {
                        is_fullscreen: doc.fullscreen_element().is_some(),
                    },
                );
            });
            listeners.push(listen(document.into(), "fullscreenchange", callback)?);
        }

        for kind in POINTER_EVENTS {
            let weak = Rc::downgrade(&shared);
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                if let Some(shared) = weak.upgrade() {
                    shared.controller.borrow_mut().pointer_activity(now());
                    after_update(&shared);
                }
            });
            listeners.push(listen(container.clone().into(), kind, callback)?);
        }

        Ok(Self { shared, listeners })
    }

    // ===== Transport =====

    /// Play if paused, pause if playing
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&mut self) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().toggle_play();
        self.finish(result)
    }

    /// Seek to a percentage (0-100)
    pub fn seek(&mut self, percent: f64) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().seek(percent);
        self.finish(result)
    }

    /// Move by `seconds` (negative rewinds)
    pub fn skip(&mut self, seconds: f64) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().skip(seconds);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = skipForward)]
    pub fn skip_forward(&mut self) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().skip_forward();
        self.finish(result)
    }

    #[wasm_bindgen(js_name = skipBackward)]
    pub fn skip_backward(&mut self) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().skip_backward();
        self.finish(result)
    }

    // ===== Volume =====

    /// Set volume (0-100)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, percent: f64) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().set_volume(percent);
        self.finish(result)
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().toggle_mute();
        self.finish(result)
    }

    /// Enter or leave fullscreen
    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&mut self) -> Result<(), JsValue> {
        let result = self.shared.controller.borrow_mut().toggle_fullscreen();
        self.finish(result)
    }

    // ===== State =====

    /// Current `PlaybackState` as a plain object
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.shared.controller.borrow().state();
        serde_wasm_bindgen::to_value(&state)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Whether the overlay should be drawn
    #[wasm_bindgen(js_name = controlsShown)]
    pub fn controls_shown(&self) -> bool {
        self.shared.controller.borrow().controls_shown()
    }

    /// `m:ss / m:ss`
    #[wasm_bindgen(js_name = timeLabel)]
    pub fn time_label(&self) -> String {
        self.shared.controller.borrow().time_label()
    }

    /// Value for the volume slider
    #[wasm_bindgen(js_name = volumeDisplayPercent)]
    pub fn volume_display_percent(&self) -> f64 {
        self.shared.controller.borrow().volume_display_percent()
    }

    // ===== Callbacks =====

    /// Register a callback receiving each `PlayerEvent`
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        *self.shared.on_change.borrow_mut() = Some(callback);
    }

    /// Register the ended callback
    #[wasm_bindgen(js_name = onEnded)]
    pub fn on_ended(&mut self, callback: Function) {
        *self.shared.on_ended.borrow_mut() = Some(callback);
    }

    /// Remove every listener and cancel the hide timer
    pub fn unmount(&mut self) {
        self.shared.controller.borrow_mut().unmount();
        clear_hide_timer(&self.shared);
        self.listeners.clear();
        self.shared.on_change.borrow_mut().take();
        self.shared.on_ended.borrow_mut().take();
    }

    fn finish(&self, result: crate::Result<()>) -> Result<(), JsValue> {
        after_update(&self.shared);
        result.map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Drop for WasmVideoPlayer {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn listen(
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
) -> Result<Listener, JsValue> {
    target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
    Ok(Listener {
        target,
        kind,
        callback,
    })
}

fn dispatch(weak: &Weak<Shared>, event: MediaEvent) {
    if let Some(shared) = weak.upgrade() {
        shared.controller.borrow_mut().handle_event(event);
        after_update(&shared);
    }
}

/// Deliver pending events and keep the timeout in step with the controller
fn after_update(shared: &Rc<Shared>) {
    flush_events(shared);
    sync_hide_timer(shared);
}

fn flush_events(shared: &Shared) {
    // Callbacks run with no borrow held so they may call back into the player
    let events = shared.controller.borrow_mut().drain_events();
    if events.is_empty() {
        return;
    }

    let on_change = shared.on_change.borrow().clone();
    let on_ended = shared.on_ended.borrow().clone();

    for event in &events {
        if let Some(callback) = &on_change {
            match serde_wasm_bindgen::to_value(event) {
                Ok(value) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                        console::warn_2(&JsValue::from_str("onChange threw:"), &err);
                    }
                }
                Err(e) => console::warn_1(&JsValue::from_str(&e.to_string())),
            }
        }

        if *event == PlayerEvent::Ended {
            if let Some(callback) = &on_ended {
                if let Err(err) = callback.call0(&JsValue::NULL) {
                    console::warn_2(&JsValue::from_str("onEnded threw:"), &err);
                }
            }
        }
    }
}

fn sync_hide_timer(shared: &Rc<Shared>) {
    let deadline = shared.controller.borrow().next_hide_deadline();
    if deadline == shared.scheduled_deadline.get() {
        return;
    }

    clear_hide_timer(shared);

    let Some(deadline) = deadline else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };

    // Round up so the tick never lands before the deadline
    let delay_ms = deadline.saturating_sub(now()).as_millis() as i32 + 1;

    let weak = Rc::downgrade(shared);
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some(shared) = weak.upgrade() {
            // This closure is running; it must not be dropped by a re-arm
            let running = shared.hide_callback.borrow_mut().take();
            *shared.fired_callback.borrow_mut() = running;
            shared.hide_timer.set(None);
            shared.scheduled_deadline.set(None);
            shared.controller.borrow_mut().tick(now());
            // An early tick leaves the deadline pending
            after_update(&shared);
        }
    });

    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        delay_ms,
    ) {
        Ok(handle) => {
            shared.hide_timer.set(Some(handle));
            shared.scheduled_deadline.set(Some(deadline));
            *shared.hide_callback.borrow_mut() = Some(callback);
        }
        Err(err) => console::warn_1(&JsValue::from_str(&describe(&err))),
    }
}

fn clear_hide_timer(shared: &Shared) {
    if let Some(handle) = shared.hide_timer.take() {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle);
        }
    }
    shared.scheduled_deadline.set(None);
    shared.hide_callback.borrow_mut().take();
}

fn now() -> Duration {
    let millis = web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now());
    Duration::from_secs_f64(millis / 1000.0)
}
