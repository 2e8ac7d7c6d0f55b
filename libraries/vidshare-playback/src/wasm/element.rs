//! `web-sys` implementations of the playback capabilities

use crate::{FullscreenHost, MediaElement, PlaybackError, Result};
use wasm_bindgen::prelude::*;
use web_sys::{console, Document, Element, HtmlMediaElement};

/// `<video>`/`<audio>` element
#[derive(Clone)]
pub struct DomMediaElement {
    element: HtmlMediaElement,
}

impl DomMediaElement {
    pub fn new(element: HtmlMediaElement) -> Self {
        Self { element }
    }

    /// Underlying DOM element
    pub fn inner(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl MediaElement for DomMediaElement {
    fn play(&mut self) -> Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::environment(describe(&e)))?;

        // An autoplay refusal rejects the promise and no `play` event follows
        let on_reject = Closure::<dyn FnMut(JsValue)>::new(|err: JsValue| {
            console::warn_2(&JsValue::from_str("Playback refused:"), &err);
        });
        let _ = promise.catch(&on_reject);
        on_reject.forget();
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(err) = self.element.pause() {
            console::warn_2(&JsValue::from_str("Pause failed:"), &err);
        }
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }
}

/// Fullscreen API on a player container
pub struct DocumentFullscreen {
    document: Document,
    container: Element,
}

impl DocumentFullscreen {
    pub fn new(document: Document, container: Element) -> Self {
        Self {
            document,
            container,
        }
    }
}

impl FullscreenHost for DocumentFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.document.fullscreen_element().is_some()
    }

    fn request_fullscreen(&mut self) -> Result<()> {
        self.container
            .request_fullscreen()
            .map_err(|e| PlaybackError::environment(describe(&e)))
    }

    fn exit_fullscreen(&mut self) -> Result<()> {
        self.document.exit_fullscreen();
        Ok(())
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
