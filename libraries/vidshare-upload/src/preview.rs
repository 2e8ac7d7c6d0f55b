//! Local preview URLs for selected files
//!
//! Every preview URL handed out by a [`PreviewUrls`] backend is owned by
//! exactly one [`PreviewHandle`]; dropping the handle revokes the URL.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};
use uuid::Uuid;
use vidshare_core::MediaFile;

/// Allocates and revokes local preview URLs (object URLs in a browser)
pub trait PreviewUrls: Send + Sync {
    /// Allocate a URL that renders `file` locally
    fn create(&self, file: &MediaFile) -> String;

    /// Release a URL previously returned by [`create`](Self::create)
    fn revoke(&self, url: &str);
}

impl fmt::Debug for dyn PreviewUrls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PreviewUrls")
    }
}

/// Owned preview URL, revoked on drop
pub struct PreviewHandle {
    url: String,
    urls: Arc<dyn PreviewUrls>,
}

impl PreviewHandle {
    /// Allocate a preview URL for `file`
    pub fn allocate(urls: &Arc<dyn PreviewUrls>, file: &MediaFile) -> Self {
        let url = urls.create(file);
        debug!(url = %url, file = %file.name, "Allocated preview URL");
        Self {
            url,
            urls: Arc::clone(urls),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        debug!(url = %self.url, "Revoking preview URL");
        self.urls.revoke(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

/// In-process preview URL registry
///
/// Used by native hosts and tests. Tracks which URLs are live so leaks and
/// double revocations are observable.
#[derive(Debug, Default)]
pub struct LocalPreviewUrls {
    live: Mutex<HashSet<String>>,
    created: AtomicUsize,
}

impl LocalPreviewUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs allocated and not yet revoked
    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    /// Total number of URLs ever allocated
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live().contains(url)
    }

    fn live(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreviewUrls for LocalPreviewUrls {
    fn create(&self, _file: &MediaFile) -> String {
        let url = format!("blob:vidshare/{}", Uuid::new_v4());
        self.live().insert(url.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        url
    }

    fn revoke(&self, url: &str) {
        if !self.live().remove(url) {
            warn!(url = %url, "Revoked a preview URL that was not live");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> (Arc<LocalPreviewUrls>, Arc<dyn PreviewUrls>) {
        let local = Arc::new(LocalPreviewUrls::new());
        let dynamic: Arc<dyn PreviewUrls> = local.clone();
        (local, dynamic)
    }

    #[test]
    fn drop_revokes_url() {
        let (local, urls) = backend();
        let file = MediaFile::new("a.png", "image/png", vec![1u8]);

        let handle = PreviewHandle::allocate(&urls, &file);
        let url = handle.url().to_string();
        assert!(url.starts_with("blob:"));
        assert!(local.is_live(&url));

        drop(handle);
        assert!(!local.is_live(&url));
        assert_eq!(local.live_count(), 0);
        assert_eq!(local.created_count(), 1);
    }

    #[test]
    fn urls_are_unique() {
        let (local, urls) = backend();
        let file = MediaFile::new("a.png", "image/png", vec![1u8]);

        let first = PreviewHandle::allocate(&urls, &file);
        let second = PreviewHandle::allocate(&urls, &file);
        assert_ne!(first.url(), second.url());
        assert_eq!(local.live_count(), 2);
    }

    #[test]
    fn replacing_a_slot_releases_previous_handle() {
        let (local, urls) = backend();
        let file = MediaFile::new("a.png", "image/png", vec![1u8]);

        let mut slot = Some(PreviewHandle::allocate(&urls, &file));
        let old = slot.as_ref().map(|h| h.url().to_string()).unwrap();
        slot = Some(PreviewHandle::allocate(&urls, &file));

        assert!(!local.is_live(&old));
        assert_eq!(local.live_count(), 1);
        drop(slot);
        assert_eq!(local.live_count(), 0);
    }
}
