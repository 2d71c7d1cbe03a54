//! Scoped preview references for a selected photo.
//!
//! A [`PreviewHandle`] is the only way to keep a preview alive: it registers
//! the image bytes with a [`PreviewRegistry`] on creation and unregisters them
//! when dropped. Replacing, clearing or rejecting a selection drops the old
//! handle, so there is no path that leaves a stale preview behind.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use base64::{Engine as _, engine::general_purpose};
use tracing::trace;

const SCHEME: &str = "preview://";

#[derive(Debug)]
struct Entry {
    mime_type: String,
    bytes: Arc<Vec<u8>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, Entry>>,
}

/// Table of live previews, shared between the pipeline and the view that
/// displays them.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Inner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn live(&self) -> MutexGuard<'_, HashMap<u64, Entry>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.inner.live.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `bytes` and return the handle that owns the registration.
    pub fn create(&self, bytes: Arc<Vec<u8>>, mime_type: impl Into<String>) -> PreviewHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live().insert(
            id,
            Entry {
                mime_type: mime_type.into(),
                bytes,
            },
        );
        trace!(id, "preview created");
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Number of previews currently alive.
    pub fn live_count(&self) -> usize {
        self.live().len()
    }

    /// Look up the bytes behind a `preview://` reference.
    pub fn resolve(&self, url: &str) -> Option<(String, Arc<Vec<u8>>)> {
        let id: u64 = url.strip_prefix(SCHEME)?.parse().ok()?;
        self.live()
            .get(&id)
            .map(|entry| (entry.mime_type.clone(), Arc::clone(&entry.bytes)))
    }

    fn release(&self, id: u64) {
        if self.live().remove(&id).is_some() {
            trace!(id, "preview released");
        }
    }
}

/// Owned registration of one preview. Dropping it releases the preview.
pub struct PreviewHandle {
    id: u64,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// Reference usable with [`PreviewRegistry::resolve`].
    pub fn url(&self) -> String {
        format!("{}{}", SCHEME, self.id)
    }

    /// Inline `data:` URL for viewers that cannot resolve `preview://`.
    pub fn data_url(&self) -> Option<String> {
        let (mime_type, bytes) = self.registry.resolve(&self.url())?;
        Some(format!(
            "data:{};base64,{}",
            mime_type,
            general_purpose::STANDARD.encode(bytes.as_slice())
        ))
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}
