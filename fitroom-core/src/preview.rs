//! Explicit acquire/release pairing for display blobs.
//!
//! A browser would hand out object URLs and revoke them on re-render;
//! here every selection change revokes the superseded handle
//! deterministically, so the number of live handles in a logical slot
//! never exceeds one.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Slot used for the user's person photo.
pub const PERSON_PHOTO_SLOT: &str = "person_photo";

/// Revocable reference enabling display of a locally-held binary.
///
/// Cheap to clone; equality is by identity, so a handle that has been
/// superseded no longer matches the registry and `release` becomes a
/// no-op for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    slot: String,
    id: Uuid,
}

impl PreviewHandle {
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

struct LivePreview {
    id: Uuid,
    data: Arc<Vec<u8>>,
}

/// Registry of live preview handles, at most one per logical slot.
pub struct PreviewRegistry {
    inner: Mutex<HashMap<String, LivePreview>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Produce a display-ready handle for a newly selected binary.
    ///
    /// Any live handle in the same slot is revoked first.
    pub async fn acquire(&self, slot: &str, data: Arc<Vec<u8>>) -> PreviewHandle {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        if let Some(previous) = inner.insert(slot.to_string(), LivePreview { id, data }) {
            debug!("Revoked superseded preview {} in slot {}", previous.id, slot);
        }
        PreviewHandle {
            slot: slot.to_string(),
            id,
        }
    }

    /// Revoke a handle. Releasing an already-released or unknown handle
    /// is a no-op, not an error.
    pub async fn release(&self, handle: &PreviewHandle) {
        let mut inner = self.inner.lock().await;
        let matches = inner
            .get(&handle.slot)
            .map(|live| live.id == handle.id)
            .unwrap_or(false);
        if matches {
            inner.remove(&handle.slot);
            debug!("Released preview {} in slot {}", handle.id, handle.slot);
        }
    }

    /// Read access for presentation; `None` once the handle is revoked.
    pub async fn data(&self, handle: &PreviewHandle) -> Option<Arc<Vec<u8>>> {
        let inner = self.inner.lock().await;
        inner
            .get(&handle.slot)
            .filter(|live| live.id == handle.id)
            .map(|live| live.data.clone())
    }

    /// Number of live handles in a slot (0 or 1).
    pub async fn live_count(&self, slot: &str) -> usize {
        let inner = self.inner.lock().await;
        usize::from(inner.contains_key(slot))
    }

    /// Revoke everything; used on workflow teardown.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.clear();
    }
}

impl Default for PreviewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(bytes: &[u8]) -> Arc<Vec<u8>> {
        Arc::new(bytes.to_vec())
    }

    #[tokio::test]
    async fn repeated_acquire_keeps_one_live_handle() {
        let registry = PreviewRegistry::new();

        let h1 = registry.acquire(PERSON_PHOTO_SLOT, blob(b"a")).await;
        let h2 = registry.acquire(PERSON_PHOTO_SLOT, blob(b"b")).await;
        let h3 = registry.acquire(PERSON_PHOTO_SLOT, blob(b"c")).await;

        assert_eq!(registry.live_count(PERSON_PHOTO_SLOT).await, 1);
        assert!(registry.data(&h1).await.is_none());
        assert!(registry.data(&h2).await.is_none());
        assert_eq!(registry.data(&h3).await.unwrap().as_slice(), b"c".as_slice());
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(PERSON_PHOTO_SLOT, blob(b"a")).await;

        registry.release(&handle).await;
        registry.release(&handle).await;

        assert_eq!(registry.live_count(PERSON_PHOTO_SLOT).await, 0);
    }

    #[tokio::test]
    async fn releasing_a_superseded_handle_keeps_the_current_one() {
        let registry = PreviewRegistry::new();
        let old = registry.acquire(PERSON_PHOTO_SLOT, blob(b"a")).await;
        let current = registry.acquire(PERSON_PHOTO_SLOT, blob(b"b")).await;

        // Stale release must not revoke the live handle.
        registry.release(&old).await;

        assert_eq!(registry.live_count(PERSON_PHOTO_SLOT).await, 1);
        assert_eq!(registry.data(&current).await.unwrap().as_slice(), b"b".as_slice());
    }

    #[tokio::test]
    async fn clear_revokes_everything() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(PERSON_PHOTO_SLOT, blob(b"a")).await;

        registry.clear().await;

        assert_eq!(registry.live_count(PERSON_PHOTO_SLOT).await, 0);
        assert!(registry.data(&handle).await.is_none());
    }
}
