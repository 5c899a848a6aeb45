// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Temporary preview references for uploaded photos
//!
//! Every accepted file gets one entry in the registry, owned by a
//! [`PreviewHandle`]. Dropping the handle releases the entry, so a preview
//! lives exactly as long as the photo that owns it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;
use uuid::Uuid;

/// Bytes served for one preview
#[derive(Debug, Clone)]
pub struct Preview {
    pub mime: String,
    pub bytes: Arc<Vec<u8>>,
}

/// Shared table of live previews; clones see the same entries
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<HashMap<Uuid, Preview>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock leaves the map itself intact.
    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Preview>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register bytes and return the handle that owns them
    pub fn create(&self, mime: impl Into<String>, bytes: Vec<u8>) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.entries().insert(
            id,
            Preview {
                mime: mime.into(),
                bytes: Arc::new(bytes),
            },
        );
        trace!("Preview {} created", id);
        PreviewHandle {
            id,
            registry: self.clone(),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Preview> {
        self.entries().get(id).cloned()
    }

    /// Number of previews not yet released
    pub fn live_count(&self) -> usize {
        self.entries().len()
    }

    fn release(&self, id: &Uuid) {
        if self.entries().remove(id).is_some() {
            trace!("Preview {} released", id);
        }
    }
}

/// Owner of one registry entry
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path the preview is served from
    pub fn url(&self) -> String {
        format!("/photos/preview/{}", self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}
