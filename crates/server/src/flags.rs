//! File-backed store for per-item administrative flags.
//!
//! Flags live outside the product cache so a catalog refresh never loses
//! them. The store is one JSON document keyed by item ID, loaded at
//! startup and rewritten on every merge. A missing file is an empty store;
//! a corrupt file is logged and treated as empty rather than blocking
//! startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use sugar_plum_core::{FlagsUpdate, ItemId, ProductFlags};
use thiserror::Error;
use tracing::{info, warn};

/// Errors persisting the flag document.
#[derive(Debug, Error)]
pub enum FlagStoreError {
    #[error("failed to write flag store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode flag store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Flag storage shared across handlers. Cheaply cloneable.
#[derive(Clone)]
pub struct FlagStore {
    inner: Arc<FlagStoreInner>,
}

struct FlagStoreInner {
    path: PathBuf,
    flags: RwLock<HashMap<ItemId, ProductFlags>>,
}

impl FlagStore {
    /// Load the store from `path`, starting empty when the file is missing
    /// or unreadable.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let flags = read_flags(&path);
        info!(path = %path.display(), items = flags.len(), "flag store loaded");

        Self {
            inner: Arc::new(FlagStoreInner {
                path,
                flags: RwLock::new(flags),
            }),
        }
    }

    /// Flags for one item; defaults when the item was never edited.
    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> ProductFlags {
        self.inner
            .flags
            .read()
            .get(item_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge partial updates into the stored flags and persist.
    ///
    /// Items edited for the first time start from defaults; existing
    /// entries keep every field the update does not mention.
    ///
    /// # Errors
    ///
    /// Returns an error when the updated document cannot be written; the
    /// in-memory state is updated regardless, so reads stay consistent
    /// with what the admin saw.
    pub fn merge(&self, updates: &[(ItemId, FlagsUpdate)]) -> Result<(), FlagStoreError> {
        {
            let mut flags = self.inner.flags.write();
            for (item_id, update) in updates {
                flags.entry(item_id.clone()).or_default().merge(update);
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), FlagStoreError> {
        let snapshot = self.inner.flags.read().clone();
        let encoded = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.inner.path, encoded)?;
        Ok(())
    }
}

fn read_flags(path: &Path) -> HashMap<ItemId, ProductFlags> {
    if !path.exists() {
        return HashMap::new();
    }

    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(flags) => flags,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "corrupt flag store, starting empty");
                HashMap::new()
            }
        },
        Err(e) => {
            warn!(error = %e, path = %path.display(), "unreadable flag store, starting empty");
            HashMap::new()
        }
    }
}
