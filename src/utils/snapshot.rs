// Shared dataset holder with replace-whole-snapshot semantics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::models::Dataset;

/// Holds the current price snapshot for concurrent readers.
///
/// Readers clone an `Arc` to the snapshot and keep it for the whole
/// optimization call. A refresh swaps in a complete new dataset; rows of a
/// published snapshot are never edited.
#[derive(Debug)]
pub struct SharedDataset {
    current: RwLock<Arc<Dataset>>,
    version: AtomicU64,
}

impl SharedDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
            version: AtomicU64::new(1),
        }
    }

    /// The snapshot readers should use for their next call
    pub fn current(&self) -> Arc<Dataset> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            // A writer only ever stores a complete Arc, so the value is intact
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Publishes a new snapshot and returns the one it replaced
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let next = Arc::new(dataset);
        let rows = next.len();
        let previous = match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        };
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        info!(version, rows, "published new price snapshot");
        previous
    }

    /// Number of snapshots published so far, starting at 1
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}
