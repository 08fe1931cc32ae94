pub mod disk;
pub mod memory;

use crate::core::prefs::PreferenceStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk preference store, or a process-local one when the data
/// directory cannot be used.
pub fn open_preferences(path: &Path) -> Arc<dyn PreferenceStore> {
    match DiskStore::open(&path.join("prefs")) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Preferences will not be saved");
            Arc::new(MemoryStore::new())
        }
    }
}
