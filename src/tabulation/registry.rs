//! Process-wide store of tabulations, keyed by the settings hash of the method that built them.
use super::TabulationCache;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

type Slot = Arc<OnceLock<Arc<TabulationCache>>>;

lazy_static! {
    static ref TABULATIONS: Mutex<HashMap<u64, Slot>> = Mutex::new(HashMap::new());
}

fn slot(hash: u64) -> Slot {
    let mut tabulations = TABULATIONS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    tabulations.entry(hash).or_default().clone()
}

/// Get the tabulation stored under `hash`, building it with `build` if it does not exist yet.
///
/// `build` runs at most once per hash, even if several threads ask for the same tabulation
/// at the same time. The lock on the store is not held while building.
pub fn shared_tabulation<F: FnOnce() -> TabulationCache>(
    hash: u64,
    build: F,
) -> Arc<TabulationCache> {
    slot(hash)
        .get_or_init(|| {
            debug!("Building tabulation {hash:016x}");
            Arc::new(build())
        })
        .clone()
}

/// Remove all stored tabulations.
///
/// Tabulations that are still referenced elsewhere stay alive until they are dropped.
pub fn clear_shared_tabulations() {
    TABULATIONS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clear();
}
