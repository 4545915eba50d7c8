//! Per-aggregate command serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Hands out one async mutex per aggregate so that load, command, save and
/// publish run as a unit for a given id.
#[derive(Default)]
pub struct AggregateLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AggregateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `kind`/`id`. Released when the guard drops.
    pub async fn acquire(&self, kind: &'static str, id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(format!("{kind}:{id}"))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        lock.lock_owned().await
    }

    /// Forget locks nobody holds or waits on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
