// Per-key gates so concurrent identical requests share one upstream call
// Author: kelexine (https://github.com/kelexine)

use crate::cache::CacheKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Gate = Arc<AsyncMutex<()>>;

/// Registry of keys with a remote call in progress.
#[derive(Default, Clone)]
pub struct InflightGates {
    gates: Arc<Mutex<HashMap<CacheKey, Gate>>>,
}

impl InflightGates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other holder owns the gate for `key`, then own it.
    pub async fn acquire(&self, key: &CacheKey) -> InflightPermit {
        let gate = {
            let mut gates = self.gates.lock();
            gates.entry(key.clone()).or_default().clone()
        };

        let guard = gate.lock_owned().await;
        InflightPermit {
            key: key.clone(),
            gates: Arc::clone(&self.gates),
            guard: Some(guard),
        }
    }

    /// Number of keys with a live gate
    pub fn len(&self) -> usize {
        self.gates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.lock().is_empty()
    }
}

/// Ownership of one key's gate. Dropping it lets the next waiter in and
/// removes the gate once nobody else references it.
pub struct InflightPermit {
    key: CacheKey,
    gates: Arc<Mutex<HashMap<CacheKey, Gate>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InflightPermit {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut gates = self.gates.lock();
        // Only the map's own reference left: no waiter and no holder
        let idle = gates
            .get(&self.key)
            .map_or(false, |gate| Arc::strong_count(gate) == 1);
        if idle {
            gates.remove(&self.key);
        }
    }
}
