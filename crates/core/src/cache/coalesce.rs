//! Per-key fill locks so concurrent misses trigger a single upstream fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct FillCoalescer {
    inflight: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Fill rights on one key. Dropping it, even mid-await, releases the key and
/// forgets the lock once nobody else holds or waits on it.
#[derive(Debug)]
pub struct FillGuard<'a> {
    coalescer: &'a FillCoalescer,
    key: String,
    held: Option<OwnedMutexGuard<()>>,
}

impl FillCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for exclusive fill rights on `key`.
    pub async fn acquire(&self, key: &str) -> FillGuard<'_> {
        let mut fill = FillGuard { coalescer: self, key: key.to_string(), held: None };
        let lock = Arc::clone(
            self.map()
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        fill.held = Some(lock.lock_owned().await);
        fill
    }

    pub fn inflight_keys(&self) -> usize {
        self.map().len()
    }
}

impl Drop for FillGuard<'_> {
    fn drop(&mut self) {
        drop(self.held.take());
        let mut inflight = self.coalescer.map();
        if inflight.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            inflight.remove(&self.key);
        }
    }
}
