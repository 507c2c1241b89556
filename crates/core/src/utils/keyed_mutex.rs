//! Per-key async mutual exclusion with bounded waiting.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::{Error, Result};

/// A set of independent async mutexes addressed by string key.
///
/// Operations on different keys never contend; operations on the same key are
/// serialized. Acquisition gives up after the supplied timeout instead of
/// waiting indefinitely.
#[derive(Default)]
pub struct KeyedMutex {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Held while a keyed critical section runs. Dropping it releases the key.
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedMutex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str, timeout: Duration) -> Result<KeyGuard> {
        // Clone the Arc out so the DashMap shard lock is released before awaiting.
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match tokio::time::timeout(timeout, mutex.lock_owned()).await {
            Ok(guard) => Ok(KeyGuard { _guard: guard }),
            Err(_) => Err(Error::LockTimeout(key.to_string())),
        }
    }

    /// Number of keys that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_key_times_out_while_held() {
        let locks = KeyedMutex::new();
        let _held = locks.lock("alice", Duration::from_millis(50)).await.unwrap();
        let err = locks
            .lock("alice", Duration::from_millis(20))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::LockTimeout(key) if key == "alice"));
    }

    #[tokio::test]
    async fn test_different_keys_do_not_contend() {
        let locks = KeyedMutex::new();
        let _a = locks.lock("alice", Duration::from_millis(50)).await.unwrap();
        let _b = locks.lock("bob", Duration::from_millis(50)).await.unwrap();
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_key_is_reusable_after_release() {
        let locks = KeyedMutex::new();
        {
            let _g = locks.lock("alice", Duration::from_millis(50)).await.unwrap();
        }
        assert!(locks.lock("alice", Duration::from_millis(50)).await.is_ok());
    }
}
