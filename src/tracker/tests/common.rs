use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::storage::{MemoryStore, StateStore, StoreError, APPLICATIONS_KEY};
use crate::tracker::{ApplicationTracker, SeedSource, StoredApplication};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn tracker<S: StateStore>(store: Arc<S>) -> ApplicationTracker<S> {
    ApplicationTracker::builder(store).clock(fixed_now).build()
}

pub(super) fn mock_tracker<S: StateStore>(store: Arc<S>) -> ApplicationTracker<S> {
    ApplicationTracker::builder(store)
        .seed(SeedSource::Mock)
        .clock(fixed_now)
        .build()
}

pub(super) fn stored_applications<S: StateStore>(store: &S) -> Vec<StoredApplication> {
    let raw = store
        .get(APPLICATIONS_KEY)
        .expect("read applications")
        .expect("applications persisted");
    serde_json::from_str(&raw).expect("stored applications parse")
}

/// Memory store whose writes can be switched off.
#[derive(Debug, Default)]
pub(super) struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub(super) fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }
}

impl StateStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove(key)
    }
}
