use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use campusdesk_core::{Record, RecordKey};

use super::{Repository, StoreError};

/// In-memory repository for tests/dev.
///
/// Surrogate keys come from a per-repository sequence starting at 1.
#[derive(Debug)]
pub struct InMemoryRepository<R: Record> {
    records: RwLock<BTreeMap<R::Key, R>>,
    sequence: AtomicI64,
}

impl<R: Record> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            sequence: AtomicI64::new(0),
        }
    }

    fn assign_key(&self, record: R) -> Result<(R::Key, R), StoreError> {
        if let Some(key) = record.key() {
            let key = key.clone();
            // Keep the sequence ahead of explicitly keyed surrogate records.
            if let Some(seq) = key.as_sequence() {
                self.sequence.fetch_max(seq, Ordering::SeqCst);
            }
            return Ok((key, record));
        }

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let key = R::Key::from_sequence(seq).ok_or(StoreError::MissingKey(R::RESOURCE_TYPE))?;
        Ok((key.clone(), record.with_key(key)))
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        let map = self.records.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    async fn save(&self, record: R) -> Result<R, StoreError> {
        let (key, record) = self.assign_key(record)?;
        let mut map = self.records.write().map_err(poisoned)?;
        map.insert(key, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let map = self.records.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }
}
