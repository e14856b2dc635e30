//! Record storage boundary.
//!
//! One repository per record type, keyed by the record's key. Implementations
//! own all mutable state; callers share them behind `Arc`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use campusdesk_core::Record;

pub mod in_memory;
pub mod pg_records;
pub mod postgres;

pub use in_memory::InMemoryRepository;
pub use postgres::{PgRecord, PostgresRepository, apply_schema};

/// Storage failure.
///
/// These are infrastructure errors; none of them means "record absent",
/// which is reported as `Ok(None)` by [`Repository::find_by_id`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} requires a client-supplied key")]
    MissingKey(&'static str),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("failed to decode stored row: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Key-value-by-identifier store for one record type.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Every stored record, in backend order.
    async fn find_all(&self) -> Result<Vec<R>, StoreError>;

    /// Persist `record`.
    ///
    /// Assigns a surrogate key when the record has none; otherwise overwrites
    /// whatever is stored under its key.
    async fn save(&self, record: R) -> Result<R, StoreError>;

    async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError>;
}

#[async_trait]
impl<R, S> Repository<R> for Arc<S>
where
    R: Record,
    S: Repository<R> + ?Sized,
{
    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        (**self).find_all().await
    }

    async fn save(&self, record: R) -> Result<R, StoreError> {
        (**self).save(record).await
    }

    async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        (**self).find_by_id(key).await
    }
}
