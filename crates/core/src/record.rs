//! Record trait: a persisted resource with a stable key.

use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::str::FromStr;

use crate::error::DomainError;

/// Key type of a record.
///
/// Surrogate keys can be minted from a store sequence; natural keys cannot and
/// must arrive with the record.
pub trait RecordKey:
    Clone + Eq + Ord + Hash + Debug + Display + FromStr<Err = DomainError> + Send + Sync + 'static
{
    /// Build a key from a store-assigned sequence value (`None` for natural keys).
    fn from_sequence(seq: i64) -> Option<Self>;

    /// Sequence value carried by this key, if it is a surrogate.
    fn as_sequence(&self) -> Option<i64>;
}

/// A flat, persisted resource.
///
/// The key is immutable once assigned; every other attribute is replaceable.
pub trait Record: Clone + Debug + Send + Sync + 'static {
    type Key: RecordKey;

    /// Values a client supplies to create a record.
    type Draft: Send + 'static;

    /// Resource type name used in not-found messages.
    const RESOURCE_TYPE: &'static str;

    /// Current key (`None` until a surrogate key has been assigned).
    fn key(&self) -> Option<&Self::Key>;

    /// Return the record with its key set to `key`.
    fn with_key(self, key: Self::Key) -> Self;

    /// Assemble a new record from a draft. Surrogate keys are left unset.
    fn from_draft(draft: Self::Draft) -> Self;
}
