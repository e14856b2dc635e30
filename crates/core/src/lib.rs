//! `campusdesk-core` — record and identifier building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::{OrgCode, RecordId};
pub use record::{Record, RecordKey};
