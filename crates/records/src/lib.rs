//! Campus resource records.
//!
//! Each module defines one persisted record, the draft a client submits to
//! create it, and its [`Record`](campusdesk_core::Record) implementation.
//! JSON field names are camelCase; timestamps are ISO-8601 local date-times
//! (`2022-01-03T00:00:00`).

pub mod help_request;
pub mod menu_item;
pub mod organization;
pub mod recommendation_request;
pub mod timestamp;

pub use help_request::{HelpRequest, HelpRequestDraft};
pub use menu_item::{MenuItem, MenuItemDraft};
pub use organization::{Organization, OrganizationDraft};
pub use recommendation_request::{RecommendationRequest, RecommendationRequestDraft};
