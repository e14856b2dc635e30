//! Infrastructure layer: record storage and the resource-access pipeline.

pub mod repository;
pub mod resource_endpoint;

pub use repository::{InMemoryRepository, PostgresRepository, Repository, StoreError};
pub use resource_endpoint::{EndpointError, ResourceEndpoint};
