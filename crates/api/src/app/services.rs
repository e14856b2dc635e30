use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use campusdesk_auth::{AccessTable, Operation, Role};
use campusdesk_core::Record;
use campusdesk_infra::repository::apply_schema;
use campusdesk_infra::{InMemoryRepository, PostgresRepository, Repository, ResourceEndpoint, StoreError};
use campusdesk_records::{HelpRequest, MenuItem, Organization, RecommendationRequest};

/// Endpoint over a type-erased repository, shared across request tasks.
pub type SharedEndpoint<R> = Arc<ResourceEndpoint<R, Arc<dyn Repository<R>>>>;

/// One endpoint per resource type.
#[derive(Clone)]
pub struct AppServices {
    pub help_requests: SharedEndpoint<HelpRequest>,
    pub recommendation_requests: SharedEndpoint<RecommendationRequest>,
    pub organizations: SharedEndpoint<Organization>,
    pub menu_items: SharedEndpoint<MenuItem>,
}

impl AppServices {
    /// In-memory repositories (dev/test). State lives as long as the process.
    pub fn in_memory() -> Self {
        Self::from_repositories(
            Arc::new(InMemoryRepository::<HelpRequest>::new()),
            Arc::new(InMemoryRepository::<RecommendationRequest>::new()),
            Arc::new(InMemoryRepository::<Organization>::new()),
            Arc::new(InMemoryRepository::<MenuItem>::new()),
        )
    }

    /// Postgres repositories sharing one pool. Tables are created if missing.
    pub async fn postgres(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(format!("connect: {e}")))?;

        apply_schema(&pool).await?;

        Ok(Self::from_repositories(
            Arc::new(PostgresRepository::<HelpRequest>::new(pool.clone())),
            Arc::new(PostgresRepository::<RecommendationRequest>::new(pool.clone())),
            Arc::new(PostgresRepository::<Organization>::new(pool.clone())),
            Arc::new(PostgresRepository::<MenuItem>::new(pool)),
        ))
    }

    pub fn from_repositories(
        help_requests: Arc<dyn Repository<HelpRequest>>,
        recommendation_requests: Arc<dyn Repository<RecommendationRequest>>,
        organizations: Arc<dyn Repository<Organization>>,
        menu_items: Arc<dyn Repository<MenuItem>>,
    ) -> Self {
        Self {
            // Only help requests support full-replace update.
            help_requests: endpoint(
                help_requests,
                AccessTable::read_and_create().with(Operation::Replace, Role::ADMIN),
            ),
            recommendation_requests: endpoint(
                recommendation_requests,
                AccessTable::read_and_create(),
            ),
            organizations: endpoint(organizations, AccessTable::read_and_create()),
            menu_items: endpoint(menu_items, AccessTable::read_and_create()),
        }
    }
}

fn endpoint<R: Record>(repo: Arc<dyn Repository<R>>, access: AccessTable) -> SharedEndpoint<R> {
    Arc::new(ResourceEndpoint::new(repo, access))
}
