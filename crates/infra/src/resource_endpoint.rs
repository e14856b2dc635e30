//! Resource access pipeline (application-level orchestration).
//!
//! `ResourceEndpoint` runs one logical operation against a repository:
//!
//! ```text
//! Request (caller roles + typed input)
//!   ↓
//! 1. Guard: caller roles vs. the operation's required role (AccessTable)
//!   ↓
//! 2. Repository call(s): find_all / save / find_by_id
//!   ↓
//! 3. Outcome: record(s), Forbidden, NotFound { type, key }, or Internal
//! ```
//!
//! The guard always runs first, so a denied caller triggers no repository
//! call and learns nothing about whether a key exists.
//!
//! The endpoint holds no mutable state. Concurrent replaces of the same key are
//! last-write-wins; ordering is whatever the repository provides.

use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, error, info};

use campusdesk_auth::{AccessTable, AuthzError, Operation, RoleSet};
use campusdesk_core::{DomainError, Record};

use crate::repository::{Repository, StoreError};

/// Failure of a resource operation.
///
/// The three kinds are mutually exclusive and map to distinct boundary outcomes.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The caller's roles do not cover the operation.
    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    /// Domain-level failure (e.g. no record under the requested key).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The repository failed. Not retried.
    #[error("internal failure: {0}")]
    Internal(#[from] StoreError),
}

impl EndpointError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }
}

/// Generic list / create / get / replace endpoint for one record type.
///
/// ## Generic Parameters
///
/// - `R`: record type (key type and not-found name come from its `Record` impl)
/// - `S`: repository implementation
pub struct ResourceEndpoint<R, S> {
    repo: S,
    access: AccessTable,
    _record: PhantomData<fn() -> R>,
}

impl<R, S> ResourceEndpoint<R, S>
where
    R: Record,
    S: Repository<R>,
{
    pub fn new(repo: S, access: AccessTable) -> Self {
        Self {
            repo,
            access,
            _record: PhantomData,
        }
    }

    pub fn access(&self) -> &AccessTable {
        &self.access
    }

    /// Run the guard for `operation` without touching the repository.
    pub fn authorize(
        &self,
        caller: Option<&RoleSet>,
        operation: Operation,
    ) -> Result<(), EndpointError> {
        self.access.check(caller, operation).map_err(|e| {
            debug!(resource = R::RESOURCE_TYPE, %operation, reason = %e, "access denied");
            EndpointError::Forbidden(e)
        })
    }

    /// Every stored record of this type.
    pub async fn list(&self, caller: Option<&RoleSet>) -> Result<Vec<R>, EndpointError> {
        self.authorize(caller, Operation::List)?;

        self.repo
            .find_all()
            .await
            .map_err(|e| store_failure::<R>(Operation::List, e))
    }

    /// Assemble a record from `draft` and persist it.
    ///
    /// Surrogate keys are assigned by the repository, never here.
    pub async fn create(
        &self,
        caller: Option<&RoleSet>,
        draft: R::Draft,
    ) -> Result<R, EndpointError> {
        self.authorize(caller, Operation::Create)?;

        let saved = self
            .repo
            .save(R::from_draft(draft))
            .await
            .map_err(|e| store_failure::<R>(Operation::Create, e))?;

        info!(resource = R::RESOURCE_TYPE, key = ?saved.key(), "record created");
        Ok(saved)
    }

    pub async fn get(&self, caller: Option<&RoleSet>, key: &R::Key) -> Result<R, EndpointError> {
        self.authorize(caller, Operation::Get)?;
        self.find(Operation::Get, key).await
    }

    /// Full replace of the record stored under `key`.
    ///
    /// Every attribute comes from `payload` except the key: the lookup `key` is
    /// authoritative and overrides whatever the payload carries. A missing key
    /// is NotFound (no upsert).
    pub async fn replace(
        &self,
        caller: Option<&RoleSet>,
        key: &R::Key,
        payload: R,
    ) -> Result<R, EndpointError> {
        self.authorize(caller, Operation::Replace)?;

        self.find(Operation::Replace, key).await?;

        let saved = self
            .repo
            .save(payload.with_key(key.clone()))
            .await
            .map_err(|e| store_failure::<R>(Operation::Replace, e))?;

        info!(resource = R::RESOURCE_TYPE, key = ?saved.key(), "record replaced");
        Ok(saved)
    }

    async fn find(&self, operation: Operation, key: &R::Key) -> Result<R, EndpointError> {
        match self.repo.find_by_id(key).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                debug!(resource = R::RESOURCE_TYPE, %key, %operation, "record not found");
                Err(DomainError::not_found::<R>(key).into())
            }
            Err(e) => Err(store_failure::<R>(operation, e)),
        }
    }
}

fn store_failure<R: Record>(operation: Operation, err: StoreError) -> EndpointError {
    error!(resource = R::RESOURCE_TYPE, %operation, error = %err, "repository call failed");
    EndpointError::Internal(err)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDateTime;

    use campusdesk_auth::Role;
    use campusdesk_core::{OrgCode, RecordId};
    use campusdesk_records::{HelpRequest, HelpRequestDraft, Organization, OrganizationDraft};

    use super::*;
    use crate::repository::InMemoryRepository;

    /// Wraps a repository and counts every call that reaches it.
    struct CountingRepository<R: Record> {
        inner: InMemoryRepository<R>,
        calls: AtomicUsize,
    }

    impl<R: Record> CountingRepository<R> {
        fn new() -> Self {
            Self {
                inner: InMemoryRepository::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<R: Record> Repository<R> for CountingRepository<R> {
        async fn find_all(&self) -> Result<Vec<R>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all().await
        }

        async fn save(&self, record: R) -> Result<R, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.save(record).await
        }

        async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(key).await
        }
    }

    /// Repository whose backend is always down.
    struct BrokenRepository;

    #[async_trait]
    impl Repository<HelpRequest> for BrokenRepository {
        async fn find_all(&self) -> Result<Vec<HelpRequest>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn save(&self, _record: HelpRequest) -> Result<HelpRequest, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn find_by_id(&self, _key: &RecordId) -> Result<Option<HelpRequest>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn help_requests_table() -> AccessTable {
        AccessTable::read_and_create().with(Operation::Replace, Role::ADMIN)
    }

    fn endpoint() -> (
        ResourceEndpoint<HelpRequest, Arc<CountingRepository<HelpRequest>>>,
        Arc<CountingRepository<HelpRequest>>,
    ) {
        let repo = Arc::new(CountingRepository::new());
        (ResourceEndpoint::new(repo.clone(), help_requests_table()), repo)
    }

    fn user() -> RoleSet {
        vec![Role::USER].into()
    }

    fn admin() -> RoleSet {
        vec![Role::ADMIN, Role::USER].into()
    }

    fn t(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn draft() -> HelpRequestDraft {
        HelpRequestDraft {
            requester_email: "a@x.edu".to_string(),
            team_id: "1".to_string(),
            table_or_breakout_room: "13".to_string(),
            request_time: t("2022-01-03T00:00:00"),
            explanation: "help".to_string(),
            solved: false,
        }
    }

    fn not_found_message(err: &EndpointError) -> String {
        match err {
            EndpointError::Domain(e @ DomainError::NotFound { .. }) => e.to_string(),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn help_request_lifecycle() {
        let (ep, _repo) = endpoint();
        let admin = admin();

        let created = ep.create(Some(&admin), draft()).await.unwrap();
        assert_eq!(created.id, Some(RecordId::new(1)));
        assert_eq!(created.requester_email, "a@x.edu");

        let fetched = ep.get(Some(&admin), &RecordId::new(1)).await.unwrap();
        assert_eq!(fetched, created);

        let err = ep.get(Some(&admin), &RecordId::new(99)).await.unwrap_err();
        assert_eq!(not_found_message(&err), "HelpRequest with id 99 not found");

        let payload = HelpRequest {
            solved: true,
            ..created.clone()
        };
        let replaced = ep
            .replace(Some(&admin), &RecordId::new(1), payload)
            .await
            .unwrap();
        assert_eq!(replaced.id, Some(RecordId::new(1)));
        assert!(replaced.solved);

        let payload = HelpRequest::from_draft(draft());
        let err = ep
            .replace(Some(&admin), &RecordId::new(42), payload)
            .await
            .unwrap_err();
        assert_eq!(not_found_message(&err), "HelpRequest with id 42 not found");
    }

    #[tokio::test]
    async fn replace_keeps_lookup_key_and_takes_everything_else_from_payload() {
        let (ep, _repo) = endpoint();
        let admin = admin();
        let original = ep.create(Some(&admin), draft()).await.unwrap();

        let payload = HelpRequest {
            id: Some(RecordId::new(500)),
            requester_email: "edit@ucsb.edu".to_string(),
            team_id: "02".to_string(),
            table_or_breakout_room: "table2".to_string(),
            request_time: t("2023-01-04T00:00:00"),
            explanation: "Edited".to_string(),
            solved: true,
        };
        let key = original.id.unwrap();
        let replaced = ep.replace(Some(&admin), &key, payload.clone()).await.unwrap();

        assert_eq!(replaced, HelpRequest { id: Some(key), ..payload });
        assert_eq!(ep.get(Some(&admin), &key).await.unwrap(), replaced);
        assert!(ep.get(Some(&admin), &RecordId::new(500)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn replace_with_missing_key_does_not_upsert() {
        let (ep, _repo) = endpoint();
        let admin = admin();

        let err = ep
            .replace(Some(&admin), &RecordId::new(7), HelpRequest::from_draft(draft()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(ep.list(Some(&admin)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_reflects_creates_and_replaces_without_duplicates() {
        let (ep, _repo) = endpoint();
        let admin = admin();

        let a = ep.create(Some(&admin), draft()).await.unwrap();
        let b = ep.create(Some(&admin), draft()).await.unwrap();
        ep.replace(
            Some(&admin),
            a.id.as_ref().unwrap(),
            HelpRequest {
                explanation: "updated".to_string(),
                ..a.clone()
            },
        )
        .await
        .unwrap();

        let mut all = ep.list(Some(&user())).await.unwrap();
        all.sort_by_key(|r| r.id);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].explanation, "updated");
        assert_eq!(all[1], b);
    }

    #[tokio::test]
    async fn denied_callers_never_reach_the_repository() {
        let (ep, repo) = endpoint();
        let user = user();
        let key = RecordId::new(1);

        // Unauthenticated: every operation, reads included.
        assert!(ep.list(None).await.unwrap_err().is_forbidden());
        assert!(ep.get(None, &key).await.unwrap_err().is_forbidden());
        assert!(ep.create(None, draft()).await.unwrap_err().is_forbidden());
        assert!(
            ep.replace(None, &key, HelpRequest::from_draft(draft()))
                .await
                .unwrap_err()
                .is_forbidden()
        );

        // Regular users cannot write.
        assert!(ep.create(Some(&user), draft()).await.unwrap_err().is_forbidden());
        assert!(
            ep.replace(Some(&user), &key, HelpRequest::from_draft(draft()))
                .await
                .unwrap_err()
                .is_forbidden()
        );

        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn denial_hides_whether_the_key_exists() {
        let (ep, _repo) = endpoint();
        ep.create(Some(&admin()), draft()).await.unwrap();

        let present = ep.get(None, &RecordId::new(1)).await.unwrap_err();
        let absent = ep.get(None, &RecordId::new(99)).await.unwrap_err();
        assert_eq!(present.to_string(), absent.to_string());
        assert!(present.is_forbidden() && absent.is_forbidden());
    }

    #[tokio::test]
    async fn replace_of_natural_key_record_keeps_the_lookup_code() {
        let repo = Arc::new(InMemoryRepository::<Organization>::new());
        let ep = ResourceEndpoint::new(repo, help_requests_table());
        let admin = admin();

        let org = ep
            .create(
                Some(&admin),
                OrganizationDraft {
                    org_code: OrgCode::new("ZPR"),
                    org_translation_short: "ZETA PHI RHO".to_string(),
                    org_translation: "ZETA PHI RHO".to_string(),
                    inactive: false,
                },
            )
            .await
            .unwrap();

        let payload = Organization {
            org_code: OrgCode::new("SKY"),
            inactive: true,
            ..org
        };
        let replaced = ep
            .replace(Some(&admin), &OrgCode::new("ZPR"), payload)
            .await
            .unwrap();

        assert_eq!(replaced.org_code, OrgCode::new("ZPR"));
        assert!(replaced.inactive);
        assert_eq!(ep.list(Some(&admin)).await.unwrap(), vec![replaced]);
    }

    #[tokio::test]
    async fn replace_is_denied_when_the_table_does_not_expose_it() {
        let repo = Arc::new(InMemoryRepository::<Organization>::new());
        let ep = ResourceEndpoint::new(repo, AccessTable::read_and_create());
        let admin = admin();

        let org = ep
            .create(
                Some(&admin),
                OrganizationDraft {
                    org_code: OrgCode::new("ZPR"),
                    org_translation_short: "ZETA PHI RHO".to_string(),
                    org_translation: "ZETA PHI RHO".to_string(),
                    inactive: false,
                },
            )
            .await
            .unwrap();
        assert_eq!(org.org_code, OrgCode::new("ZPR"));

        let err = ep
            .replace(Some(&admin), &OrgCode::new("ZPR"), org)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EndpointError::Forbidden(AuthzError::NotExposed(Operation::Replace))
        ));

        let err = ep.get(Some(&admin), &OrgCode::new("SKY")).await.unwrap_err();
        assert_eq!(not_found_message(&err), "UCSBOrganizations with id SKY not found");
    }

    #[tokio::test]
    async fn repository_failures_surface_as_internal() {
        let ep = ResourceEndpoint::new(BrokenRepository, help_requests_table());
        let admin = admin();

        assert!(matches!(
            ep.list(Some(&admin)).await,
            Err(EndpointError::Internal(StoreError::Unavailable(_)))
        ));
        assert!(matches!(
            ep.create(Some(&admin), draft()).await,
            Err(EndpointError::Internal(_))
        ));
        let err = ep.get(Some(&admin), &RecordId::new(1)).await.unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, EndpointError::Internal(_)));
    }
}
