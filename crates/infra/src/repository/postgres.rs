//! Postgres-backed repository.
//!
//! One generic implementation serves every record type; the per-type table
//! layout lives in a [`PgRecord`] impl (see `pg_records.rs`).
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique / FK / check violation) | `23505` / `23503` / `23514` | `Constraint` |
//! | Database (other) | Any other | `Database` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | ColumnNotFound / ColumnDecode / Decode | N/A | `Decode` |
//! | Other | N/A | `Database` |

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, PgRow};
use tracing::instrument;

use campusdesk_core::Record;

use super::{Repository, StoreError};

/// Schema for all record tables (idempotent).
pub const SCHEMA: &str = include_str!("../../migrations/0001_resources.sql");

pub type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, PgArguments>;

/// Table mapping for a record type.
pub trait PgRecord: Record {
    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    /// Non-key columns, in bind order.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    fn bind_key<'q>(key: &Self::Key, query: PgQuery<'q>) -> PgQuery<'q>;

    /// Bind every non-key column, in `COLUMNS` order.
    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q>;
}

/// Create the record tables if they do not exist yet.
pub async fn apply_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("apply_schema", e))?;
    Ok(())
}

#[derive(Debug)]
struct Statements {
    select_all: String,
    select_one: String,
    insert: String,
    upsert: String,
}

impl Statements {
    fn for_record<R: PgRecord>() -> Self {
        let table = R::TABLE;
        let key = R::KEY_COLUMN;
        let columns = R::COLUMNS.join(", ");
        let returning = format!("{key}, {columns}");

        let placeholders = |offset: usize| {
            (1..=R::COLUMNS.len())
                .map(|i| format!("${}", i + offset))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let updates = R::COLUMNS
            .iter()
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            select_all: format!("SELECT {returning} FROM {table} ORDER BY {key}"),
            select_one: format!("SELECT {returning} FROM {table} WHERE {key} = $1"),
            insert: format!(
                "INSERT INTO {table} ({columns}) VALUES ({}) RETURNING {returning}",
                placeholders(0)
            ),
            upsert: format!(
                "INSERT INTO {table} ({key}, {columns}) VALUES ($1, {}) \
                 ON CONFLICT ({key}) DO UPDATE SET {updates} RETURNING {returning}",
                placeholders(1)
            ),
        }
    }
}

/// Postgres repository for one record type.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
pub struct PostgresRepository<R> {
    pool: PgPool,
    sql: Statements,
    _record: PhantomData<fn() -> R>,
}

impl<R: PgRecord> PostgresRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            sql: Statements::for_record::<R>(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: PgRecord> Repository<R> for PostgresRepository<R> {
    #[instrument(skip(self), fields(table = R::TABLE))]
    async fn find_all(&self) -> Result<Vec<R>, StoreError> {
        let rows = sqlx::query(&self.sql.select_all)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter()
            .map(|row| R::from_row(row).map_err(|e| map_sqlx_error("find_all", e)))
            .collect()
    }

    #[instrument(skip(self, record), fields(table = R::TABLE))]
    async fn save(&self, record: R) -> Result<R, StoreError> {
        let query = match record.key() {
            None => record.bind_columns(sqlx::query(&self.sql.insert)),
            Some(key) => record.bind_columns(R::bind_key(key, sqlx::query(&self.sql.upsert))),
        };

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("save", e))?;

        R::from_row(&row).map_err(|e| map_sqlx_error("save", e))
    }

    #[instrument(skip(self), fields(table = R::TABLE))]
    async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let row = R::bind_key(key, sqlx::query(&self.sql.select_one))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref()
            .map(R::from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("find_by_id", e))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505" | "23503" | "23514") => StoreError::Constraint(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        err @ (sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)) => StoreError::Decode(format!("{} in {}", err, operation)),
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusdesk_records::{HelpRequest, Organization};

    #[test]
    fn surrogate_insert_omits_the_key_column() {
        let sql = Statements::for_record::<HelpRequest>();
        assert_eq!(
            sql.insert,
            "INSERT INTO helprequests (requester_email, team_id, table_or_breakout_room, \
             request_time, explanation, solved) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, requester_email, team_id, table_or_breakout_room, request_time, \
             explanation, solved"
        );
        assert!(sql.select_one.ends_with("FROM helprequests WHERE id = $1"));
    }

    #[test]
    fn upsert_binds_key_first_and_overwrites_every_column() {
        let sql = Statements::for_record::<Organization>();
        assert!(sql.upsert.starts_with(
            "INSERT INTO ucsborganizations (org_code, org_translation_short, org_translation, inactive) \
             VALUES ($1, $2, $3, $4)"
        ));
        assert!(sql.upsert.contains("ON CONFLICT (org_code) DO UPDATE SET"));
        assert!(sql.upsert.contains("inactive = EXCLUDED.inactive"));
        assert!(!sql.upsert.contains("org_code = EXCLUDED.org_code"));
    }

    #[test]
    fn schema_declares_every_table() {
        for table in [
            "helprequests",
            "recommendationrequests",
            "ucsborganizations",
            "ucsbdiningcommonsmenuitem",
        ] {
            assert!(SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")));
        }
    }
}
