//! Table mappings for the campus record types.

use sqlx::Row;
use sqlx::postgres::PgRow;

use campusdesk_core::{OrgCode, RecordId};
use campusdesk_records::{HelpRequest, MenuItem, Organization, RecommendationRequest};

use super::postgres::{PgQuery, PgRecord};

fn surrogate_id(row: &PgRow) -> Result<Option<RecordId>, sqlx::Error> {
    Ok(Some(RecordId::new(row.try_get::<i64, _>("id")?)))
}

impl PgRecord for HelpRequest {
    const TABLE: &'static str = "helprequests";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "requester_email",
        "team_id",
        "table_or_breakout_room",
        "request_time",
        "explanation",
        "solved",
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: surrogate_id(row)?,
            requester_email: row.try_get("requester_email")?,
            team_id: row.try_get("team_id")?,
            table_or_breakout_room: row.try_get("table_or_breakout_room")?,
            request_time: row.try_get("request_time")?,
            explanation: row.try_get("explanation")?,
            solved: row.try_get("solved")?,
        })
    }

    fn bind_key<'q>(key: &RecordId, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(key.value())
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.requester_email.clone())
            .bind(self.team_id.clone())
            .bind(self.table_or_breakout_room.clone())
            .bind(self.request_time)
            .bind(self.explanation.clone())
            .bind(self.solved)
    }
}

impl PgRecord for RecommendationRequest {
    const TABLE: &'static str = "recommendationrequests";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &[
        "requester_email",
        "professor_email",
        "explanation",
        "date_requested",
        "date_needed",
        "done",
    ];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: surrogate_id(row)?,
            requester_email: row.try_get("requester_email")?,
            professor_email: row.try_get("professor_email")?,
            explanation: row.try_get("explanation")?,
            date_requested: row.try_get("date_requested")?,
            date_needed: row.try_get("date_needed")?,
            done: row.try_get("done")?,
        })
    }

    fn bind_key<'q>(key: &RecordId, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(key.value())
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.requester_email.clone())
            .bind(self.professor_email.clone())
            .bind(self.explanation.clone())
            .bind(self.date_requested)
            .bind(self.date_needed)
            .bind(self.done)
    }
}

impl PgRecord for Organization {
    const TABLE: &'static str = "ucsborganizations";
    const KEY_COLUMN: &'static str = "org_code";
    const COLUMNS: &'static [&'static str] =
        &["org_translation_short", "org_translation", "inactive"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            org_code: OrgCode::new(row.try_get::<String, _>("org_code")?),
            org_translation_short: row.try_get("org_translation_short")?,
            org_translation: row.try_get("org_translation")?,
            inactive: row.try_get("inactive")?,
        })
    }

    fn bind_key<'q>(key: &OrgCode, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(key.as_str().to_string())
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.org_translation_short.clone())
            .bind(self.org_translation.clone())
            .bind(self.inactive)
    }
}

impl PgRecord for MenuItem {
    const TABLE: &'static str = "ucsbdiningcommonsmenuitem";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static [&'static str] = &["dining_commons_code", "name", "station"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: surrogate_id(row)?,
            dining_commons_code: row.try_get("dining_commons_code")?,
            name: row.try_get("name")?,
            station: row.try_get("station")?,
        })
    }

    fn bind_key<'q>(key: &RecordId, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(key.value())
    }

    fn bind_columns<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.dining_commons_code.clone())
            .bind(self.name.clone())
            .bind(self.station.clone())
    }
}
