use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use campusdesk_core::{Record, RecordId};

/// A student's request for a letter of recommendation from a professor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub requester_email: String,
    pub professor_email: String,
    pub explanation: String,
    #[serde(with = "crate::timestamp")]
    pub date_requested: NaiveDateTime,
    #[serde(with = "crate::timestamp")]
    pub date_needed: NaiveDateTime,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequestDraft {
    pub requester_email: String,
    pub professor_email: String,
    pub explanation: String,
    #[serde(with = "crate::timestamp")]
    pub date_requested: NaiveDateTime,
    #[serde(with = "crate::timestamp")]
    pub date_needed: NaiveDateTime,
    pub done: bool,
}

impl Record for RecommendationRequest {
    type Key = RecordId;
    type Draft = RecommendationRequestDraft;

    const RESOURCE_TYPE: &'static str = "RecommendationRequest";

    fn key(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn with_key(self, key: RecordId) -> Self {
        Self {
            id: Some(key),
            ..self
        }
    }

    fn from_draft(draft: RecommendationRequestDraft) -> Self {
        Self {
            id: None,
            requester_email: draft.requester_email,
            professor_email: draft.professor_email,
            explanation: draft.explanation,
            date_requested: draft.date_requested,
            date_needed: draft.date_needed,
            done: draft.done,
        }
    }
}
