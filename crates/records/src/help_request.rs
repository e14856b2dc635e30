use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use campusdesk_core::{Record, RecordId};

/// A student team asking staff for help during a lab section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub requester_email: String,
    pub team_id: String,
    pub table_or_breakout_room: String,
    #[serde(with = "crate::timestamp")]
    pub request_time: NaiveDateTime,
    pub explanation: String,
    pub solved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestDraft {
    pub requester_email: String,
    pub team_id: String,
    pub table_or_breakout_room: String,
    #[serde(with = "crate::timestamp")]
    pub request_time: NaiveDateTime,
    pub explanation: String,
    pub solved: bool,
}

impl Record for HelpRequest {
    type Key = RecordId;
    type Draft = HelpRequestDraft;

    const RESOURCE_TYPE: &'static str = "HelpRequest";

    fn key(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn with_key(self, key: RecordId) -> Self {
        Self {
            id: Some(key),
            ..self
        }
    }

    fn from_draft(draft: HelpRequestDraft) -> Self {
        Self {
            id: None,
            requester_email: draft.requester_email,
            team_id: draft.team_id,
            table_or_breakout_room: draft.table_or_breakout_room,
            request_time: draft.request_time,
            explanation: draft.explanation,
            solved: draft.solved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn draft() -> HelpRequestDraft {
        HelpRequestDraft {
            requester_email: "pdg@ucsb.edu".to_string(),
            team_id: "s22-6pm-4".to_string(),
            table_or_breakout_room: "13".to_string(),
            request_time: t("2022-01-03T00:00:00"),
            explanation: "Need help with setup".to_string(),
            solved: false,
        }
    }

    #[test]
    fn draft_leaves_surrogate_key_unset() {
        let hr = HelpRequest::from_draft(draft());
        assert_eq!(hr.key(), None);
        assert_eq!(hr.team_id, "s22-6pm-4");
    }

    #[test]
    fn serializes_with_camel_case_and_local_timestamp() {
        let hr = HelpRequest::from_draft(draft()).with_key(RecordId::new(1));
        let json = serde_json::to_value(&hr).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["requesterEmail"], "pdg@ucsb.edu");
        assert_eq!(json["tableOrBreakoutRoom"], "13");
        assert_eq!(json["requestTime"], "2022-01-03T00:00:00");
        assert_eq!(json["solved"], false);
    }

    #[test]
    fn payload_without_id_deserializes() {
        let hr: HelpRequest = serde_json::from_value(serde_json::json!({
            "requesterEmail": "edit@ucsb.edu",
            "teamId": "02",
            "tableOrBreakoutRoom": "table2",
            "requestTime": "2023-01-04T00:00:00",
            "explanation": "Edited",
            "solved": true
        }))
        .unwrap();
        assert_eq!(hr.id, None);
        assert!(hr.solved);
    }

    #[test]
    fn request_time_accepts_minute_precision() {
        let draft: HelpRequestDraft = serde_json::from_value(serde_json::json!({
            "requesterEmail": "pdg@ucsb.edu",
            "teamId": "s22-6pm-4",
            "tableOrBreakoutRoom": "13",
            "requestTime": "2022-01-03T09:15",
            "explanation": "Need help with setup",
            "solved": false
        }))
        .unwrap();

        assert_eq!(draft.request_time, t("2022-01-03T09:15:00"));
        let json = serde_json::to_value(HelpRequest::from_draft(draft)).unwrap();
        assert_eq!(json["requestTime"], "2022-01-03T09:15:00");
    }

    proptest! {
        #[test]
        fn with_key_keeps_every_other_attribute(
            payload_id in proptest::option::of(any::<i64>()),
            key in any::<i64>(),
            email in "[a-z]{1,8}@[a-z]{1,8}\\.edu",
            team in "[a-z0-9-]{0,12}",
            room in "[a-z0-9 ]{0,12}",
            secs in 0i64..4_000_000_000,
            explanation in ".{0,40}",
            solved in any::<bool>(),
        ) {
            let payload = HelpRequest {
                id: payload_id.map(RecordId::new),
                requester_email: email,
                team_id: team,
                table_or_breakout_room: room,
                request_time: chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc(),
                explanation,
                solved,
            };

            let replaced = payload.clone().with_key(RecordId::new(key));
            prop_assert_eq!(replaced.key(), Some(&RecordId::new(key)));
            prop_assert_eq!(HelpRequest { id: payload.id, ..replaced }, payload);
        }
    }
}
