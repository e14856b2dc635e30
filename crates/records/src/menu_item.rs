use serde::{Deserialize, Serialize};

use campusdesk_core::{Record, RecordId};

/// A dish served at one of the dining commons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub dining_commons_code: String,
    pub name: String,
    pub station: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    pub dining_commons_code: String,
    pub name: String,
    pub station: String,
}

impl Record for MenuItem {
    type Key = RecordId;
    type Draft = MenuItemDraft;

    const RESOURCE_TYPE: &'static str = "UCSBDiningCommonsMenuItem";

    fn key(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn with_key(self, key: RecordId) -> Self {
        Self {
            id: Some(key),
            ..self
        }
    }

    fn from_draft(draft: MenuItemDraft) -> Self {
        Self {
            id: None,
            dining_commons_code: draft.dining_commons_code,
            name: draft.name,
            station: draft.station,
        }
    }
}
