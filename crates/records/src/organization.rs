use serde::{Deserialize, Serialize};

use campusdesk_core::{OrgCode, Record};

/// A student organization, keyed by its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub org_code: OrgCode,
    pub org_translation_short: String,
    pub org_translation: String,
    pub inactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDraft {
    pub org_code: OrgCode,
    pub org_translation_short: String,
    pub org_translation: String,
    pub inactive: bool,
}

impl Record for Organization {
    type Key = OrgCode;
    type Draft = OrganizationDraft;

    const RESOURCE_TYPE: &'static str = "UCSBOrganizations";

    fn key(&self) -> Option<&OrgCode> {
        Some(&self.org_code)
    }

    fn with_key(self, key: OrgCode) -> Self {
        Self {
            org_code: key,
            ..self
        }
    }

    fn from_draft(draft: OrganizationDraft) -> Self {
        Self {
            org_code: draft.org_code,
            org_translation_short: draft.org_translation_short,
            org_translation: draft.org_translation,
            inactive: draft.inactive,
        }
    }
}
