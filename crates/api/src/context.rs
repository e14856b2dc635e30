use campusdesk_auth::{PrincipalId, RoleSet};

/// Principal context for a request (authenticated identity + roles).
///
/// Absent from the request extensions when the caller sent no credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    roles: RoleSet,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, roles: RoleSet) -> Self {
        Self { principal_id, roles }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}
