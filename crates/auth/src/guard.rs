//! Access guard: role checks for resource operations.
//!
//! Every resource operation has a required role, held in an explicit
//! [`AccessTable`]. The guard is pure: no IO, no panics, no knowledge of the
//! record being accessed.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::{Role, RoleSet};

/// A resource operation exposed at the boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Create,
    Get,
    Replace,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::Replace => "replace",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why access was refused.
///
/// All variants surface identically (forbidden) at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: caller is not authenticated")]
    Unauthenticated,

    #[error("forbidden: missing role '{0}'")]
    MissingRole(Role),

    #[error("forbidden: operation '{0}' is not exposed")]
    NotExposed(Operation),
}

/// Returns `true` iff the caller has a role set containing `required`.
///
/// A caller without any role set (unauthenticated) is always denied.
pub fn authorize(caller: Option<&RoleSet>, required: &Role) -> bool {
    caller.is_some_and(|roles| roles.contains(required))
}

/// Static mapping from operation to required role.
///
/// Operations missing from the table are denied for everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessTable {
    required: BTreeMap<Operation, Role>,
}

impl AccessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read for users, create for admins. No replace.
    pub fn read_and_create() -> Self {
        Self::new()
            .with(Operation::List, Role::USER)
            .with(Operation::Get, Role::USER)
            .with(Operation::Create, Role::ADMIN)
    }

    pub fn with(mut self, operation: Operation, role: Role) -> Self {
        self.required.insert(operation, role);
        self
    }

    pub fn required_role(&self, operation: Operation) -> Option<&Role> {
        self.required.get(&operation)
    }

    pub fn exposes(&self, operation: Operation) -> bool {
        self.required.contains_key(&operation)
    }

    pub fn check(&self, caller: Option<&RoleSet>, operation: Operation) -> Result<(), AuthzError> {
        let required = self
            .required_role(operation)
            .ok_or(AuthzError::NotExposed(operation))?;

        if caller.is_none() {
            return Err(AuthzError::Unauthenticated);
        }
        if authorize(caller, required) {
            Ok(())
        } else {
            Err(AuthzError::MissingRole(required.clone()))
        }
    }
}
