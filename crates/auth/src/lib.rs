//! `campusdesk-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod guard;
pub mod jwt;
pub mod principal;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use guard::{AccessTable, AuthzError, Operation, authorize};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use principal::PrincipalId;
pub use roles::{Role, RoleSet};
