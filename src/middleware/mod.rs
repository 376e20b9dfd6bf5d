//! Authentication and authorization.
//!
//! - [`auth`]: bearer-token extractor producing the authenticated principal
//! - [`permissions`]: the admin-only and assigned-proctor gates
//!
//! Flow: `AuthUser` validates the JWT; mutating handlers then call a gate
//! with the request method, the principal, and (for the proctor gate) the
//! resolved exam id. Denial short-circuits before any service runs.

pub mod auth;
pub mod permissions;
