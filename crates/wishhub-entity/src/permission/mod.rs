//! Per-wishlist permission grant entities.

pub mod model;

pub use model::{GrantRole, GrantSummary, PermissionGrant};
