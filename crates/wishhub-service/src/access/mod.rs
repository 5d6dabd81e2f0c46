//! Wishlist access control resolution.

pub mod resolver;

pub use resolver::{AccessControlResolver, AccessDecision};
