//! Sharing: per-account grants and anonymous share links.

pub mod access;
pub mod service;
pub mod token;

pub use access::{LinkResolution, ShareAccessService};
pub use service::{CreateLinkRequest, ShareLinkManager};
pub use token::TokenGenerator;
