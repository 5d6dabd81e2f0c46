//! Anonymous share link entities.

pub mod link;

pub use link::ShareLink;
