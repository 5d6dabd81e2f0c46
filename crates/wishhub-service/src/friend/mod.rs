//! Friendship graph operations.

pub mod service;

pub use service::FriendGraphService;
