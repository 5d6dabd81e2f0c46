//! Friendship graph entities.

pub mod model;

pub use model::{FriendDecision, FriendEdge, FriendStatus, FriendSummary};
