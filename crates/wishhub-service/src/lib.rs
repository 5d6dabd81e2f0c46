//! # wishhub-service
//!
//! Business logic service layer for Wishhub. Each service orchestrates
//! repositories and credential components to implement application-level
//! use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod account;
pub mod context;
pub mod friend;
pub mod share;
pub mod wishlist;

pub use access::{AccessControlResolver, AccessDecision};
pub use account::{AccountService, OtpMailer};
pub use context::RequestContext;
pub use friend::FriendGraphService;
pub use share::{ShareAccessService, ShareLinkManager, TokenGenerator};
pub use wishlist::{ItemService, WishlistService};
