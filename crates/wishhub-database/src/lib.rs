//! # wishhub-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for all Wishhub entities.
//!
//! Every repository filters soft-deleted rows on lookup. Uniqueness
//! invariants that must survive concurrent writers (one live friend edge
//! per pair, one grant per wishlist/account) are enforced by database
//! constraints, not application locks; violations surface as `Conflict`.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
