//! # wishhub-entity
//!
//! Domain entity models for Wishhub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.
//!
//! Every persisted entity carries a `deleted_at` soft-delete marker plus
//! `created_at`/`updated_at` timestamps; repositories filter soft-deleted
//! rows on every lookup.

pub mod account;
pub mod friend;
pub mod permission;
pub mod share;
pub mod wishlist;
