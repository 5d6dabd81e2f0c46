//! # wishhub-auth
//!
//! Pure credential components for Wishhub. Nothing in this crate touches
//! the database; every component is constructed with its configuration
//! injected and is safe for unrestricted concurrent use.
//!
//! ## Modules
//!
//! - `signature` — client-application request signature verification
//! - `jwt` — stateless session token creation and validation
//! - `otp` — one-time passcode generation and challenge verification
//! - `password` — Argon2id password hashing and policy enforcement

pub mod jwt;
pub mod otp;
pub mod password;
pub mod signature;

pub use jwt::{Claims, TokenDecoder, TokenEncoder};
pub use otp::{OtpChallenge, OtpService};
pub use password::{PasswordHasher, PasswordValidator};
pub use signature::SignatureVerifier;
