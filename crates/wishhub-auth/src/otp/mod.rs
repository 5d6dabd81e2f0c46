//! One-time passcode generation and challenge verification.

pub mod service;

pub use service::{OtpChallenge, OtpService};
