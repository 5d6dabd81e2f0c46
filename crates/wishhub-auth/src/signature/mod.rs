//! Client-application request signature verification.

pub mod verifier;

pub use verifier::SignatureVerifier;
