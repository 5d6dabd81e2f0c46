//! Account lifecycle and self-service operations.

pub mod mailer;
pub mod service;

pub use mailer::OtpMailer;
pub use service::{AccountService, LoginResponse, RegisterRequest, UpdateMeRequest};
