//! Account and credential entities.

pub mod model;

pub use model::{
    Account, BirthDateVisibility, CreateAccount, Credential, UpdateProfile, normalize_language,
};
