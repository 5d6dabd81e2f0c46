//! Request context carrying the authenticated account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current authenticated request.
///
/// Extracted by middleware after token validation and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated account's ID.
    pub account_id: i64,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(account_id: i64) -> Self {
        Self {
            account_id,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the given account is the one acting.
    pub fn is_self(&self, account_id: i64) -> bool {
        self.account_id == account_id
    }
}
