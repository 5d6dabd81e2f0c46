//! Wishlist entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use wishhub_core::AppError;

use crate::permission::GrantRole;

/// List-level visibility governing default viewability absent an
/// explicit grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "wishlist_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Viewable only by the owner and explicit grantees.
    Private,
    /// Additionally viewable by the owner's accepted friends.
    Friends,
    /// Viewable by any authenticated account.
    Public,
}

impl Visibility {
    /// Return the visibility as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Friends => "friends",
            Self::Public => "public",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "friends" => Ok(Self::Friends),
            "public" => Ok(Self::Public),
            _ => Err(AppError::validation(format!("Invalid visibility: '{s}'"))),
        }
    }
}

/// A shareable wishlist. The owner is immutable for the list's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wishlist {
    /// Unique wishlist identifier.
    pub id: i64,
    /// Owning account (immutable).
    pub owner_id: i64,
    /// List title.
    pub title: String,
    /// Free-form description (optional).
    pub description: Option<String>,
    /// List-level visibility.
    pub visibility: Visibility,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
    /// When the list was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Wishlist {
    /// Whether the given account owns this list.
    pub fn is_owned_by(&self, account_id: i64) -> bool {
        self.owner_id == account_id
    }
}

/// Data required to create a new wishlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWishlist {
    /// List title (required, non-empty).
    pub title: String,
    /// Description (optional).
    pub description: Option<String>,
    /// Visibility, defaulting to private.
    pub visibility: Visibility,
}

/// Partial update to a wishlist's own fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWishlist {
    /// New title.
    pub title: Option<String>,
    /// New description; `Some(None)` clears the field.
    pub description: Option<Option<String>>,
    /// New visibility.
    pub visibility: Option<Visibility>,
}

impl UpdateWishlist {
    /// Whether the update carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.visibility.is_none()
    }
}

/// A listing row for wishlists shared with an account via a grant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedWishlist {
    /// The wishlist's identifier.
    pub id: i64,
    /// Owning account.
    pub owner_id: i64,
    /// The owner's display name.
    pub owner_display_name: String,
    /// List title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// List-level visibility.
    pub visibility: Visibility,
    /// The viewer's granted role.
    pub role: GrantRole,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
}
