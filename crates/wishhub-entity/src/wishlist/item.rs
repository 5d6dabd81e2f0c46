//! Wishlist item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Item-level visibility.
///
/// `Private` is a strictly narrower, owner-only override on top of
/// list-level access; it never broadens access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemVisibility {
    /// Follows the list's visibility.
    Inherit,
    /// Visible only to the list owner.
    Private,
}

impl ItemVisibility {
    /// Normalize a caller-supplied value, falling back to `Inherit`.
    pub fn normalize(s: &str) -> Self {
        match s.trim() {
            "private" => Self::Private,
            _ => Self::Inherit,
        }
    }
}

/// Item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    /// Low priority.
    Low,
    /// Default priority.
    Medium,
    /// High priority.
    High,
}

impl ItemPriority {
    /// Normalize a caller-supplied value, falling back to `Medium`.
    pub fn normalize(s: &str) -> Self {
        match s.trim() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// A single wish on a wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WishlistItem {
    /// Unique item identifier.
    pub id: i64,
    /// Owning wishlist.
    pub wishlist_id: i64,
    /// Item title.
    pub title: String,
    /// Product image URL (optional).
    pub image_url: Option<String>,
    /// Product page URL (optional).
    pub link_url: Option<String>,
    /// Price amount (optional).
    pub price_amount: Option<f64>,
    /// ISO currency code, uppercased (optional).
    pub price_currency: Option<String>,
    /// Free-form notes (optional).
    pub notes: Option<String>,
    /// Item priority.
    pub priority: ItemPriority,
    /// Item-level visibility.
    pub visibility: ItemVisibility,
    /// Whether someone has already gifted this item.
    pub is_gifted: bool,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WishlistItem {
    /// Whether a viewer who is not the list owner may see this item.
    pub fn visible_to_non_owner(&self) -> bool {
        self.visibility != ItemVisibility::Private
    }
}

/// Data required to create a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// Item title (required, non-empty).
    pub title: String,
    /// Image URL.
    pub image_url: Option<String>,
    /// Link URL.
    pub link_url: Option<String>,
    /// Price amount.
    pub price_amount: Option<f64>,
    /// Currency code.
    pub price_currency: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Priority.
    pub priority: ItemPriority,
    /// Item-level visibility.
    pub visibility: ItemVisibility,
    /// Gifted flag.
    pub is_gifted: bool,
}

/// Partial update to an existing item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    /// New title.
    pub title: Option<String>,
    /// New image URL; `Some(None)` clears the field.
    pub image_url: Option<Option<String>>,
    /// New link URL; `Some(None)` clears the field.
    pub link_url: Option<Option<String>>,
    /// New price amount; `Some(None)` clears the field.
    pub price_amount: Option<Option<f64>>,
    /// New currency code; `Some(None)` clears the field.
    pub price_currency: Option<Option<String>>,
    /// New notes; `Some(None)` clears the field.
    pub notes: Option<Option<String>>,
    /// New priority.
    pub priority: Option<ItemPriority>,
    /// New item-level visibility.
    pub visibility: Option<ItemVisibility>,
    /// New gifted flag.
    pub is_gifted: Option<bool>,
}

impl UpdateItem {
    /// Whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.link_url.is_none()
            && self.price_amount.is_none()
            && self.price_currency.is_none()
            && self.notes.is_none()
            && self.priority.is_none()
            && self.visibility.is_none()
            && self.is_gifted.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_falls_back_to_defaults() {
        assert_eq!(ItemVisibility::normalize("private"), ItemVisibility::Private);
        assert_eq!(ItemVisibility::normalize("public"), ItemVisibility::Inherit);
        assert_eq!(ItemPriority::normalize("high"), ItemPriority::High);
        assert_eq!(ItemPriority::normalize("urgent"), ItemPriority::Medium);
    }
}
