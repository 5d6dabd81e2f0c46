//! Wishlist and wishlist item entities.

pub mod item;
pub mod model;

pub use item::{CreateItem, ItemPriority, ItemVisibility, UpdateItem, WishlistItem};
pub use model::{CreateWishlist, SharedWishlist, UpdateWishlist, Visibility, Wishlist};
