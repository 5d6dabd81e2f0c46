//! Wishlist and item use cases.

pub mod items;
pub mod service;

pub use items::ItemService;
pub use service::{WishlistOverview, WishlistService, WishlistView};
