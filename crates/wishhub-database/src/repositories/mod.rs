//! Concrete repository implementations.

pub mod account;
pub mod credential;
pub mod friend;
pub mod item;
pub mod permission;
pub mod share_link;
pub mod wishlist;

pub use account::AccountRepository;
pub use credential::CredentialRepository;
pub use friend::FriendRepository;
pub use item::ItemRepository;
pub use permission::GrantRepository;
pub use share_link::ShareLinkRepository;
pub use wishlist::WishlistRepository;
