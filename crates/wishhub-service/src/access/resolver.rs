//! Effective access resolution for wishlists.
//!
//! All access questions reduce to one decision table over four facts:
//! whether the viewer owns the list, the list's visibility, the viewer's
//! explicit grant (if any), and whether the viewer is an accepted friend
//! of the owner. The table itself is pure; the resolver gathers the
//! facts from repositories and applies it.

use std::sync::Arc;

use wishhub_core::error::AppError;
use wishhub_core::result::AppResult;
use wishhub_database::repositories::{FriendRepository, GrantRepository, WishlistRepository};
use wishhub_entity::permission::GrantRole;
use wishhub_entity::wishlist::{Visibility, Wishlist};

use crate::context::RequestContext;

/// The resolved access a single account holds on a single wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether the viewer owns the list.
    pub is_owner: bool,
    /// The viewer's explicit grant, if any.
    pub grant: Option<GrantRole>,
    /// Whether viewing is allowed.
    pub can_view: bool,
    /// Whether item-level and list-level edits are allowed.
    pub can_edit: bool,
    /// Whether grant and share-link management is allowed.
    pub can_manage_shares: bool,
}

impl AccessDecision {
    /// Apply the decision table to the gathered facts.
    ///
    /// An explicit grant always allows viewing regardless of list
    /// visibility; visibility only widens access, never narrows a
    /// grant. Share management never extends past the owner.
    pub fn resolve(
        is_owner: bool,
        visibility: Visibility,
        grant: Option<GrantRole>,
        are_friends: bool,
    ) -> Self {
        if is_owner {
            return Self {
                is_owner: true,
                grant,
                can_view: true,
                can_edit: true,
                can_manage_shares: true,
            };
        }

        let can_view = match visibility {
            Visibility::Public => true,
            Visibility::Friends => grant.is_some() || are_friends,
            Visibility::Private => grant.is_some(),
        };
        let can_edit = grant.map(|g| g.can_write()).unwrap_or(false);

        Self {
            is_owner: false,
            grant,
            can_view,
            can_edit,
            can_manage_shares: false,
        }
    }

    /// The effective role: `Owner` for the owner, the grant role for a
    /// grantee, `None` otherwise. Viewers who reach a list through its
    /// visibility alone hold no role; `can_view` carries that state.
    pub fn effective_role(&self) -> Option<GrantRole> {
        if self.is_owner {
            Some(GrantRole::Owner)
        } else {
            self.grant
        }
    }
}

/// Resolves what an authenticated account may do with a wishlist.
#[derive(Debug, Clone)]
pub struct AccessControlResolver {
    /// Wishlist repository.
    wishlist_repo: Arc<WishlistRepository>,
    /// Grant repository.
    grant_repo: Arc<GrantRepository>,
    /// Friend repository.
    friend_repo: Arc<FriendRepository>,
}

impl AccessControlResolver {
    /// Creates a new access control resolver.
    pub fn new(
        wishlist_repo: Arc<WishlistRepository>,
        grant_repo: Arc<GrantRepository>,
        friend_repo: Arc<FriendRepository>,
    ) -> Self {
        Self {
            wishlist_repo,
            grant_repo,
            friend_repo,
        }
    }

    /// Gathers the facts for an already-loaded wishlist and resolves.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        wishlist: &Wishlist,
    ) -> AppResult<AccessDecision> {
        if wishlist.is_owned_by(ctx.account_id) {
            return Ok(AccessDecision::resolve(
                true,
                wishlist.visibility,
                None,
                false,
            ));
        }

        let grant = self
            .grant_repo
            .find_for(wishlist.id, ctx.account_id)
            .await?
            .map(|g| g.role);

        // Friendship only matters for friends-visible lists without a
        // grant, so skip the query otherwise.
        let are_friends = if grant.is_none() && wishlist.visibility == Visibility::Friends {
            self.friend_repo
                .are_friends(wishlist.owner_id, ctx.account_id)
                .await?
        } else {
            false
        };

        Ok(AccessDecision::resolve(
            false,
            wishlist.visibility,
            grant,
            are_friends,
        ))
    }

    /// Loads a wishlist and requires view access.
    ///
    /// A list the viewer may not see is reported as not found, the same
    /// as a list that does not exist, so probing IDs reveals nothing.
    pub async fn require_view(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
    ) -> AppResult<(Wishlist, AccessDecision)> {
        let wishlist = self
            .wishlist_repo
            .find_by_id(wishlist_id)
            .await?
            .ok_or_else(|| AppError::not_found("Wishlist not found"))?;

        let decision = self.resolve(ctx, &wishlist).await?;
        if !decision.can_view {
            return Err(AppError::not_found("Wishlist not found"));
        }

        Ok((wishlist, decision))
    }

    /// Loads a wishlist and requires edit access.
    pub async fn require_edit(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
    ) -> AppResult<(Wishlist, AccessDecision)> {
        let (wishlist, decision) = self.require_view(ctx, wishlist_id).await?;
        if !decision.can_edit {
            return Err(AppError::forbidden(
                "You do not have edit access to this wishlist",
            ));
        }
        Ok((wishlist, decision))
    }

    /// Loads a wishlist and requires share management access.
    pub async fn require_manage_shares(
        &self,
        ctx: &RequestContext,
        wishlist_id: i64,
    ) -> AppResult<(Wishlist, AccessDecision)> {
        let (wishlist, decision) = self.require_view(ctx, wishlist_id).await?;
        if !decision.can_manage_shares {
            return Err(AppError::forbidden(
                "Only the owner can manage sharing for this wishlist",
            ));
        }
        Ok((wishlist, decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(
        is_owner: bool,
        visibility: Visibility,
        grant: Option<GrantRole>,
        are_friends: bool,
    ) -> AccessDecision {
        AccessDecision::resolve(is_owner, visibility, grant, are_friends)
    }

    #[test]
    fn owner_has_full_access_regardless_of_visibility() {
        for visibility in [Visibility::Private, Visibility::Friends, Visibility::Public] {
            let d = resolve(true, visibility, None, false);
            assert!(d.can_view);
            assert!(d.can_edit);
            assert!(d.can_manage_shares);
            assert_eq!(d.effective_role(), Some(GrantRole::Owner));
        }
    }

    #[test]
    fn public_list_viewable_by_stranger_but_not_editable() {
        let d = resolve(false, Visibility::Public, None, false);
        assert!(d.can_view);
        assert!(!d.can_edit);
        assert!(!d.can_manage_shares);
        assert_eq!(d.effective_role(), None);
    }

    #[test]
    fn private_list_hidden_from_stranger_and_friend() {
        for are_friends in [false, true] {
            let d = resolve(false, Visibility::Private, None, are_friends);
            assert!(!d.can_view);
            assert!(!d.can_edit);
            assert_eq!(d.effective_role(), None);
        }
    }

    #[test]
    fn friends_visibility_requires_friendship() {
        let stranger = resolve(false, Visibility::Friends, None, false);
        assert!(!stranger.can_view);

        let friend = resolve(false, Visibility::Friends, None, true);
        assert!(friend.can_view);
        assert!(!friend.can_edit);
    }

    #[test]
    fn visibility_only_viewers_hold_no_role() {
        // Viewable through visibility alone: no grant means no role,
        // even though can_view is true.
        let friend = resolve(false, Visibility::Friends, None, true);
        assert!(friend.can_view);
        assert_eq!(friend.effective_role(), None);

        let stranger = resolve(false, Visibility::Public, None, false);
        assert!(stranger.can_view);
        assert_eq!(stranger.effective_role(), None);

        // A grant, by contrast, is a held role.
        let grantee = resolve(false, Visibility::Private, Some(GrantRole::Reader), false);
        assert_eq!(grantee.effective_role(), Some(GrantRole::Reader));
    }

    #[test]
    fn reader_grant_opens_view_on_private_list() {
        let d = resolve(false, Visibility::Private, Some(GrantRole::Reader), false);
        assert!(d.can_view);
        assert!(!d.can_edit);
        assert!(!d.can_manage_shares);
        assert_eq!(d.effective_role(), Some(GrantRole::Reader));
    }

    #[test]
    fn editor_grant_opens_edit_but_never_share_management() {
        for visibility in [Visibility::Private, Visibility::Friends, Visibility::Public] {
            let d = resolve(false, visibility, Some(GrantRole::Editor), false);
            assert!(d.can_view);
            assert!(d.can_edit);
            assert!(!d.can_manage_shares);
            assert_eq!(d.effective_role(), Some(GrantRole::Editor));
        }
    }

    #[test]
    fn grant_beats_visibility_for_viewing() {
        // A grant on a friends-visible list works without friendship.
        let d = resolve(false, Visibility::Friends, Some(GrantRole::Reader), false);
        assert!(d.can_view);
    }

    #[test]
    fn full_matrix_view_column() {
        // (visibility, grant, are_friends) -> can_view for non-owners.
        let grants = [None, Some(GrantRole::Reader), Some(GrantRole::Editor)];
        for visibility in [Visibility::Private, Visibility::Friends, Visibility::Public] {
            for grant in grants {
                for are_friends in [false, true] {
                    let expected = match visibility {
                        Visibility::Public => true,
                        Visibility::Friends => grant.is_some() || are_friends,
                        Visibility::Private => grant.is_some(),
                    };
                    let d = resolve(false, visibility, grant, are_friends);
                    assert_eq!(
                        d.can_view, expected,
                        "visibility={visibility:?} grant={grant:?} friends={are_friends}"
                    );
                }
            }
        }
    }
}
