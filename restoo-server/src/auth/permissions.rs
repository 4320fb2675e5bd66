//! Capability checks
//!
//! Role gates that cover a whole route live in [`super::require_role`];
//! everything that also depends on who owns the target goes through
//! [`authorize`]. Order status changes have their own per-edge table in
//! `orders::lifecycle`.

use shared::models::Role;

use crate::auth::CurrentUser;
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Protected operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateRestaurant,
    /// Update a restaurant (owner = restaurant owner)
    ManageRestaurant,
    /// Create / update / delete menu items (owner = restaurant owner)
    ManageMenu,
    DeleteRestaurant,
    ManageCategories,
    DeleteOrder,
    AdminConsole,
    /// Edit a review (owner = author)
    EditReview,
    /// Delete a review (owner = author)
    DeleteReview,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateRestaurant => "restaurants:create",
            Action::ManageRestaurant => "restaurants:manage",
            Action::ManageMenu => "menu:manage",
            Action::DeleteRestaurant => "restaurants:delete",
            Action::ManageCategories => "categories:manage",
            Action::DeleteOrder => "orders:delete",
            Action::AdminConsole => "admin:console",
            Action::EditReview => "reviews:edit",
            Action::DeleteReview => "reviews:delete",
        }
    }
}

/// Allow or deny `action` for `user`; `owner` is the user id owning the target
pub fn authorize(user: &CurrentUser, action: Action, owner: Option<&str>) -> AppResult<()> {
    let owns = owner.is_some_and(|o| o == user.id);

    let denied = match action {
        Action::CreateRestaurant => {
            if user.has_any_role(&[Role::RestaurantOwner, Role::Admin]) {
                None
            } else {
                Some(AppError::with_message(
                    ErrorCode::RoleRequired,
                    "Only restaurant owners can create restaurants",
                ))
            }
        }
        Action::ManageRestaurant | Action::ManageMenu => {
            if user.is_admin() || (user.role == Role::RestaurantOwner && owns) {
                None
            } else {
                Some(AppError::with_message(
                    ErrorCode::NotResourceOwner,
                    "Not authorized to manage this restaurant",
                ))
            }
        }
        Action::DeleteRestaurant
        | Action::ManageCategories
        | Action::DeleteOrder
        | Action::AdminConsole => {
            if user.is_admin() {
                None
            } else {
                Some(AppError::new(ErrorCode::AdminRequired))
            }
        }
        Action::EditReview => {
            if owns {
                None
            } else {
                Some(AppError::with_message(
                    ErrorCode::NotResourceOwner,
                    "Not authorized to update this review",
                ))
            }
        }
        Action::DeleteReview => {
            if owns || user.is_admin() {
                None
            } else {
                Some(AppError::with_message(
                    ErrorCode::NotResourceOwner,
                    "Not authorized to delete this review",
                ))
            }
        }
    };

    match denied {
        None => Ok(()),
        Some(err) => {
            security_log!(
                "WARN",
                "permission_denied",
                user_id = user.id.clone(),
                role = user.role.as_str(),
                action = action.as_str()
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, role: Role) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@example.com", id),
            role,
        }
    }

    #[test]
    fn test_create_restaurant_requires_owner_role() {
        assert!(authorize(&user("user:o", Role::RestaurantOwner), Action::CreateRestaurant, None).is_ok());
        assert!(authorize(&user("user:a", Role::Admin), Action::CreateRestaurant, None).is_ok());
        let err = authorize(&user("user:c", Role::User), Action::CreateRestaurant, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }

    #[test]
    fn test_manage_menu_requires_ownership() {
        let owner = user("user:o", Role::RestaurantOwner);
        assert!(authorize(&owner, Action::ManageMenu, Some("user:o")).is_ok());

        let err = authorize(&owner, Action::ManageMenu, Some("user:other")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotResourceOwner);

        // Owning the id is not enough without the role
        let demoted = user("user:o", Role::User);
        assert!(authorize(&demoted, Action::ManageRestaurant, Some("user:o")).is_err());

        let admin = user("user:a", Role::Admin);
        assert!(authorize(&admin, Action::ManageMenu, Some("user:o")).is_ok());
    }

    #[test]
    fn test_admin_only_actions() {
        for action in [
            Action::DeleteRestaurant,
            Action::ManageCategories,
            Action::DeleteOrder,
            Action::AdminConsole,
        ] {
            assert!(authorize(&user("user:a", Role::Admin), action, None).is_ok());
            let err =
                authorize(&user("user:o", Role::RestaurantOwner), action, None).unwrap_err();
            assert_eq!(err.code, ErrorCode::AdminRequired);
        }
    }

    #[test]
    fn test_review_edit_is_author_only() {
        let author = user("user:c", Role::User);
        assert!(authorize(&author, Action::EditReview, Some("user:c")).is_ok());
        assert!(authorize(&user("user:a", Role::Admin), Action::EditReview, Some("user:c")).is_err());
    }

    #[test]
    fn test_review_delete_author_or_admin() {
        assert!(authorize(&user("user:c", Role::User), Action::DeleteReview, Some("user:c")).is_ok());
        assert!(authorize(&user("user:a", Role::Admin), Action::DeleteReview, Some("user:c")).is_ok());
        assert!(authorize(&user("user:x", Role::User), Action::DeleteReview, Some("user:c")).is_err());
    }
}
