//! User / Account Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{Address, not_blank};

/// Platform role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Customer
    #[default]
    User,
    RestaurantOwner,
    DeliveryPartner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::User,
        Role::RestaurantOwner,
        Role::DeliveryPartner,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::RestaurantOwner => "restaurant_owner",
            Role::DeliveryPartner => "delivery_partner",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// Public user profile (never carries credentials)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: i64,
}

/// POST /api/auth/register
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(max = 50, message = "Name cannot be more than 50 characters"),
        custom(function = "not_blank", message = "Please add a name")
    )]
    pub name: String,
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(max = 20, message = "Phone number cannot be longer than 20 characters"))]
    pub phone: Option<String>,
    pub role: Option<Role>,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide an email and password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide an email and password"))]
    pub password: String,
}

/// Token + profile returned by every flow that signs the user in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// PUT /api/auth/updatedetails
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDetailsRequest {
    #[validate(
        length(max = 50, message = "Name cannot be more than 50 characters"),
        custom(function = "not_blank", message = "Name cannot be empty")
    )]
    pub name: Option<String>,
    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone number cannot be longer than 20 characters"))]
    pub phone: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    pub avatar: Option<String>,
}

/// PUT /api/auth/updatepassword
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// POST /api/auth/forgotpassword
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please add a valid email"))]
    pub email: String,
}

/// Response of forgot password; the raw token is only echoed in development
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

/// PUT /api/auth/resetpassword/{token}
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// PUT /api/admin/users/{id}/role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_snake_case() {
        let json = serde_json::to_string(&Role::DeliveryPartner).unwrap();
        assert_eq!(json, "\"delivery_partner\"");
        let role: Role = serde_json::from_str("\"restaurant_owner\"").unwrap();
        assert_eq!(role, Role::RestaurantOwner);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("chef".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            name: "  ".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
            phone: None,
            role: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));

        let req = RegisterRequest {
            name: "Alice".into(),
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
