//! User Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use shared::models::{Address, Role, UserProfile};

/// User record as stored
///
/// Contains credentials and tokens, so it is never returned by the API;
/// handlers convert it into [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Always lower-cased
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    /// SHA-256 hex digest of the raw reset token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_expire: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            avatar: self.avatar.clone(),
            role: self.role,
            is_verified: self.is_verified,
            created_at: self.created_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        user.profile()
    }
}

/// Profile fields writable by the account owner (`MERGE` patch)
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub updated_at: i64,
}
