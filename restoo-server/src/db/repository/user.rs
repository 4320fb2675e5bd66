//! User Repository

use super::{BaseRepository, RepoError, RepoResult, now_millis, parse_id};
use crate::db::models::{User, UserDetailsPatch};
use shared::models::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

/// New account; `password_hash` is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub verification_token: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = match parse_id(TABLE, id) {
            Ok(thing) => thing,
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find by email (case-insensitive; emails are stored lower-cased)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.trim().to_lowercase()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_verification_token(&self, token: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE verification_token = $verification LIMIT 1")
            .bind(("verification", token.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find the user holding an unexpired reset token digest
    pub async fn find_by_reset_token(&self, digest: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM user WHERE reset_password_token = $digest \
                 AND reset_password_expire > $now LIMIT 1",
            )
            .bind(("digest", digest.to_string()))
            .bind(("now", now_millis()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: NewUser) -> RepoResult<User> {
        let email = data.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let now = now_millis();
        let user = User {
            id: None,
            name: data.name.trim().to_string(),
            email,
            password_hash: data.password_hash,
            phone: data.phone,
            address: None,
            avatar: None,
            role: data.role,
            is_verified: false,
            verification_token: data.verification_token,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: now,
            updated_at: now,
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update profile fields; a changed email must stay unique
    pub async fn update_details(&self, id: &str, mut patch: UserDetailsPatch) -> RepoResult<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if let Some(email) = patch.email.take() {
            let email = email.trim().to_lowercase();
            if email != existing.email && self.find_by_email(&email).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "Email '{}' is already registered",
                    email
                )));
            }
            patch.email = Some(email);
        }

        patch.updated_at = now_millis();

        let thing = parse_id(TABLE, id)?;
        let updated: Option<User> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Replace the password hash and clear any pending reset token
    pub async fn set_password(&self, id: &str, password_hash: String) -> RepoResult<User> {
        let thing = parse_id(TABLE, id)?;
        let updated: Option<User> = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    password_hash = $hash,
                    reset_password_token = NONE,
                    reset_password_expire = NONE,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("hash", password_hash))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn set_reset_token(&self, id: &str, digest: String, expire: i64) -> RepoResult<()> {
        let thing = parse_id(TABLE, id)?;
        self.base
            .db()
            .query(
                "UPDATE $thing SET reset_password_token = $digest, \
                 reset_password_expire = $expire, updated_at = $now",
            )
            .bind(("thing", thing))
            .bind(("digest", digest))
            .bind(("expire", expire))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn mark_verified(&self, id: &str) -> RepoResult<User> {
        let thing = parse_id(TABLE, id)?;
        let updated: Option<User> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET is_verified = true, verification_token = NONE, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn set_role(&self, id: &str, role: Role) -> RepoResult<User> {
        let thing = parse_id(TABLE, id)?;
        let updated: Option<User> = self
            .base
            .db()
            .query("UPDATE $thing SET role = $role, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("role", role.as_str()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
