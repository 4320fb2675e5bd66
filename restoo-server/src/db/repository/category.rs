//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, now_millis, parse_id};
use crate::db::models::{Category, CategoryPatch};
use shared::models::CategoryCreate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active categories ordered by sort_order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY sort_order, name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let thing = match parse_id(TABLE, id) {
            Ok(thing) => thing,
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let category: Option<Category> = self.base.db().select(thing).await?;
        Ok(category)
    }

    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", name.trim().to_string()))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let name = data.name.trim().to_string();
        if self.find_by_name(&name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let now = now_millis();
        let category = Category {
            id: None,
            name,
            description: data.description,
            image: data.image,
            icon: data.icon,
            is_active: true,
            sort_order: data.sort_order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    pub async fn update(&self, id: &str, mut patch: CategoryPatch) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        // Check duplicate name if changing
        if let Some(new_name) = patch.name.as_mut() {
            *new_name = new_name.trim().to_string();
            if *new_name != existing.name && self.find_by_name(new_name).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "Category '{}' already exists",
                    new_name
                )));
            }
        }

        let thing = parse_id(TABLE, id)?;
        patch.updated_at = now_millis();
        let updated: Option<Category> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Hard delete; refused while menu items still reference the category
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let key = thing.to_string();

        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM menu_item WHERE category = $key GROUP ALL")
            .bind(("key", key))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Cannot delete category that is used by menu items".to_string(),
            ));
        }

        let deleted: Option<Category> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
