//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, now_millis, parse_id};
use crate::db::models::{MenuItem, MenuItemPatch, RatingSummary};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Menu of a restaurant, available items only unless `include_unavailable`
    pub async fn find_by_restaurant(
        &self,
        restaurant: &str,
        include_unavailable: bool,
    ) -> RepoResult<Vec<MenuItem>> {
        let sql = if include_unavailable {
            "SELECT * FROM menu_item WHERE restaurant = $restaurant ORDER BY category, name"
        } else {
            "SELECT * FROM menu_item WHERE restaurant = $restaurant AND is_available = true \
             ORDER BY category, name"
        };
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = match parse_id(TABLE, id) {
            Ok(thing) => thing,
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    pub async fn create(&self, mut data: MenuItem) -> RepoResult<MenuItem> {
        let now = now_millis();
        data.id = None;
        data.rating = 0.0;
        data.total_ratings = 0;
        data.created_at = now;
        data.updated_at = now;

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    pub async fn update(&self, id: &str, mut patch: MenuItemPatch) -> RepoResult<MenuItem> {
        let thing = parse_id(TABLE, id)?;
        patch.updated_at = now_millis();
        let updated: Option<MenuItem> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Write the aggregated rating (rating aggregator only)
    pub async fn set_rating(&self, id: &str, summary: RatingSummary) -> RepoResult<()> {
        let thing = parse_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET rating = $rating, total_ratings = $count")
            .bind(("thing", thing))
            .bind(("rating", summary.rating))
            .bind(("count", summary.total_ratings))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
