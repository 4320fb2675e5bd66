//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult, now_millis, parse_id};
use crate::db::models::{RatingSummary, Restaurant, RestaurantFilter, RestaurantPatch};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Listing with optional cuisine / city / name filters
    pub async fn find_filtered(&self, filter: RestaurantFilter) -> RepoResult<Vec<Restaurant>> {
        let mut conditions = Vec::new();
        if !filter.include_inactive {
            conditions.push("is_active = true");
        }
        if filter.cuisine.is_some() {
            conditions.push("string::contains(string::lowercase(array::join(cuisine, '|')), $cuisine)");
        }
        if filter.city.is_some() {
            conditions.push("string::lowercase(address.city) = $city");
        }
        if filter.search.is_some() {
            conditions.push("string::contains(string::lowercase(name), $search)");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM restaurant {} ORDER BY rating DESC, name ASC LIMIT $limit START $offset",
            where_clause
        );

        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query(sql)
            .bind(("cuisine", filter.cuisine.map(|c| c.trim().to_lowercase())))
            .bind(("city", filter.city.map(|c| c.trim().to_lowercase())))
            .bind(("search", filter.search.map(|s| s.trim().to_lowercase())))
            .bind(("limit", filter.limit))
            .bind(("offset", filter.offset))
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let thing = match parse_id(TABLE, id) {
            Ok(thing) => thing,
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let restaurant: Option<Restaurant> = self.base.db().select(thing).await?;
        Ok(restaurant)
    }

    /// Ids ("restaurant:xxx") of every restaurant owned by the user
    pub async fn find_ids_by_owner(&self, owner: &str) -> RepoResult<Vec<String>> {
        let ids: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE <string>id FROM restaurant WHERE owner = $owner")
            .bind(("owner", owner.to_string()))
            .await?
            .take(0)?;
        Ok(ids)
    }

    /// Create a restaurant; `id`, ratings and timestamps are filled here
    pub async fn create(&self, mut data: Restaurant) -> RepoResult<Restaurant> {
        let now = now_millis();
        data.id = None;
        data.rating = 0.0;
        data.total_ratings = 0;
        data.created_at = now;
        data.updated_at = now;

        let created: Option<Restaurant> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    pub async fn update(&self, id: &str, mut patch: RestaurantPatch) -> RepoResult<Restaurant> {
        let thing = parse_id(TABLE, id)?;
        patch.updated_at = now_millis();
        let updated: Option<Restaurant> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
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

    /// Hard delete a restaurant together with its menu items
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let key = thing.to_string();
        let mut result = self
            .base
            .db()
            .query("DELETE menu_item WHERE restaurant = $key")
            .query("DELETE $thing RETURN BEFORE")
            .bind(("key", key))
            .bind(("thing", thing))
            .await?;
        let deleted: Vec<Restaurant> = result.take(1)?;
        Ok(!deleted.is_empty())
    }
}
