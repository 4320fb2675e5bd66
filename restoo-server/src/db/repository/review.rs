//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, now_millis, parse_id};
use crate::db::models::{Review, ReviewPatch};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let thing = match parse_id(TABLE, id) {
            Ok(thing) => thing,
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let review: Option<Review> = self.base.db().select(thing).await?;
        Ok(review)
    }

    pub async fn find_by_order_and_user(
        &self,
        order: &str,
        user: &str,
    ) -> RepoResult<Option<Review>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE `order` = $order AND user = $user LIMIT 1")
            .bind(("order", order.to_string()))
            .bind(("user", user.to_string()))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Public listing, newest first
    pub async fn find_filtered(
        &self,
        restaurant: Option<String>,
        menu_item: Option<String>,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Review>> {
        let mut conditions = Vec::new();
        if restaurant.is_some() {
            conditions.push("restaurant = $restaurant");
        }
        if menu_item.is_some() {
            conditions.push("menu_item = $menu_item");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM review {} ORDER BY created_at DESC LIMIT $limit START $offset",
            where_clause
        );

        let reviews: Vec<Review> = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant))
            .bind(("menu_item", menu_item))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Ratings of every review of a restaurant, optionally narrowed to one menu item
    pub async fn ratings(&self, restaurant: &str, menu_item: Option<&str>) -> RepoResult<Vec<u8>> {
        let sql = if menu_item.is_some() {
            "SELECT VALUE rating FROM review WHERE restaurant = $restaurant AND menu_item = $menu_item"
        } else {
            "SELECT VALUE rating FROM review WHERE restaurant = $restaurant"
        };
        let ratings: Vec<u8> = self
            .base
            .db()
            .query(sql)
            .bind(("restaurant", restaurant.to_string()))
            .bind(("menu_item", menu_item.map(str::to_string)))
            .await?
            .take(0)?;
        Ok(ratings)
    }

    /// Create a review; one per (order, user)
    pub async fn create(&self, mut review: Review) -> RepoResult<Review> {
        if self
            .find_by_order_and_user(&review.order, &review.user)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Review for {} already exists",
                review.order
            )));
        }

        let now = now_millis();
        review.id = None;
        review.created_at = now;
        review.updated_at = now;

        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    pub async fn update(&self, id: &str, mut patch: ReviewPatch) -> RepoResult<Review> {
        let thing = parse_id(TABLE, id)?;
        patch.updated_at = now_millis();
        let updated: Option<Review> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", patch))
            .await?
            .take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<Review> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
