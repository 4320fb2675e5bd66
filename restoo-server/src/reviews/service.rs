//! Review service
//!
//! One review per (order, user), only for delivered orders. Ratings are
//! recomputed right after every review write; the order's copy of the
//! rating and comment is synced afterwards.

use shared::models::{Page, ReviewCreate, ReviewQuery, ReviewUpdate};
use shared::order::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use super::aggregator::RatingAggregator;
use crate::auth::{Action, CurrentUser, authorize};
use crate::db::models::{Review, ReviewPatch};
use crate::db::repository::{OrderRepository, RepoError, ReviewRepository, normalize_id};
use crate::orders::OrderService;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewRepository,
    orders: OrderRepository,
    order_service: OrderService,
    aggregator: RatingAggregator,
}

fn review_exists() -> AppError {
    AppError::new(ErrorCode::ReviewExists)
}

impl ReviewService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            order_service: OrderService::new(db.clone()),
            aggregator: RatingAggregator::new(db),
        }
    }

    async fn load(&self, id: &str) -> AppResult<Review> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ReviewNotFound).with_detail("review", id))
    }

    /// Recompute ratings, then copy the review onto its order
    ///
    /// If the order cannot take the copy the review is removed again, so a
    /// failed request leaves neither the review nor a rating that counts it.
    async fn settle_created(&self, review: &Review) -> AppResult<()> {
        self.aggregator
            .recompute(&review.restaurant, review.menu_item.as_deref())
            .await?;

        let Err(err) = self
            .order_service
            .record_review(&review.order, Some((review.rating, &review.comment)))
            .await
        else {
            return Ok(());
        };

        tracing::warn!(
            review_id = %review.id_string(),
            order_id = %review.order,
            error = %err,
            "Order sync failed, discarding review"
        );
        self.reviews.delete(&review.id_string()).await?;
        self.aggregator
            .recompute(&review.restaurant, review.menu_item.as_deref())
            .await?;
        Err(err)
    }

    /// Mirror the current review onto the order; a deleted order has nothing to mirror
    async fn sync_order(&self, order: &str, review: Option<(u8, &str)>) -> AppResult<()> {
        match self.order_service.record_review(order, review).await {
            Ok(_) => Ok(()),
            Err(err) if err.code == ErrorCode::OrderNotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Review> {
        self.load(id).await
    }

    pub async fn list(&self, query: ReviewQuery) -> AppResult<Vec<Review>> {
        let restaurant = query
            .restaurant
            .as_deref()
            .map(|r| normalize_id("restaurant", r))
            .transpose()?;
        let menu_item = query
            .menu_item
            .as_deref()
            .map(|m| normalize_id("menu_item", m))
            .transpose()?;
        let page = Page {
            limit: query.limit,
            offset: query.offset,
        };
        Ok(self
            .reviews
            .find_filtered(restaurant, menu_item, page.limit(), page.offset())
            .await?)
    }

    /// Review a delivered order of the caller
    pub async fn create(&self, caller: &CurrentUser, req: ReviewCreate) -> AppResult<Review> {
        req.validate()?;
        let order = self
            .orders
            .find_by_id(&req.order)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order", req.order.clone()))?;
        let order_id = order.id_string();

        if order.customer != caller.id {
            return Err(AppError::with_message(
                ErrorCode::NotResourceOwner,
                "You can only review your own orders",
            ));
        }
        if order.status != OrderStatus::Delivered {
            return Err(AppError::new(ErrorCode::OrderNotDelivered)
                .with_detail("status", order.status.as_str()));
        }

        let menu_item = match req.menu_item.as_deref() {
            Some(raw) => {
                let id = normalize_id("menu_item", raw).map_err(|_| {
                    AppError::validation("Menu item is not part of this order")
                })?;
                if !order.contains_menu_item(&id) {
                    return Err(AppError::validation("Menu item is not part of this order")
                        .with_detail("menu_item", id));
                }
                Some(id)
            }
            None => None,
        };

        if self
            .reviews
            .find_by_order_and_user(&order_id, &caller.id)
            .await?
            .is_some()
        {
            return Err(review_exists());
        }

        let review = Review {
            id: None,
            user: caller.id.clone(),
            restaurant: order.restaurant.clone(),
            menu_item,
            order: order_id.clone(),
            rating: req.rating,
            title: req.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            comment: req.comment.trim().to_string(),
            is_verified: true,
            created_at: 0,
            updated_at: 0,
        };
        let review = self.reviews.create(review).await.map_err(|e| match e {
            RepoError::Duplicate(_) => review_exists(),
            other => other.into(),
        })?;
        self.settle_created(&review).await?;

        tracing::info!(
            review_id = %review.id_string(),
            order_id = %order_id,
            user_id = %caller.id,
            rating = review.rating,
            "Review created"
        );
        Ok(review)
    }

    /// Author edits rating, title or comment
    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: &str,
        req: ReviewUpdate,
    ) -> AppResult<Review> {
        req.validate()?;
        let review = self.load(id).await?;
        authorize(caller, Action::EditReview, Some(&review.user))?;

        let patch = ReviewPatch {
            rating: req.rating,
            title: req.title.map(|t| t.trim().to_string()),
            comment: req.comment.map(|c| c.trim().to_string()),
            updated_at: 0,
        };
        let updated = self.reviews.update(&review.id_string(), patch).await?;
        self.aggregator
            .recompute(&updated.restaurant, updated.menu_item.as_deref())
            .await?;
        self.sync_order(&updated.order, Some((updated.rating, &updated.comment)))
            .await?;

        tracing::info!(review_id = %updated.id_string(), user_id = %caller.id, "Review updated");
        Ok(updated)
    }

    /// Author or admin removes a review
    pub async fn delete(&self, caller: &CurrentUser, id: &str) -> AppResult<()> {
        let review = self.load(id).await?;
        authorize(caller, Action::DeleteReview, Some(&review.user))?;

        if !self.reviews.delete(&review.id_string()).await? {
            return Err(AppError::new(ErrorCode::ReviewNotFound));
        }
        self.aggregator
            .recompute(&review.restaurant, review.menu_item.as_deref())
            .await?;
        self.sync_order(&review.order, None).await?;

        tracing::info!(review_id = %review.id_string(), user_id = %caller.id, "Review deleted");
        Ok(())
    }
}
