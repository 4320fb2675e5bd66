//! Rating aggregation
//!
//! Restaurant and menu item ratings are derived data: after every review
//! write the average and count are recomputed from the review table and
//! written back.

use futures::future::try_join;
use rust_decimal::Decimal;
use shared::order::pricing::to_f64;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::RatingSummary;
use crate::db::repository::{MenuItemRepository, RestaurantRepository, ReviewRepository};
use crate::utils::AppResult;

/// Average rounded to 2 decimal places; no ratings → 0 / 0
pub fn aggregate_ratings(ratings: &[u8]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary::default();
    }
    let sum: Decimal = ratings.iter().map(|r| Decimal::from(*r)).sum();
    let count = ratings.len() as u32;
    RatingSummary {
        rating: to_f64(sum / Decimal::from(count)),
        total_ratings: count,
    }
}

#[derive(Clone)]
pub struct RatingAggregator {
    reviews: ReviewRepository,
    restaurants: RestaurantRepository,
    menu: MenuItemRepository,
}

impl RatingAggregator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            menu: MenuItemRepository::new(db),
        }
    }

    async fn recompute_restaurant(&self, restaurant: &str) -> AppResult<RatingSummary> {
        let summary = aggregate_ratings(&self.reviews.ratings(restaurant, None).await?);
        self.restaurants.set_rating(restaurant, summary).await?;
        Ok(summary)
    }

    async fn recompute_menu_item(
        &self,
        restaurant: &str,
        menu_item: Option<&str>,
    ) -> AppResult<Option<RatingSummary>> {
        let Some(menu_item) = menu_item else {
            return Ok(None);
        };
        let summary = aggregate_ratings(&self.reviews.ratings(restaurant, Some(menu_item)).await?);
        self.menu.set_rating(menu_item, summary).await?;
        Ok(Some(summary))
    }

    /// Refresh the restaurant and, when given, the menu item
    pub async fn recompute(&self, restaurant: &str, menu_item: Option<&str>) -> AppResult<()> {
        let (restaurant_summary, item_summary) = try_join(
            self.recompute_restaurant(restaurant),
            self.recompute_menu_item(restaurant, menu_item),
        )
        .await?;

        tracing::debug!(
            restaurant_id = %restaurant,
            rating = restaurant_summary.rating,
            total_ratings = restaurant_summary.total_ratings,
            menu_item_rating = ?item_summary.map(|s| s.rating),
            "Ratings recomputed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ratings() {
        assert_eq!(
            aggregate_ratings(&[]),
            RatingSummary {
                rating: 0.0,
                total_ratings: 0
            }
        );
    }

    #[test]
    fn test_average_rounded_to_two_places() {
        let summary = aggregate_ratings(&[5, 4, 4]);
        assert_eq!(summary.total_ratings, 3);
        assert_eq!(summary.rating, 4.33);

        assert_eq!(aggregate_ratings(&[5, 4, 5]).rating, 4.67);
        assert_eq!(aggregate_ratings(&[1]).rating, 1.0);
    }

    #[test]
    fn test_average_stays_in_range() {
        let summary = aggregate_ratings(&[1, 2, 3, 4, 5, 5, 5]);
        assert!(summary.rating >= 1.0 && summary.rating <= 5.0);
        assert_eq!(summary.total_ratings, 7);
    }
}
