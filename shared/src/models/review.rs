//! Review Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// POST /api/reviews
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCreate {
    /// Order id ("order:xxx")
    pub order: String,
    /// Optional menu item id, must be part of the order
    pub menu_item: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[validate(length(max = 100, message = "Title cannot be more than 100 characters"))]
    pub title: Option<String>,
    #[validate(
        length(max = 500, message = "Comment cannot be more than 500 characters"),
        custom(function = "not_blank", message = "Please add a comment")
    )]
    pub comment: String,
}

/// PUT /api/reviews/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewUpdate {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    #[validate(length(max = 100, message = "Title cannot be more than 100 characters"))]
    pub title: Option<String>,
    #[validate(
        length(max = 500, message = "Comment cannot be more than 500 characters"),
        custom(function = "not_blank", message = "Comment cannot be empty")
    )]
    pub comment: Option<String>,
}

/// Query of GET /api/reviews
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewQuery {
    pub restaurant: Option<String>,
    pub menu_item: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let review = ReviewCreate {
            order: "order:1".into(),
            menu_item: None,
            rating: 6,
            title: None,
            comment: "Great".into(),
        };
        assert!(review.validate().is_err());

        let review = ReviewCreate { rating: 5, ..review };
        assert!(review.validate().is_ok());
    }

    #[test]
    fn test_comment_length() {
        let review = ReviewCreate {
            order: "order:1".into(),
            menu_item: None,
            rating: 4,
            title: None,
            comment: "x".repeat(501),
        };
        let err = review.validate().unwrap_err();
        assert!(err.field_errors().contains_key("comment"));
    }
}
