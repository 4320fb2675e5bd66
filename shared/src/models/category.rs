//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::not_blank;

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(
        length(max = 50, message = "Name cannot be more than 50 characters"),
        custom(function = "not_blank", message = "Please add a category name")
    )]
    pub name: String,
    #[validate(length(max = 200, message = "Description cannot be more than 200 characters"))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(
        length(max = 50, message = "Name cannot be more than 50 characters"),
        custom(function = "not_blank", message = "Name cannot be empty")
    )]
    pub name: Option<String>,
    #[validate(length(max = 200, message = "Description cannot be more than 200 characters"))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}
