//! Catalog, account and review DTOs shared by server and clients
//!
//! Persisted entities (with record ids) live in the server crate; this module
//! holds the value types they embed and the request payloads of the API.

pub mod category;
pub mod menu_item;
pub mod restaurant;
pub mod review;
pub mod user;

pub use category::{CategoryCreate, CategoryUpdate};
pub use menu_item::{
    Allergen, CustomizationChoice, CustomizationGroup, DietaryInfo, MenuItemCreate,
    MenuItemUpdate,
};
pub use restaurant::{
    DayHours, GeoPoint, OpeningHours, RestaurantCreate, RestaurantQuery, RestaurantUpdate,
};
pub use review::{ReviewCreate, ReviewQuery, ReviewUpdate};
pub use user::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, RegisterRequest,
    ResetPasswordRequest, Role, RoleUpdateRequest, UpdateDetailsRequest, UpdatePasswordRequest,
    UserProfile,
};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Postal address used by users and restaurants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(custom(function = "not_blank", message = "Street is required"))]
    pub street: String,
    #[validate(custom(function = "not_blank", message = "City is required"))]
    pub city: String,
    #[validate(custom(function = "not_blank", message = "State is required"))]
    pub state: String,
    #[validate(custom(function = "not_blank", message = "Zip code is required"))]
    pub zip_code: String,
    #[validate(custom(function = "not_blank", message = "Country is required"))]
    pub country: String,
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Rejects NaN / infinite and negative amounts
pub fn non_negative_amount(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Paging query shared by list endpoints
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 200;

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}
