//! Restaurant Model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{Address, non_negative_amount, not_blank};

/// Coordinates of a restaurant (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub latitude: f64,
}

/// Opening window of a single day, `HH:MM` local time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DayHours {
    #[validate(custom(function = "clock_time", message = "Opening time must be HH:MM"))]
    pub open: String,
    #[validate(custom(function = "clock_time", message = "Closing time must be HH:MM"))]
    pub close: String,
}

/// Weekly opening hours; a missing day means closed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OpeningHours {
    #[validate(nested)]
    pub monday: Option<DayHours>,
    #[validate(nested)]
    pub tuesday: Option<DayHours>,
    #[validate(nested)]
    pub wednesday: Option<DayHours>,
    #[validate(nested)]
    pub thursday: Option<DayHours>,
    #[validate(nested)]
    pub friday: Option<DayHours>,
    #[validate(nested)]
    pub saturday: Option<DayHours>,
    #[validate(nested)]
    pub sunday: Option<DayHours>,
}

fn clock_time(value: &str) -> Result<(), ValidationError> {
    let parsed = value
        .split_once(':')
        .filter(|(h, m)| h.len() == 2 && m.len() == 2)
        .and_then(|(h, m)| Some((h.parse::<u8>().ok()?, m.parse::<u8>().ok()?)));
    match parsed {
        Some((h, m)) if h < 24 && m < 60 => Ok(()),
        _ => Err(ValidationError::new("clock_time")),
    }
}

fn non_empty_cuisine(value: &[String]) -> Result<(), ValidationError> {
    if value.is_empty() || value.iter().any(|c| c.trim().is_empty()) {
        return Err(ValidationError::new("cuisine"));
    }
    Ok(())
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantCreate {
    #[validate(
        length(max = 100, message = "Name cannot be more than 100 characters"),
        custom(function = "not_blank", message = "Please add a restaurant name")
    )]
    pub name: String,
    #[validate(
        length(max = 500, message = "Description cannot be more than 500 characters"),
        custom(function = "not_blank", message = "Please add a description")
    )]
    pub description: String,
    #[validate(custom(
        function = "non_empty_cuisine",
        message = "Please add at least one cuisine type"
    ))]
    pub cuisine: Vec<String>,
    #[validate(nested)]
    pub address: Address,
    #[validate(nested)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(nested)]
    pub opening_hours: Option<OpeningHours>,
    #[validate(custom(
        function = "non_negative_amount",
        message = "Delivery fee cannot be negative"
    ))]
    pub delivery_fee: f64,
    #[validate(custom(
        function = "non_negative_amount",
        message = "Minimum order cannot be negative"
    ))]
    #[serde(default)]
    pub minimum_order: f64,
    /// Category ids ("category:xxx")
    #[serde(default)]
    pub categories: Vec<String>,
    /// Owner user id; only honoured for admins
    pub owner: Option<String>,
}

/// Update restaurant payload (rating fields are derived and not accepted)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RestaurantUpdate {
    #[validate(
        length(max = 100, message = "Name cannot be more than 100 characters"),
        custom(function = "not_blank", message = "Name cannot be empty")
    )]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(
        function = "non_empty_cuisine",
        message = "Please add at least one cuisine type"
    ))]
    pub cuisine: Option<Vec<String>>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(nested)]
    pub location: Option<GeoPoint>,
    pub images: Option<Vec<String>>,
    #[validate(nested)]
    pub opening_hours: Option<OpeningHours>,
    #[validate(custom(
        function = "non_negative_amount",
        message = "Delivery fee cannot be negative"
    ))]
    pub delivery_fee: Option<f64>,
    #[validate(custom(
        function = "non_negative_amount",
        message = "Minimum order cannot be negative"
    ))]
    pub minimum_order: Option<f64>,
    pub categories: Option<Vec<String>>,
    pub is_active: Option<bool>,
    /// Admin only
    pub is_verified: Option<bool>,
}

/// Query of GET /api/restaurants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantQuery {
    pub cuisine: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
