//! Restaurant Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use shared::models::{Address, GeoPoint, OpeningHours};

/// Restaurant record
///
/// `rating` / `total_ratings` are written only by the rating aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Owner user id ("user:xxx")
    pub owner: String,
    pub description: String,
    pub cuisine: Vec<String>,
    pub address: Address,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    pub delivery_fee: f64,
    #[serde(default)]
    pub minimum_order: f64,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    /// Category ids ("category:xxx")
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }
}

/// Partial update of a restaurant (`MERGE` patch)
#[derive(Debug, Clone, Default, Serialize)]
pub struct RestaurantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_order: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    pub updated_at: i64,
}

/// Filters of the public restaurant listing
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub cuisine: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub include_inactive: bool,
    pub limit: u32,
    pub offset: u32,
}
