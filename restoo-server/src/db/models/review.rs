//! Review Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Review record, unique per (order, user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Author user id
    pub user: String,
    pub restaurant: String,
    #[serde(default)]
    pub menu_item: Option<String>,
    pub order: String,
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    pub comment: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Review {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub updated_at: i64,
}

/// Average and count of a set of ratings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    pub rating: f64,
    pub total_ratings: u32,
}
