//! Menu Item Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use shared::models::{CustomizationGroup, DietaryInfo};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Restaurant id ("restaurant:xxx")
    pub restaurant: String,
    /// Category id ("category:xxx")
    pub category: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary_info: DietaryInfo,
    #[serde(default)]
    pub preparation_time: u32,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    #[serde(default)]
    pub customization_options: Vec<CustomizationGroup>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }

    pub fn customization_group(&self, name: &str) -> Option<&CustomizationGroup> {
        self.customization_options.iter().find(|g| g.name == name)
    }
}

/// Partial update of a menu item (`MERGE` patch)
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_info: Option<DietaryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization_options: Option<Vec<CustomizationGroup>>,
    pub updated_at: i64,
}
