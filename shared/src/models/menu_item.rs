//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{non_negative_amount, not_blank};

/// Declared allergens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Dairy,
    Eggs,
    Fish,
    Shellfish,
    TreeNuts,
    Peanuts,
    Wheat,
    Soy,
}

/// Dietary flags of a menu item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryInfo {
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
}

/// One selectable option inside a customization group, e.g. "Large" (+2.00)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomizationChoice {
    #[validate(custom(function = "not_blank", message = "Option name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(
        function = "non_negative_amount",
        message = "Option price cannot be negative"
    ))]
    pub price: f64,
}

/// A customization group, e.g. "Size" with options Small / Large
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "group_has_options"))]
pub struct CustomizationGroup {
    #[validate(custom(function = "not_blank", message = "Customization name is required"))]
    pub name: String,
    #[validate(nested)]
    pub options: Vec<CustomizationChoice>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
}

impl CustomizationGroup {
    /// Price delta of the named option, if offered
    pub fn option_price(&self, option: &str) -> Option<f64> {
        self.options
            .iter()
            .find(|o| o.name == option)
            .map(|o| o.price)
    }
}

fn group_has_options(group: &CustomizationGroup) -> Result<(), ValidationError> {
    if group.options.is_empty() {
        let mut err = ValidationError::new("empty_group");
        err.message = Some("Customization needs at least one option".into());
        return Err(err);
    }
    Ok(())
}

fn unique_group_names(groups: &[CustomizationGroup]) -> Result<(), ValidationError> {
    let mut names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    names.sort_unstable();
    if names.windows(2).any(|w| w[0] == w[1]) {
        let mut err = ValidationError::new("duplicate_group");
        err.message = Some("Customization names must be unique".into());
        return Err(err);
    }
    Ok(())
}

fn validate_create_groups(item: &MenuItemCreate) -> Result<(), ValidationError> {
    unique_group_names(&item.customization_options)
}

fn validate_update_groups(item: &MenuItemUpdate) -> Result<(), ValidationError> {
    item.customization_options
        .as_deref()
        .map_or(Ok(()), unique_group_names)
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_groups"))]
pub struct MenuItemCreate {
    #[validate(
        length(max = 100, message = "Name cannot be more than 100 characters"),
        custom(function = "not_blank", message = "Please add a menu item name")
    )]
    pub name: String,
    /// Restaurant id; filled from the path on POST /api/restaurants/{id}/menu
    pub restaurant: Option<String>,
    /// Category id ("category:xxx")
    pub category: String,
    #[validate(
        length(max = 500, message = "Description cannot be more than 500 characters"),
        custom(function = "not_blank", message = "Please add a description")
    )]
    pub description: String,
    #[validate(custom(function = "non_negative_amount", message = "Price cannot be negative"))]
    pub price: f64,
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary_info: DietaryInfo,
    #[validate(range(max = 600, message = "Preparation time cannot exceed 600 minutes"))]
    #[serde(default)]
    pub preparation_time: u32,
    #[serde(default)]
    #[validate(nested)]
    pub customization_options: Vec<CustomizationGroup>,
}

/// Update menu item payload (rating fields are derived and not accepted)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_groups"))]
pub struct MenuItemUpdate {
    #[validate(
        length(max = 100, message = "Name cannot be more than 100 characters"),
        custom(function = "not_blank", message = "Name cannot be empty")
    )]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(length(max = 500, message = "Description cannot be more than 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_amount", message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub image: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub dietary_info: Option<DietaryInfo>,
    #[validate(range(max = 600, message = "Preparation time cannot exceed 600 minutes"))]
    pub preparation_time: Option<u32>,
    pub is_available: Option<bool>,
    #[validate(nested)]
    pub customization_options: Option<Vec<CustomizationGroup>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_group() -> CustomizationGroup {
        CustomizationGroup {
            name: "Size".into(),
            options: vec![
                CustomizationChoice {
                    name: "Small".into(),
                    price: 0.0,
                },
                CustomizationChoice {
                    name: "Large".into(),
                    price: 2.0,
                },
            ],
            required: true,
            multiple: false,
        }
    }

    #[test]
    fn test_option_price_lookup() {
        let group = size_group();
        assert_eq!(group.option_price("Large"), Some(2.0));
        assert_eq!(group.option_price("Huge"), None);
    }

    #[test]
    fn test_duplicate_group_names_rejected() {
        let item = MenuItemCreate {
            name: "Margherita".into(),
            restaurant: None,
            category: "category:pizza".into(),
            description: "Tomato, mozzarella, basil".into(),
            price: 10.0,
            image: None,
            ingredients: vec![],
            dietary_info: DietaryInfo::default(),
            preparation_time: 15,
            customization_options: vec![size_group(), size_group()],
        };
        let err = item.validate().unwrap_err();
        assert!(err.errors().contains_key("__all__"));
    }

    #[test]
    fn test_allergen_serde() {
        let json = serde_json::to_string(&Allergen::TreeNuts).unwrap();
        assert_eq!(json, "\"tree_nuts\"");
    }
}
