//! Cart-to-order reconciliation
//!
//! Turns the client's line items into persisted [`LineItem`]s. Unit prices
//! and customization deltas always come from the catalog; a client price
//! that drifted more than 0.01 from it fails the whole request.

use async_trait::async_trait;
use shared::order::pricing::amounts_match;
use shared::order::{LineItem, OrderItemInput, SelectedCustomization};

use crate::db::models::MenuItem;
use crate::db::repository::MenuItemRepository;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Where menu items are looked up during reconciliation
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn menu_item(&self, id: &str) -> AppResult<Option<MenuItem>>;
}

#[async_trait]
impl CatalogSource for MenuItemRepository {
    async fn menu_item(&self, id: &str) -> AppResult<Option<MenuItem>> {
        Ok(self.find_by_id(id).await?)
    }
}

fn price_changed(subject: &str, client: f64, catalog: f64) -> AppError {
    AppError::with_message(
        ErrorCode::PriceChanged,
        format!(
            "Price of {} changed from {:.2} to {:.2}, please review your order",
            subject, client, catalog
        ),
    )
    .with_detail("item", subject)
    .with_detail("client_price", client)
    .with_detail("current_price", catalog)
}

fn reconcile_customizations(
    item: &MenuItem,
    input: &OrderItemInput,
) -> AppResult<Vec<SelectedCustomization>> {
    let mut selected: Vec<SelectedCustomization> = Vec::with_capacity(input.customizations.len());

    for choice in &input.customizations {
        let not_offered = || {
            AppError::with_message(
                ErrorCode::CustomizationNotFound,
                format!(
                    "{} does not offer {}: {}",
                    item.name, choice.name, choice.option
                ),
            )
            .with_detail("menu_item", item.id_string())
        };
        let group = item.customization_group(&choice.name).ok_or_else(not_offered)?;
        let price = group.option_price(&choice.option).ok_or_else(not_offered)?;

        if !group.multiple && selected.iter().any(|s| s.name == group.name) {
            return Err(AppError::validation(format!(
                "Only one option can be chosen for {}",
                group.name
            )));
        }
        if let Some(client) = choice.price
            && !amounts_match(client, price)
        {
            return Err(price_changed(
                &format!("{} ({})", item.name, choice.option),
                client,
                price,
            ));
        }

        selected.push(SelectedCustomization {
            name: group.name.clone(),
            option: choice.option.clone(),
            price,
        });
    }

    if let Some(missing) = item
        .customization_options
        .iter()
        .find(|g| g.required && !selected.iter().any(|s| s.name == g.name))
    {
        return Err(AppError::validation(format!(
            "Please choose an option for {}",
            missing.name
        ))
        .with_detail("menu_item", item.id_string()));
    }

    Ok(selected)
}

/// Resolve every input line against the catalog of `restaurant`
pub async fn reconcile_items<C: CatalogSource + ?Sized>(
    catalog: &C,
    restaurant: &str,
    inputs: &[OrderItemInput],
) -> AppResult<Vec<LineItem>> {
    if inputs.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let mut lines = Vec::with_capacity(inputs.len());
    for input in inputs {
        let item = catalog.menu_item(&input.menu_item).await?.ok_or_else(|| {
            AppError::new(ErrorCode::MenuItemNotFound).with_detail("menu_item", input.menu_item.clone())
        })?;

        if item.restaurant != restaurant {
            return Err(AppError::with_message(
                ErrorCode::MenuItemWrongRestaurant,
                format!("{} is not on this restaurant's menu", item.name),
            )
            .with_detail("menu_item", item.id_string()));
        }
        if !item.is_available {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("{} is currently unavailable", item.name),
            )
            .with_detail("menu_item", item.id_string()));
        }
        if let Some(client) = input.price
            && !amounts_match(client, item.price)
        {
            return Err(price_changed(&item.name, client, item.price));
        }

        let customizations = reconcile_customizations(&item, input)?;
        lines.push(LineItem {
            menu_item: item.id_string(),
            name: item.name.clone(),
            quantity: input.quantity,
            price: item.price,
            customizations,
            special_instructions: input
                .special_instructions
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        });
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CustomizationChoice, CustomizationGroup, DietaryInfo};
    use shared::order::CustomizationInput;
    use std::collections::HashMap;
    use surrealdb::RecordId;

    struct FakeCatalog {
        items: HashMap<String, MenuItem>,
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn menu_item(&self, id: &str) -> AppResult<Option<MenuItem>> {
            Ok(self.items.get(id).cloned())
        }
    }

    fn menu_item(key: &str, restaurant: &str, price: f64) -> MenuItem {
        MenuItem {
            id: Some(RecordId::from_table_key("menu_item", key)),
            name: key.to_string(),
            restaurant: restaurant.to_string(),
            category: "category:mains".to_string(),
            description: String::new(),
            price,
            image: None,
            ingredients: vec![],
            dietary_info: DietaryInfo::default(),
            preparation_time: 10,
            is_available: true,
            customization_options: vec![CustomizationGroup {
                name: "Size".to_string(),
                options: vec![
                    CustomizationChoice {
                        name: "Regular".to_string(),
                        price: 0.0,
                    },
                    CustomizationChoice {
                        name: "Large".to_string(),
                        price: 2.5,
                    },
                ],
                required: false,
                multiple: false,
            }],
            rating: 0.0,
            total_ratings: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn catalog(items: Vec<MenuItem>) -> FakeCatalog {
        FakeCatalog {
            items: items.into_iter().map(|i| (i.id_string(), i)).collect(),
        }
    }

    fn input(menu_item: &str, quantity: u32, price: Option<f64>) -> OrderItemInput {
        OrderItemInput {
            menu_item: menu_item.to_string(),
            quantity,
            price,
            customizations: vec![],
            special_instructions: None,
        }
    }

    #[tokio::test]
    async fn test_prices_come_from_catalog() {
        let catalog = catalog(vec![menu_item("pizza", "restaurant:r1", 10.0)]);
        let lines = reconcile_items(&catalog, "restaurant:r1", &[input("menu_item:pizza", 2, None)])
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].price, 10.0);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].menu_item, "menu_item:pizza");
    }

    #[tokio::test]
    async fn test_price_within_tolerance_accepted() {
        let catalog = catalog(vec![menu_item("pizza", "restaurant:r1", 10.0)]);
        let lines = reconcile_items(
            &catalog,
            "restaurant:r1",
            &[input("menu_item:pizza", 1, Some(10.005))],
        )
        .await
        .unwrap();
        assert_eq!(lines[0].price, 10.0);
    }

    #[tokio::test]
    async fn test_price_changed_rejected() {
        let catalog = catalog(vec![menu_item("pizza", "restaurant:r1", 12.0)]);
        let err = reconcile_items(
            &catalog,
            "restaurant:r1",
            &[input("menu_item:pizza", 1, Some(10.0))],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PriceChanged);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_item_of_other_restaurant_rejected() {
        let catalog = catalog(vec![menu_item("sushi", "restaurant:r2", 8.0)]);
        let err = reconcile_items(&catalog, "restaurant:r1", &[input("menu_item:sushi", 1, None)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemWrongRestaurant);
    }

    #[tokio::test]
    async fn test_unavailable_and_missing_items() {
        let mut item = menu_item("pizza", "restaurant:r1", 10.0);
        item.is_available = false;
        let catalog = catalog(vec![item]);

        let err = reconcile_items(&catalog, "restaurant:r1", &[input("menu_item:pizza", 1, None)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemUnavailable);

        let err = reconcile_items(&catalog, "restaurant:r1", &[input("menu_item:nope", 1, None)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }

    #[tokio::test]
    async fn test_customizations_captured() {
        let catalog = catalog(vec![menu_item("pizza", "restaurant:r1", 10.0)]);
        let mut line = input("menu_item:pizza", 2, None);
        line.customizations = vec![CustomizationInput {
            name: "Size".into(),
            option: "Large".into(),
            price: Some(2.5),
        }];

        let lines = reconcile_items(&catalog, "restaurant:r1", &[line.clone()])
            .await
            .unwrap();
        assert_eq!(lines[0].customizations.len(), 1);
        assert_eq!(lines[0].customizations[0].price, 2.5);

        line.customizations[0].option = "Huge".into();
        let err = reconcile_items(&catalog, "restaurant:r1", &[line])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CustomizationNotFound);
    }

    #[tokio::test]
    async fn test_single_choice_group_rejects_two_options() {
        let catalog = catalog(vec![menu_item("pizza", "restaurant:r1", 10.0)]);
        let mut line = input("menu_item:pizza", 1, None);
        line.customizations = ["Regular", "Large"]
            .into_iter()
            .map(|o| CustomizationInput {
                name: "Size".into(),
                option: o.into(),
                price: None,
            })
            .collect();

        let err = reconcile_items(&catalog, "restaurant:r1", &[line])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_required_group_must_be_chosen() {
        let mut item = menu_item("pizza", "restaurant:r1", 10.0);
        item.customization_options[0].required = true;
        let catalog = catalog(vec![item]);

        let err = reconcile_items(&catalog, "restaurant:r1", &[input("menu_item:pizza", 1, None)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let catalog = catalog(vec![]);
        let err = reconcile_items(&catalog, "restaurant:r1", &[])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }
}
