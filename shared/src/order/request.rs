//! Order request payloads

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::pricing::MAX_QUANTITY;
use super::types::{DeliveryAddress, OrderStatus, PaymentMethod, PaymentStatus};
use crate::models::{non_negative_amount, not_blank};

/// Customization chosen by the client; `price` is the client's snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomizationInput {
    #[validate(custom(function = "not_blank", message = "Customization name is required"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Customization option is required"))]
    pub option: String,
    pub price: Option<f64>,
}

fn quantity_in_range(quantity: u32) -> Result<(), ValidationError> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        let mut err = ValidationError::new("quantity");
        err.message = Some(format!("Quantity must be between 1 and {}", MAX_QUANTITY).into());
        return Err(err);
    }
    Ok(())
}

/// Line of a create / update order request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    /// Menu item id ("menu_item:xxx")
    pub menu_item: String,
    #[validate(custom(function = "quantity_in_range"))]
    pub quantity: u32,
    /// Unit price the client saw; compared against the catalog
    pub price: Option<f64>,
    #[serde(default)]
    #[validate(nested)]
    pub customizations: Vec<CustomizationInput>,
    #[validate(length(max = 200, message = "Special instructions cannot be more than 200 characters"))]
    pub special_instructions: Option<String>,
}

fn non_empty_items(items: &[OrderItemInput]) -> Result<(), ValidationError> {
    if items.is_empty() {
        let mut err = ValidationError::new("empty");
        err.message = Some("Order must contain at least one item".into());
        return Err(err);
    }
    Ok(())
}

fn validate_create(req: &CreateOrderRequest) -> Result<(), ValidationError> {
    non_empty_items(&req.items)
}

fn validate_update(req: &UpdateOrderRequest) -> Result<(), ValidationError> {
    req.items.as_deref().map_or(Ok(()), non_empty_items)
}

/// POST /api/orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create"))]
pub struct CreateOrderRequest {
    /// Restaurant id ("restaurant:xxx")
    pub restaurant: String,
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(nested)]
    pub delivery_address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    #[validate(custom(function = "non_negative_amount", message = "Tax cannot be negative"))]
    pub tax: Option<f64>,
    #[validate(custom(function = "non_negative_amount", message = "Tip cannot be negative"))]
    pub tip: Option<f64>,
}

/// PUT /api/orders/{id}, only while the order is pending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update"))]
pub struct UpdateOrderRequest {
    #[validate(nested)]
    pub items: Option<Vec<OrderItemInput>>,
    #[validate(nested)]
    pub delivery_address: Option<DeliveryAddress>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(custom(function = "non_negative_amount", message = "Tax cannot be negative"))]
    pub tax: Option<f64>,
    #[validate(custom(function = "non_negative_amount", message = "Tip cannot be negative"))]
    pub tip: Option<f64>,
}

/// PUT /api/orders/{id}/status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    /// Epoch millis, honoured when confirming
    pub estimated_delivery_time: Option<i64>,
    #[validate(length(max = 500, message = "Reason cannot be more than 500 characters"))]
    pub cancellation_reason: Option<String>,
}

/// PUT /api/orders/{id}/cancel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CancelOrderRequest {
    #[validate(length(max = 500, message = "Reason cannot be more than 500 characters"))]
    pub reason: Option<String>,
}

/// PUT /api/orders/{id}/payment-status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

/// Query of GET /api/orders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
