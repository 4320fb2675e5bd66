//! Order Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use shared::order::{DeliveryAddress, LineItem, OrderStatus, PaymentMethod, PaymentStatus};

/// Order record
///
/// `version` increases by one on every successful mutation; writers send the
/// version they read and lose with a conflict if it moved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Customer user id ("user:xxx")
    pub customer: String,
    /// Restaurant id ("restaurant:xxx")
    pub restaurant: String,
    #[serde(default)]
    pub delivery_partner: Option<String>,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub tip: f64,
    pub total: f64,
    pub delivery_address: DeliveryAddress,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub estimated_delivery_time: Option<i64>,
    #[serde(default)]
    pub actual_delivery_time: Option<i64>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn id_string(&self) -> String {
        serde_helpers::id_string(&self.id)
    }

    pub fn contains_menu_item(&self, menu_item: &str) -> bool {
        self.items.iter().any(|i| i.menu_item == menu_item)
    }
}

/// Fields written by a conditional order update (`MERGE` patch)
///
/// `version` and `updated_at` are always written; everything else only when set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_partner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    /// `Some(None)` clears the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Option<String>>,
    pub version: u64,
    pub updated_at: i64,
}

/// Which orders a caller may list
#[derive(Debug, Clone)]
pub enum OrderScope {
    All,
    Customer(String),
    Restaurants(Vec<String>),
    /// Assigned to the partner, plus unassigned orders ready for pickup
    DeliveryPartner(String),
}
