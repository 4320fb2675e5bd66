//! Order Module
//!
//! Types shared by the order lifecycle engine and the client cart:
//! - Value types: status enums, line items, delivery address
//! - Requests: create / update / status payloads
//! - Pricing: subtotal and total derivation

pub mod pricing;
pub mod request;
pub mod types;

// Re-exports
pub use pricing::{OrderTotals, PricedLine, compute_totals};
pub use request::{
    CancelOrderRequest, CreateOrderRequest, CustomizationInput, OrderItemInput, OrderQuery,
    PaymentStatusRequest, StatusUpdateRequest, UpdateOrderRequest,
};
pub use types::{
    DeliveryAddress, LineItem, OrderStatus, PaymentMethod, PaymentStatus, SelectedCustomization,
};
