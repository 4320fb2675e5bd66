//! Order lifecycle engine
//!
//! - [`lifecycle`] - status graph and per-edge authorization
//! - [`payment`] - payment status transitions
//! - [`reconcile`] - client line items → catalog-priced line items
//! - [`OrderService`] - create / update / transition with optimistic versioning

pub mod lifecycle;
pub mod payment;
pub mod reconcile;
pub mod service;

pub use lifecycle::{Actor, authorize_transition};
pub use reconcile::CatalogSource;
pub use service::OrderService;
