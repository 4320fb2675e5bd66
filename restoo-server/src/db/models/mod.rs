//! Database Models
//!
//! Persisted entities. References to other records are stored as
//! "table:key" strings; the record's own `id` is a [`surrealdb::RecordId`]
//! rendered as "table:key" in JSON.

pub mod serde_helpers;

pub mod category;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod user;

pub use category::{Category, CategoryPatch};
pub use menu_item::{MenuItem, MenuItemPatch};
pub use order::{Order, OrderPatch, OrderScope};
pub use restaurant::{Restaurant, RestaurantFilter, RestaurantPatch};
pub use review::{RatingSummary, Review, ReviewPatch};
pub use user::{User, UserDetailsPatch};
