//! Reviews and rating aggregation

pub mod aggregator;
pub mod service;

pub use aggregator::{RatingAggregator, aggregate_ratings};
pub use service::ReviewService;
