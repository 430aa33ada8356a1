//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use persimmon_core::{ProductId, ReviewId, UserId};

/// A product review left by a purchaser.
///
/// At most one review exists per (user, product) pair.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Star rating, 1 through 5.
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: i64,
    pub comment: String,
}
