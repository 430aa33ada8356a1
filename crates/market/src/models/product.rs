//! Product domain types.

use serde::Serialize;

use persimmon_core::{ProductId, UserId};

/// A product listed by a seller.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Current list price. Cart and order lines snapshot this value.
    pub price: f64,
    pub seller_id: UserId,
    pub category: String,
    pub image_url: String,
    /// Remaining stock; decremented conditionally at checkout.
    pub stock: i64,
}

/// Fields required to list a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub seller_id: UserId,
    pub category: String,
    pub image_url: String,
    pub stock: i64,
}
