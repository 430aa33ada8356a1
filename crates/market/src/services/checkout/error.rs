//! Checkout error types.

use thiserror::Error;

use persimmon_core::ProductId;

use crate::db::RepositoryError;

/// Errors that can occur while managing the cart or committing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The referenced product does not exist (deleted between add-to-cart and
    /// checkout, or never existed).
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Not enough stock to satisfy the requested quantity.
    #[error("insufficient stock for product {product_id}: requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
    },

    /// Checkout was attempted with an empty cart (e.g. a repeated checkout
    /// after the first already committed and cleared it).
    #[error("cart is empty")]
    EmptyCart,

    /// Quantity must be positive.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}
