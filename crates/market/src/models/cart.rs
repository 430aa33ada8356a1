//! Cart domain types.

use serde::Serialize;

use persimmon_core::{CartItemId, ProductId, UserId};

/// A line in a user's shopping cart.
///
/// `price` is snapshotted from the product at add-to-cart time and is the
/// price the order line will carry; it is not re-read at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: f64,
}

impl CartItem {
    /// Line subtotal (`price * quantity`).
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            self.price * self.quantity as f64
        }
    }
}
