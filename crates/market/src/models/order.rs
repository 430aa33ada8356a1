//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use persimmon_core::{OrderId, OrderStatus, ProductId, UserId};

/// A committed order with its line items.
///
/// `total_amount` is computed once at creation from the cart snapshots and is
/// never recomputed; `status` is the only field that changes afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub items: Vec<OrderItem>,
}

/// A single order line.
///
/// `product_name` and `price` are snapshots taken when the order committed;
/// later changes to the product do not affect them.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
}

impl OrderItem {
    /// Line subtotal (`price * quantity`).
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            self.price * self.quantity as f64
        }
    }
}

/// Aggregate sales figures for the seller dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SalesStats {
    pub total_sales: f64,
    pub total_orders: i64,
    pub average_order_value: f64,
}
