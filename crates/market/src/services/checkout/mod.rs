//! Cart and checkout service.
//!
//! `create_order` is the one multi-step invariant-preserving sequence in the
//! system: stock validation, the order insert, per-line stock decrements and
//! snapshots, and the cart clear all commit atomically or not at all.

mod error;

pub use error::CheckoutError;

use chrono::Utc;
use sqlx::SqlitePool;

use persimmon_core::{CartItemId, OrderId, OrderStatus, ProductId, UserId};

use crate::db::cart::{self, CartRepository};
use crate::db::products::{self, fetch_product};
use crate::models::cart::CartItem;

/// Cart and order transaction manager.
pub struct CheckoutService {
    pool: SqlitePool,
}

impl CheckoutService {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a product to a user's cart, snapshotting the current price.
    ///
    /// Stock is checked here against the requested quantity, but nothing is
    /// reserved; the window between add-to-cart and checkout is resolved by
    /// the conditional decrement at commit time.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidQuantity` for non-positive quantities,
    /// `CheckoutError::ProductNotFound` if the product doesn't exist and
    /// `CheckoutError::InsufficientStock` if stock is short right now.
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartItem, CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let product = fetch_product(&self.pool, product_id)
            .await?
            .ok_or(CheckoutError::ProductNotFound(product_id))?;

        if product.stock < quantity {
            tracing::debug!(
                %product_id,
                available = product.stock,
                requested = quantity,
                "add to cart rejected: insufficient stock"
            );
            return Err(CheckoutError::InsufficientStock {
                product_id,
                requested: quantity,
            });
        }

        let item = CartRepository::new(&self.pool)
            .add_item(user_id, product_id, quantity, product.price)
            .await?;

        tracing::debug!(%user_id, %product_id, quantity, "added to cart");
        Ok(item)
    }

    /// Convert a user's cart into an order.
    ///
    /// Runs as one SQLite transaction: compute the total from the cart's
    /// price snapshots, insert the `Pending` order, then per line re-fetch
    /// the product, apply the conditional stock decrement (zero rows affected
    /// means someone else got the stock first) and insert the order-item
    /// snapshot; finally clear the whole cart and commit. Any failure rolls
    /// the entire sequence back; no partial order, decrement or cart state is
    /// ever observable.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the user has nothing to check
    /// out, `CheckoutError::ProductNotFound` if a product was deleted since
    /// it was added, and `CheckoutError::InsufficientStock` if a conditional
    /// decrement finds the guard no longer holds.
    pub async fn create_order(&self, user_id: UserId) -> Result<OrderId, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let lines = cart::items_for_user(&mut *tx, user_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total_amount: f64 = lines.iter().map(CartItem::subtotal).sum();

        let order_date = Utc::now();
        let result = sqlx::query(
            "INSERT INTO orders (user_id, order_date, status, total_amount) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id.as_i64())
        .bind(order_date)
        .bind(OrderStatus::Pending.to_string())
        .bind(total_amount)
        .execute(&mut *tx)
        .await?;
        let order_id = OrderId::new(result.last_insert_rowid());

        for line in &lines {
            let product_id = line.product_id;

            // Re-fetch inside the transaction: the product may have been
            // deleted since add-to-cart, and the name snapshot comes from
            // its state at commit time.
            let product = fetch_product(&mut *tx, product_id)
                .await?
                .ok_or(CheckoutError::ProductNotFound(product_id))?;

            let affected = products::decrement_stock(&mut *tx, product_id, line.quantity).await?;
            if affected == 0 {
                tracing::warn!(
                    %order_id,
                    %product_id,
                    requested = line.quantity,
                    "checkout aborted: stock guard failed"
                );
                return Err(CheckoutError::InsufficientStock {
                    product_id,
                    requested: line.quantity,
                });
            }

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, quantity, price) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(order_id.as_i64())
            .bind(product_id.as_i64())
            .bind(&product.name)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        // Full cart clear for the user, not per-line.
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%user_id, %order_id, total_amount, "order created");
        Ok(order_id)
    }

    /// A user's current cart lines.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartItem>, CheckoutError> {
        Ok(CartRepository::new(&self.pool)
            .items_for_user(user_id)
            .await?)
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidQuantity` for non-positive quantities
    /// and `CheckoutError::Repository` if the line doesn't exist.
    pub async fn update_cart_quantity(
        &self,
        id: CartItemId,
        quantity: i64,
    ) -> Result<(), CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }
        Ok(CartRepository::new(&self.pool)
            .update_quantity(id, quantity)
            .await?)
    }

    /// Remove one line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the query fails.
    pub async fn remove_from_cart(&self, id: CartItemId) -> Result<bool, CheckoutError> {
        Ok(CartRepository::new(&self.pool).remove_item(id).await?)
    }
}
