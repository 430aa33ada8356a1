//! Order repository for database operations.
//!
//! Orders are created exclusively by the checkout transaction; this
//! repository covers reads (order history, seller dashboards) and the one
//! permitted mutation, the status change.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use persimmon_core::{OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, SalesStats};

/// Raw `orders` row (items loaded separately).
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    order_date: DateTime<Utc>,
    status: String,
    total_amount: f64,
}

/// Raw `order_items` row.
#[derive(sqlx::FromRow)]
struct OrderItemRow {
    product_id: i64,
    product_name: String,
    quantity: i64,
    price: f64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    OrderStatus::from_str(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid status in database: {e}")))
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    async fn items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT product_id, product_name, quantity, price \
             FROM order_items WHERE order_id = ? ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn hydrate(&self, row: OrderRow) -> Result<Order, RepositoryError> {
        let items = self.items_for_order(row.id).await?;

        Ok(Order {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            order_date: row.order_date,
            status: parse_status(&row.status)?,
            total_amount: row.total_amount,
            items,
        })
    }

    async fn hydrate_all(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    /// Get one order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the row does not parse.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, order_date, status, total_amount FROM orders WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(self.hydrate(r).await?)),
            None => Ok(None),
        }
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if any row does not parse.
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, order_date, status, total_amount \
             FROM orders WHERE user_id = ? ORDER BY order_date DESC",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// A user's orders filtered by status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if any row does not parse.
    pub async fn orders_by_status(
        &self,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, order_date, status, total_amount \
             FROM orders WHERE user_id = ? AND status = ? ORDER BY order_date DESC",
        )
        .bind(user_id.as_i64())
        .bind(status.to_string())
        .fetch_all(self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// A user's orders within `[from, to]`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if any row does not parse.
    pub async fn orders_in_range(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, order_date, status, total_amount \
             FROM orders WHERE user_id = ? AND order_date BETWEEN ? AND ? \
             ORDER BY order_date DESC",
        )
        .bind(user_id.as_i64())
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// Move an order to a new status (seller/admin action).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Aggregate sales figures across all orders (seller dashboard).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_stats(&self) -> Result<SalesStats, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct StatsRow {
            total_sales: f64,
            total_orders: i64,
        }

        let row = sqlx::query_as::<_, StatsRow>(
            "SELECT COALESCE(SUM(total_amount), 0.0) AS total_sales, \
             COUNT(*) AS total_orders FROM orders",
        )
        .fetch_one(self.pool)
        .await?;

        #[allow(clippy::cast_precision_loss)]
        let average_order_value = if row.total_orders == 0 {
            0.0
        } else {
            row.total_sales / row.total_orders as f64
        };

        Ok(SalesStats {
            total_sales: row.total_sales,
            total_orders: row.total_orders,
            average_order_value,
        })
    }
}
