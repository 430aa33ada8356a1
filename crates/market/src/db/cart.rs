//! Cart repository for database operations.
//!
//! `items_for_user` is generic over the executor so checkout can read the
//! cart inside its transaction; the repository method delegates to it with
//! the pool.

use sqlx::{Sqlite, SqlitePool};

use persimmon_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartItem;

/// Raw `cart_items` row.
#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    price: f64,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// List a user's cart lines on any executor (pool or open transaction).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn items_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<Vec<CartItem>, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, CartItemRow>(
        "SELECT id, user_id, product_id, quantity, price \
         FROM cart_items WHERE user_id = ? ORDER BY id ASC",
    )
    .bind(user_id.as_i64())
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(CartItem::from).collect())
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a cart line with the given price snapshot.
    ///
    /// Stock validation is the caller's job (checkout re-validates at commit
    /// anyway).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
        price: f64,
    ) -> Result<CartItem, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, quantity, price) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(quantity)
        .bind(price)
        .execute(self.pool)
        .await?;

        Ok(CartItem {
            id: CartItemId::new(result.last_insert_rowid()),
            user_id,
            product_id,
            quantity,
            price,
        })
    }

    /// List a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for_user(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        items_for_user(self.pool, user_id).await
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_quantity(
        &self,
        id: CartItemId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cart_items SET quantity = ? WHERE id = ?")
            .bind(quantity)
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove one cart line.
    ///
    /// # Returns
    ///
    /// Returns `true` if the line was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every cart line for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
