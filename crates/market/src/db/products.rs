//! Product repository for database operations.
//!
//! `fetch_product` and `decrement_stock` are generic over the executor so
//! checkout can run them inside its transaction; the repository methods
//! delegate to them with the pool.

use sqlx::{Sqlite, SqlitePool};

use persimmon_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product};

/// Raw `products` row.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    seller_id: i64,
    category: String,
    image_url: String,
    stock: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            seller_id: UserId::new(row.seller_id),
            category: row.category,
            image_url: row.image_url,
            stock: row.stock,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, seller_id, category, image_url, stock";

/// Fetch a product by ID on any executor (pool or open transaction).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn fetch_product<'e, E>(
    executor: E,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id.as_i64())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Product::from))
}

/// Conditionally decrement a product's stock.
///
/// The guard `stock >= quantity` is evaluated atomically by the UPDATE
/// itself; the returned row count is 0 when stock was insufficient (or the
/// product is gone), and callers must treat that as failure rather than
/// assume the decrement happened.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn decrement_stock<'e, E>(
    executor: E,
    id: ProductId,
    quantity: i64,
) -> Result<u64, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result =
        sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?")
            .bind(quantity)
            .bind(id.as_i64())
            .bind(quantity)
            .execute(executor)
            .await?;

    Ok(result.rows_affected())
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_product: &NewProduct) -> Result<Product, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO products (name, description, price, seller_id, category, \
             image_url, stock) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_product.name)
        .bind(&new_product.description)
        .bind(new_product.price)
        .bind(new_product.seller_id.as_i64())
        .bind(&new_product.category)
        .bind(&new_product.image_url)
        .bind(new_product.stock)
        .execute(self.pool)
        .await?;

        Ok(Product {
            id: ProductId::new(result.last_insert_rowid()),
            name: new_product.name.clone(),
            description: new_product.description.clone(),
            price: new_product.price,
            seller_id: new_product.seller_id,
            category: new_product.category.clone(),
            image_url: new_product.image_url.clone(),
            stock: new_product.stock,
        })
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        fetch_product(self.pool, id).await
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite a product's stock level (seller restock).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_stock(&self, id: ProductId, stock: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET stock = ? WHERE id = ?")
            .bind(stock)
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Conditionally decrement stock outside a transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn decrement_stock(
        &self,
        id: ProductId,
        quantity: i64,
    ) -> Result<u64, RepositoryError> {
        decrement_stock(self.pool, id, quantity).await
    }
}
