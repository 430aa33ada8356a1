//! Review repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use persimmon_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::review::{NewReview, Review};

/// Raw `reviews` row.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    product_id: i64,
    user_id: i64,
    rating: i64,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            product_id: ProductId::new(row.product_id),
            user_id: UserId::new(row.user_id),
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

const REVIEW_COLUMNS: &str = "id, product_id, user_id, rating, comment, created_at";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already reviewed this
    /// product. Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, new_review: &NewReview) -> Result<Review, RepositoryError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO reviews (product_id, user_id, rating, comment, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_review.product_id.as_i64())
        .bind(new_review.user_id.as_i64())
        .bind(new_review.rating)
        .bind(&new_review.comment)
        .bind(created_at)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "user already reviewed this product".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(Review {
            id: ReviewId::new(result.last_insert_rowid()),
            product_id: new_review.product_id,
            user_id: new_review.user_id,
            rating: new_review.rating,
            comment: new_review.comment.clone(),
            created_at,
        })
    }

    /// Edit an existing review's rating and comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ReviewId,
        rating: i64,
        comment: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE reviews SET rating = ?, comment = ? WHERE id = ?")
            .bind(rating)
            .bind(comment)
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a review.
    ///
    /// # Returns
    ///
    /// Returns `true` if the review was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ReviewId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn reviews_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = ? \
             ORDER BY created_at DESC"
        ))
        .bind(product_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// The review a user left on a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn review_by_user(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE user_id = ? AND product_id = ?"
        ))
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Review::from))
    }

    /// Average star rating for a product, `None` when unreviewed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn average_rating(
        &self,
        product_id: ProductId,
    ) -> Result<Option<f64>, RepositoryError> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE product_id = ?")
                .bind(product_id.as_i64())
                .fetch_one(self.pool)
                .await?;

        Ok(avg)
    }

    /// Whether the user has a committed order containing this product.
    ///
    /// Reviews are restricted to purchasers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn user_has_purchased(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders o \
             JOIN order_items oi ON oi.order_id = o.id \
             WHERE o.user_id = ? AND oi.product_id = ?",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }
}
