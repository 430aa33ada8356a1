//! Shared helpers for integration tests.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use persimmon_core::{Email, UserId, Username};
use persimmon_market::db::{MIGRATOR, ProductRepository, UserRepository};
use persimmon_market::models::product::{NewProduct, Product};
use persimmon_market::models::user::{NewUser, User};
use persimmon_market::services::auth::password;

/// Fresh in-memory database with the schema applied.
///
/// A single connection keeps every query on the same `:memory:` database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

pub async fn seed_user(pool: &SqlitePool, email: &str, username: &str, password: &str) -> User {
    UserRepository::new(pool)
        .create(&NewUser {
            email: Email::parse(email).expect("valid email"),
            username: Username::parse(username).expect("valid username"),
            password_hash: password::hash(password),
            is_admin: false,
            is_seller: true,
        })
        .await
        .expect("seed user")
}

pub async fn seed_product(
    pool: &SqlitePool,
    seller_id: UserId,
    name: &str,
    price: f64,
    stock: i64,
) -> Product {
    ProductRepository::new(pool)
        .create(&NewProduct {
            name: name.to_owned(),
            description: format!("{name} description"),
            price,
            seller_id,
            category: "misc".to_owned(),
            image_url: String::new(),
            stock,
        })
        .await
        .expect("seed product")
}
