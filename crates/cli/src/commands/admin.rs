//! User account management commands.

use persimmon_core::UserId;
use persimmon_market::db::{RepositoryError, UserRepository};
use persimmon_market::services::auth::password;
use persimmon_market::{ConfigError, MarketConfig, create_pool};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("no user with id {0}")]
    UserNotFound(i64),

    #[error("password must be at least 8 characters")]
    PasswordTooShort,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

async fn connect() -> Result<sqlx::SqlitePool, AdminError> {
    let config = MarketConfig::from_env()?;
    Ok(create_pool(&config.database_url).await?)
}

pub async fn set_suspended(user: i64, suspended: bool) -> Result<(), AdminError> {
    let pool = connect().await?;
    let user_id = UserId::new(user);

    match UserRepository::new(&pool).set_suspended(user_id, suspended).await {
        Ok(()) => {
            let verb = if suspended { "Suspended" } else { "Unsuspended" };
            tracing::info!(%user_id, "{verb} account");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(AdminError::UserNotFound(user)),
        Err(e) => Err(e.into()),
    }
}

pub async fn set_role(user: i64, is_admin: bool, is_seller: bool) -> Result<(), AdminError> {
    let pool = connect().await?;
    let user_id = UserId::new(user);

    match UserRepository::new(&pool)
        .update_role(user_id, is_admin, is_seller)
        .await
    {
        Ok(()) => {
            tracing::info!(%user_id, is_admin, is_seller, "Updated roles");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(AdminError::UserNotFound(user)),
        Err(e) => Err(e.into()),
    }
}

pub async fn reset_password(user: i64, new_password: &str) -> Result<(), AdminError> {
    if new_password.len() < 8 {
        return Err(AdminError::PasswordTooShort);
    }

    let pool = connect().await?;
    let user_id = UserId::new(user);
    let hash = password::hash(new_password);

    match UserRepository::new(&pool).reset_password(user_id, &hash).await {
        Ok(()) => {
            tracing::info!(%user_id, "Password reset");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(AdminError::UserNotFound(user)),
        Err(e) => Err(e.into()),
    }
}
