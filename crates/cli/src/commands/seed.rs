//! Demo data seeding for local development.

use persimmon_core::{Email, Username};
use persimmon_market::db::{ProductRepository, RepositoryError, UserRepository};
use persimmon_market::models::product::NewProduct;
use persimmon_market::models::user::NewUser;
use persimmon_market::services::auth::password;
use persimmon_market::{MIGRATOR, MarketConfig, create_pool};

struct DemoUser {
    email: &'static str,
    username: &'static str,
    password: &'static str,
    is_admin: bool,
    is_seller: bool,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        email: "admin@persimmon.local",
        username: "admin",
        password: "admin12345",
        is_admin: true,
        is_seller: false,
    },
    DemoUser {
        email: "seller@persimmon.local",
        username: "seller",
        password: "seller12345",
        is_admin: false,
        is_seller: true,
    },
    DemoUser {
        email: "buyer@persimmon.local",
        username: "buyer",
        password: "buyer12345",
        is_admin: false,
        is_seller: false,
    },
];

const DEMO_PRODUCTS: &[(&str, &str, f64, &str, i64)] = &[
    (
        "Walnut Desk Organizer",
        "Hand-finished walnut organizer with three compartments.",
        34.50,
        "home",
        12,
    ),
    (
        "Ceramic Pour-Over Set",
        "Stoneware dripper and carafe, seats four cups.",
        48.00,
        "kitchen",
        8,
    ),
    (
        "Linen Throw Blanket",
        "Stonewashed linen, 130x170cm.",
        62.00,
        "home",
        20,
    ),
];

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = MarketConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    MIGRATOR.run(&pool).await?;

    let users = UserRepository::new(&pool);
    let mut seller_id = None;

    for demo in DEMO_USERS {
        let new_user = NewUser {
            email: Email::parse(demo.email)?,
            username: Username::parse(demo.username)?,
            password_hash: password::hash(demo.password),
            is_admin: demo.is_admin,
            is_seller: demo.is_seller,
        };
        match users.create(&new_user).await {
            Ok(user) => {
                tracing::info!(email = demo.email, "Created user");
                if demo.is_seller {
                    seller_id = Some(user.id);
                }
            }
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!(email = demo.email, "User already exists, skipping");
                if demo.is_seller
                    && let Some(existing) = users.get_by_email(&Email::parse(demo.email)?).await?
                {
                    seller_id = Some(existing.id);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    let Some(seller_id) = seller_id else {
        tracing::warn!("No seller account available, skipping products");
        return Ok(());
    };

    let products = ProductRepository::new(&pool);
    let existing = products.all().await?;
    if !existing.is_empty() {
        tracing::info!(count = existing.len(), "Products already seeded, skipping");
        return Ok(());
    }

    for (name, description, price, category, stock) in DEMO_PRODUCTS {
        products
            .create(&NewProduct {
                name: (*name).to_owned(),
                description: (*description).to_owned(),
                price: *price,
                seller_id,
                category: (*category).to_owned(),
                image_url: String::new(),
                stock: *stock,
            })
            .await?;
        tracing::info!(name, "Created product");
    }

    tracing::info!("Seeding complete");
    Ok(())
}
