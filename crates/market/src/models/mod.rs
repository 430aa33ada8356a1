//! Domain types.
//!
//! These types represent validated domain objects separate from database row
//! types; repositories convert rows into them and surface `DataCorruption`
//! when stored data does not parse.

pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use cart::CartItem;
pub use order::{Order, OrderItem, SalesStats};
pub use product::{NewProduct, Product};
pub use review::{NewReview, Review};
pub use user::{NewUser, User};
