//! # Storefront public API
//!
//! The `shop_api` module exposes the programmatic API for the storefront store. There is one API per collection, so
//! that clients can pick the functionality they need and tests only have to mock the backend traits they touch.
//!
//! * [`user_api`] manages identities and the signup statistics.
//! * [`catalog_api`] manages the product catalog and its query rules.
//! * [`cart_api`] manages shopping carts.
//! * [`order_api`] manages orders and the income statistics.
//!
//! # API usage
//!
//! Every API is created by supplying a backend that implements the matching trait:
//!
//! ```rust,ignore
//! use shop_engine::{CatalogApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/shop.db", 5).await?;
//! // SqliteDatabase implements ProductManagement
//! let api = CatalogApi::new(db);
//! let newest = api.products(true, None).await?;
//! ```
pub mod cart_api;
pub mod catalog_api;
pub mod order_api;
pub mod user_api;
