//! Storefront Engine
//!
//! This library contains the store layer of the storefront API. It is HTTP-agnostic.
//!
//! The library is divided into three sections:
//! 1. The record types ([`mod@db_types`]) that are stored and returned to clients.
//! 2. The backend contracts ([`mod@traits`]), one per collection, and the SQLite backend that implements them
//!    ([`SqliteDatabase`]).
//! 3. The public API ([`mod@shop_api`]). Each API wraps a backend and owns the query rules of its collection, such as
//!    the size of the "newest" windows and the span of the statistics aggregations.
pub mod db_types;
mod shop_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use shop_api::{
    cart_api::CartApi,
    catalog_api::{CatalogApi, NEWEST_PRODUCTS_LIMIT},
    order_api::{OrderApi, INCOME_WINDOW_MONTHS},
    user_api::{UserApi, NEWEST_USERS_LIMIT, SIGNUP_STATS_WINDOW_MONTHS},
};
pub use traits::{CartManagement, OrderManagement, ProductManagement, StoreError, UserManagement};
