//! # Store backend contracts
//!
//! This module defines the behaviour a storage backend needs to expose in order to serve the storefront. Each
//! collection gets its own trait so that handlers (and their tests) only depend on what they actually touch.
//!
//! * [`UserManagement`] stores identities and provides the signup statistics.
//! * [`ProductManagement`] maintains the catalog.
//! * [`CartManagement`] stores shopping carts.
//! * [`OrderManagement`] stores orders and provides the income statistics.
//!
//! All writes are single-document. There are no cross-collection transactions.
mod cart_management;
mod errors;
mod order_management;
mod product_management;
mod user_management;

pub use cart_management::CartManagement;
pub use errors::StoreError;
pub use order_management::OrderManagement;
pub use product_management::ProductManagement;
pub use user_management::UserManagement;
