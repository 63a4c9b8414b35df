//! `SqliteDatabase` is the concrete storefront backend.
//!
//! It uses SQLite as the document store and implements all the traits defined in the [`crate::traits`] module. Each
//! method grabs a pooled connection and delegates to the matching function in [`super::db`].
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{carts, new_pool, orders, products, users};
use crate::{
    db_types::{
        Cart,
        CartUpdate,
        MonthlyTotal,
        NewCart,
        NewOrder,
        NewProduct,
        NewUser,
        Order,
        OrderUpdate,
        Product,
        ProductQueryFilter,
        ProductUpdate,
        User,
        UserUpdate,
    },
    traits::{CartManagement, OrderManagement, ProductManagement, StoreError, UserManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user(id, &mut conn).await
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user_by_username(username, &mut conn).await
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::update_user(id, update, &mut conn).await?;
        trace!("🗃️ User #{id} update matched {} record", if user.is_some() { "one" } else { "no" });
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::delete_user(id, &mut conn).await
    }

    async fn fetch_users(&self, newest: Option<i64>) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_users(newest, &mut conn).await
    }

    async fn signups_per_month(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal<i64>>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::signups_per_month(since, &mut conn).await
    }
}

impl ProductManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(id, &mut conn).await
    }

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(id, update, &mut conn).await
    }

    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::delete_product(id, &mut conn).await
    }

    async fn fetch_products(&self, filter: ProductQueryFilter) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products(filter, &mut conn).await
    }
}

impl CartManagement for SqliteDatabase {
    async fn insert_cart(&self, cart: NewCart) -> Result<Cart, StoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::insert_cart(cart, &mut conn).await
    }

    async fn fetch_cart(&self, id: i64) -> Result<Option<Cart>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_cart(id, &mut conn).await
    }

    async fn fetch_cart_for_user(&self, user_id: i64) -> Result<Option<Cart>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_cart_for_user(user_id, &mut conn).await
    }

    async fn update_cart(&self, id: i64, update: CartUpdate) -> Result<Option<Cart>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::update_cart(id, update, &mut conn).await
    }

    async fn delete_cart(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::delete_cart(id, &mut conn).await
    }

    async fn fetch_carts(&self) -> Result<Vec<Cart>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_carts(&mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn update_order(&self, id: i64, update: OrderUpdate) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(id, update, &mut conn).await
    }

    async fn delete_order(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::delete_order(id, &mut conn).await
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_user(user_id, &mut conn).await
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders(&mut conn).await
    }

    async fn income_per_month(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal<f64>>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::income_per_month(since, &mut conn).await
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
