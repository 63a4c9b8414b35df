use chrono::{DateTime, Utc};

use super::StoreError;
use crate::db_types::{MonthlyTotal, NewOrder, Order, OrderUpdate};

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    async fn update_order(&self, id: i64, update: OrderUpdate) -> Result<Option<Order>, StoreError>;

    async fn delete_order(&self, id: i64) -> Result<bool, StoreError>;

    /// Fetches all the orders placed by `user_id`, oldest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError>;

    async fn fetch_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Sums the `amount` of every order created since `since`, bucketed by calendar month.
    async fn income_per_month(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal<f64>>, StoreError>;
}
