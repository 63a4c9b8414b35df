use std::fmt::Debug;

use chrono::{DateTime, Months, Utc};
use log::debug;

use crate::{
    db_types::{MonthlyTotal, NewOrder, Order, OrderUpdate},
    traits::{OrderManagement, StoreError},
};

/// Income statistics cover this many months, ending now.
pub const INCOME_WINDOW_MONTHS: u32 = 2;

pub struct OrderApi<B> {
    db: B,
}

impl<B: Debug> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi ({:?})", self.db)
    }
}

impl<B> OrderApi<B>
where B: OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn place(&self, order: NewOrder) -> Result<Order, StoreError> {
        let order = self.db.insert_order(order).await?;
        debug!("🗃️ Order #{} placed with status {}", order.id, order.status);
        Ok(order)
    }

    pub async fn update(&self, id: i64, update: OrderUpdate) -> Result<Option<Order>, StoreError> {
        self.db.update_order(id, update).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.db.delete_order(id).await
    }

    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        self.db.fetch_orders_for_user(user_id).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, StoreError> {
        self.db.fetch_orders().await
    }

    /// Monthly income over the two months leading up to `now`.
    pub async fn income(&self, now: DateTime<Utc>) -> Result<Vec<MonthlyTotal<f64>>, StoreError> {
        let since = now.checked_sub_months(Months::new(INCOME_WINDOW_MONTHS)).unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.db.income_per_month(since).await
    }
}
