use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde_json::Value;
use sqlx::{types::Json, FromRow, QueryBuilder, SqliteConnection};

use super::first_row;
use crate::{
    db_types::{LineItem, MonthlyTotal, NewOrder, Order, OrderUpdate},
    traits::StoreError,
};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    products: Json<Vec<LineItem>>,
    amount: f64,
    address: Json<Value>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            products: row.products.0,
            amount: row.amount,
            address: row.address.0,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, StoreError> {
    let now = Utc::now();
    let rows: Vec<OrderRow> = sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, products, amount, address, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(Json(order.products))
    .bind(order.amount)
    .bind(Json(order.address))
    .bind(order.status)
    .bind(now)
    .bind(now)
    .fetch_all(conn)
    .await?;
    let row = first_row(rows).ok_or_else(|| StoreError::DatabaseError("INSERT returned no row".to_string()))?;
    debug!("🗃️ Order #{} of {} placed by user #{}", row.id, row.amount, row.user_id);
    Ok(row.into())
}

pub async fn update_order(
    id: i64,
    update: OrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, StoreError> {
    let mut builder = QueryBuilder::new("UPDATE orders SET ");
    let mut set_clause = builder.separated(", ");
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    if let Some(user_id) = update.user_id {
        set_clause.push("user_id = ");
        set_clause.push_bind_unseparated(user_id);
    }
    if let Some(products) = update.products {
        set_clause.push("products = ");
        set_clause.push_bind_unseparated(Json(products));
    }
    if let Some(amount) = update.amount {
        set_clause.push("amount = ");
        set_clause.push_bind_unseparated(amount);
    }
    if let Some(address) = update.address {
        set_clause.push("address = ");
        set_clause.push_bind_unseparated(Json(address));
    }
    if let Some(status) = update.status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let row = first_row(builder.build_query_as::<OrderRow>().fetch_all(conn).await?);
    Ok(row.map(Order::from))
}

pub async fn delete_order(id: i64, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

pub async fn fetch_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, StoreError> {
    let rows: Vec<OrderRow> =
        sqlx::query_as("SELECT * FROM orders ORDER BY created_at ASC, id ASC").fetch_all(conn).await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

pub async fn income_per_month(
    since: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlyTotal<f64>>, StoreError> {
    let rows: Vec<(i64, f64)> = sqlx::query_as(
        r#"
            SELECT CAST(substr(created_at, 6, 2) AS INTEGER) AS month, SUM(amount) AS total
            FROM orders
            WHERE created_at >= $1
            GROUP BY month
            ORDER BY month;
        "#,
    )
    .bind(since)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(|(month, total)| MonthlyTotal { month: month as u32, total }).collect())
}
