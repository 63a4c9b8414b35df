use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{types::Json, FromRow, QueryBuilder, SqliteConnection};

use super::first_row;
use crate::{
    db_types::{Cart, CartUpdate, LineItem, NewCart},
    traits::StoreError,
};

#[derive(Debug, FromRow)]
struct CartRow {
    id: i64,
    user_id: i64,
    products: Json<Vec<LineItem>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            products: row.products.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn insert_cart(cart: NewCart, conn: &mut SqliteConnection) -> Result<Cart, StoreError> {
    let now = Utc::now();
    let rows: Vec<CartRow> = sqlx::query_as(
        r#"
            INSERT INTO carts (user_id, products, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(cart.user_id)
    .bind(Json(cart.products))
    .bind(now)
    .bind(now)
    .fetch_all(conn)
    .await?;
    let row = first_row(rows).ok_or_else(|| StoreError::DatabaseError("INSERT returned no row".to_string()))?;
    debug!("🗃️ Cart #{} created for user #{}", row.id, row.user_id);
    Ok(row.into())
}

pub async fn fetch_cart(id: i64, conn: &mut SqliteConnection) -> Result<Option<Cart>, StoreError> {
    let row: Option<CartRow> = sqlx::query_as("SELECT * FROM carts WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(row.map(Cart::from))
}

pub async fn fetch_cart_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Cart>, StoreError> {
    let row: Option<CartRow> = sqlx::query_as("SELECT * FROM carts WHERE user_id = $1 ORDER BY id ASC LIMIT 1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Cart::from))
}

pub async fn update_cart(id: i64, update: CartUpdate, conn: &mut SqliteConnection) -> Result<Option<Cart>, StoreError> {
    let mut builder = QueryBuilder::new("UPDATE carts SET ");
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
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let row = first_row(builder.build_query_as::<CartRow>().fetch_all(conn).await?);
    Ok(row.map(Cart::from))
}

pub async fn delete_cart(id: i64, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM carts WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_carts(conn: &mut SqliteConnection) -> Result<Vec<Cart>, StoreError> {
    let rows: Vec<CartRow> = sqlx::query_as("SELECT * FROM carts ORDER BY id ASC").fetch_all(conn).await?;
    Ok(rows.into_iter().map(Cart::from).collect())
}
