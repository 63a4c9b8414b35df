use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{types::Json, FromRow, QueryBuilder, SqliteConnection};

use super::first_row;
use crate::{
    db_types::{NewProduct, Product, ProductQueryFilter, ProductUpdate},
    traits::StoreError,
};

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    title: String,
    desc: String,
    img: String,
    categories: Json<Vec<String>>,
    size: Option<String>,
    color: Option<String>,
    price: f64,
    in_stock: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            desc: row.desc,
            img: row.img,
            categories: row.categories.0,
            size: row.size,
            color: row.color,
            price: row.price,
            in_stock: row.in_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, StoreError> {
    let now = Utc::now();
    let rows: Vec<ProductRow> = sqlx::query_as(
        r#"
            INSERT INTO products (title, "desc", img, categories, size, color, price, in_stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(product.title)
    .bind(product.desc)
    .bind(product.img)
    .bind(Json(product.categories))
    .bind(product.size)
    .bind(product.color)
    .bind(product.price)
    .bind(product.in_stock)
    .bind(now)
    .bind(now)
    .fetch_all(conn)
    .await?;
    let row = first_row(rows).ok_or_else(|| StoreError::DatabaseError("INSERT returned no row".to_string()))?;
    debug!("🗃️ Product [{}] inserted with id {}", row.title, row.id);
    Ok(row.into())
}

pub async fn fetch_product(id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, StoreError> {
    let row: Option<ProductRow> =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(row.map(Product::from))
}

pub async fn update_product(
    id: i64,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, StoreError> {
    let mut builder = QueryBuilder::new("UPDATE products SET ");
    let mut set_clause = builder.separated(", ");
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    if let Some(title) = update.title {
        set_clause.push("title = ");
        set_clause.push_bind_unseparated(title);
    }
    if let Some(desc) = update.desc {
        set_clause.push("\"desc\" = ");
        set_clause.push_bind_unseparated(desc);
    }
    if let Some(img) = update.img {
        set_clause.push("img = ");
        set_clause.push_bind_unseparated(img);
    }
    if let Some(categories) = update.categories {
        set_clause.push("categories = ");
        set_clause.push_bind_unseparated(Json(categories));
    }
    if let Some(size) = update.size {
        set_clause.push("size = ");
        set_clause.push_bind_unseparated(size);
    }
    if let Some(color) = update.color {
        set_clause.push("color = ");
        set_clause.push_bind_unseparated(color);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(in_stock) = update.in_stock {
        set_clause.push("in_stock = ");
        set_clause.push_bind_unseparated(in_stock);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let row = first_row(builder.build_query_as::<ProductRow>().fetch_all(conn).await?);
    Ok(row.map(Product::from))
}

pub async fn delete_product(id: i64, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

/// Fetches products according to the criteria in the `ProductQueryFilter`.
///
/// Without a `newest` limit, products are ordered by `created_at` in ascending order. With one, the most recent
/// products come first.
pub async fn fetch_products(
    filter: ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, StoreError> {
    let mut builder = QueryBuilder::new("SELECT * FROM products");
    if let Some(category) = filter.category {
        builder.push(" WHERE EXISTS (SELECT 1 FROM json_each(products.categories) WHERE json_each.value = ");
        builder.push_bind(category);
        builder.push(")");
    }
    match filter.newest {
        Some(n) => {
            builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
            builder.push_bind(n);
        },
        None => {
            builder.push(" ORDER BY created_at ASC, id ASC");
        },
    }
    trace!("🗃️ Executing query: {}", builder.sql());
    let rows = builder.build_query_as::<ProductRow>().fetch_all(conn).await?;
    Ok(rows.into_iter().map(Product::from).collect())
}
