use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use super::first_row;
use crate::{
    db_types::{MonthlyTotal, NewUser, User, UserUpdate},
    traits::StoreError,
};

pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, StoreError> {
    let now = Utc::now();
    let rows: Vec<User> = sqlx::query_as(
        r#"
            INSERT INTO users (username, email, password, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(user.username)
    .bind(user.email)
    .bind(user.password)
    .bind(user.is_admin)
    .bind(now)
    .bind(now)
    .fetch_all(conn)
    .await?;
    let user = first_row(rows).ok_or_else(|| StoreError::DatabaseError("INSERT returned no row".to_string()))?;
    debug!("🗃️ User [{}] inserted with id {}", user.username, user.id);
    Ok(user)
}

pub async fn fetch_user(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_user_by_username(username: &str, conn: &mut SqliteConnection) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE username = $1").bind(username).fetch_optional(conn).await?;
    Ok(user)
}

/// Overwrites the fields that are set in `update`, and bumps `updated_at`. Returns `None` if there is no such user.
pub async fn update_user(id: i64, update: UserUpdate, conn: &mut SqliteConnection) -> Result<Option<User>, StoreError> {
    let mut builder = QueryBuilder::new("UPDATE users SET ");
    let mut set_clause = builder.separated(", ");
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    if let Some(username) = update.username {
        set_clause.push("username = ");
        set_clause.push_bind_unseparated(username);
    }
    if let Some(email) = update.email {
        set_clause.push("email = ");
        set_clause.push_bind_unseparated(email);
    }
    if let Some(password) = update.password {
        set_clause.push("password = ");
        set_clause.push_bind_unseparated(password);
    }
    if let Some(is_admin) = update.is_admin {
        set_clause.push("is_admin = ");
        set_clause.push_bind_unseparated(is_admin);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let user = first_row(builder.build_query_as::<User>().fetch_all(conn).await?);
    Ok(user)
}

pub async fn delete_user(id: i64, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_users(newest: Option<i64>, conn: &mut SqliteConnection) -> Result<Vec<User>, StoreError> {
    let users = match newest {
        Some(n) => sqlx::query_as("SELECT * FROM users ORDER BY id DESC LIMIT $1").bind(n).fetch_all(conn).await?,
        None => sqlx::query_as("SELECT * FROM users ORDER BY id ASC").fetch_all(conn).await?,
    };
    Ok(users)
}

pub async fn signups_per_month(
    since: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<MonthlyTotal<i64>>, StoreError> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        r#"
            SELECT CAST(substr(created_at, 6, 2) AS INTEGER) AS month, COUNT(*) AS total
            FROM users
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
