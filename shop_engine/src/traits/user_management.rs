use chrono::{DateTime, Utc};

use super::StoreError;
use crate::db_types::{MonthlyTotal, NewUser, User, UserUpdate};

/// The `UserManagement` trait defines behaviour for storing and querying identities.
///
/// Passwords arrive here already sealed. The store never sees, and never produces, a plaintext password.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Stores a new user. Returns [`StoreError::Duplicate`] if the username or email is already taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Applies a merge-patch to the user. Only the fields that are set in `update` are overwritten. Returns the
    /// updated record, or `None` if there is no user with the given id.
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>, StoreError>;

    /// Deletes the user, returning `false` if no such user existed.
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;

    /// Fetches all users in insertion order. If `newest` is provided, only that many of the most recently inserted
    /// users are returned, newest first.
    async fn fetch_users(&self, newest: Option<i64>) -> Result<Vec<User>, StoreError>;

    /// Counts the users created since `since`, bucketed by calendar month.
    async fn signups_per_month(&self, since: DateTime<Utc>) -> Result<Vec<MonthlyTotal<i64>>, StoreError>;
}
