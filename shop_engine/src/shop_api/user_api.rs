use std::fmt::Debug;

use chrono::{DateTime, Months, Utc};
use log::debug;

use crate::{
    db_types::{MonthlyTotal, NewUser, User, UserUpdate},
    traits::{StoreError, UserManagement},
};

/// How many users `GET /users?new=true` returns
pub const NEWEST_USERS_LIMIT: i64 = 5;

/// Signup statistics cover this many months, ending now.
pub const SIGNUP_STATS_WINDOW_MONTHS: u32 = 12;

pub struct UserApi<B> {
    db: B,
}

impl<B: Debug> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi ({:?})", self.db)
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn register(&self, user: NewUser) -> Result<User, StoreError> {
        let user = self.db.insert_user(user).await?;
        debug!("🗃️ New user {} registered as #{}", user.username, user.id);
        Ok(user)
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.db.fetch_user(id).await
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.db.fetch_user_by_username(username).await
    }

    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<Option<User>, StoreError> {
        self.db.update_user(id, update).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.db.delete_user(id).await
    }

    /// All users, or only the [`NEWEST_USERS_LIMIT`] most recent ones when `newest_only` is set.
    pub async fn users(&self, newest_only: bool) -> Result<Vec<User>, StoreError> {
        let limit = newest_only.then_some(NEWEST_USERS_LIMIT);
        self.db.fetch_users(limit).await
    }

    /// Monthly signup counts over the year leading up to `now`.
    pub async fn signup_stats(&self, now: DateTime<Utc>) -> Result<Vec<MonthlyTotal<i64>>, StoreError> {
        let since = now.checked_sub_months(Months::new(SIGNUP_STATS_WINDOW_MONTHS)).unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.db.signups_per_month(since).await
    }
}
