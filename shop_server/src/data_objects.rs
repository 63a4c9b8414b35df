use serde::{Deserialize, Serialize};
use shop_engine::db_types::{UserProfile, UserUpdate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The user's profile with a fresh session token alongside it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub access_token: String,
}

/// A merge-patch to a user, as submitted by a client. `password` is the new plaintext and is sealed before it is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdateRequest {
    /// Converts into a store update, using `sealed_password` in place of the submitted plaintext.
    pub fn into_update(self, sealed_password: Option<String>) -> UserUpdate {
        UserUpdate { username: self.username, email: self.email, password: sealed_password, is_admin: self.is_admin }
    }
}

/// `?new` on the listing endpoints.
///
/// Any non-empty value selects the newest records, including `?new=false` and `?new=0`. A bare `?new` or `?new=` does
/// not. The value is never parsed as a boolean.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewestQuery {
    pub new: Option<String>,
}

impl NewestQuery {
    pub fn newest_only(&self) -> bool {
        is_set(&self.new)
    }
}

/// `?new` and `?category` on `GET /products`. `new` follows the same rule as [`NewestQuery`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsQuery {
    pub new: Option<String>,
    pub category: Option<String>,
}

impl ProductsQuery {
    pub fn newest_only(&self) -> bool {
        is_set(&self.new)
    }
}

fn is_set(flag: &Option<String>) -> bool {
    flag.as_deref().is_some_and(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub token_id: String,
    /// In the smallest unit of the store currency
    pub amount: i64,
}
