//! Record types for the four store collections.
//!
//! Records serialise with camelCase field names and expose their primary key as `_id`, which is the wire format
//! clients of the storefront API expect. `New*` types are inserted as-is, `*Update` types are merge-patches: only the
//! fields that are `Some` are written.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

//--------------------------------------        User         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    /// The sealed password blob. Never the plaintext.
    pub password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user record with the password blob removed. This is what identity reads return to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// The sealed password blob
    pub password: String,
    pub is_admin: bool,
}

impl NewUser {
    pub fn new<S: Into<String>>(username: S, email: S, sealed_password: S) -> Self {
        Self { username: username.into(), email: email.into(), password: sealed_password.into(), is_admin: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    /// A freshly sealed password blob
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none() && self.is_admin.is_none()
    }
}

//--------------------------------------       Product       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: i64,
    pub title: String,
    pub desc: String,
    pub img: String,
    pub categories: Vec<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: f64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "in_stock_by_default")]
    pub in_stock: bool,
}

fn in_stock_by_default() -> bool {
    true
}

impl NewProduct {
    pub fn new<S: Into<String>>(title: S, price: f64) -> Self {
        Self {
            title: title.into(),
            desc: String::default(),
            img: String::default(),
            categories: vec![],
            size: None,
            color: None,
            price,
            in_stock: true,
        }
    }

    pub fn with_categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub img: Option<String>,
    pub categories: Option<Vec<String>>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() &&
            self.desc.is_none() &&
            self.img.is_none() &&
            self.categories.is_none() &&
            self.size.is_none() &&
            self.color.is_none() &&
            self.price.is_none() &&
            self.in_stock.is_none()
    }
}

/// Selects products from the catalog. An empty filter selects every product, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQueryFilter {
    pub category: Option<String>,
    /// When set, only the `n` most recently created products are returned, newest first.
    pub newest: Option<i64>,
}

impl ProductQueryFilter {
    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_newest(mut self, n: i64) -> Self {
        self.newest = Some(n);
        self
    }
}

//--------------------------------------     Cart & Order     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: i64,
    #[serde(default = "one")]
    pub quantity: i64,
}

fn one() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: i64,
    pub user_id: i64,
    pub products: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCart {
    pub user_id: i64,
    #[serde(default)]
    pub products: Vec<LineItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdate {
    pub user_id: Option<i64>,
    pub products: Option<Vec<LineItem>>,
}

impl CartUpdate {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.products.is_none()
    }
}

pub const DEFAULT_ORDER_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: i64,
    pub user_id: i64,
    pub products: Vec<LineItem>,
    pub amount: f64,
    pub address: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: i64,
    #[serde(default)]
    pub products: Vec<LineItem>,
    pub amount: f64,
    #[serde(default = "empty_address")]
    pub address: Value,
    #[serde(default = "pending")]
    pub status: String,
}

fn empty_address() -> Value {
    Value::Object(Default::default())
}

fn pending() -> String {
    DEFAULT_ORDER_STATUS.to_string()
}

impl NewOrder {
    pub fn new(user_id: i64, amount: f64) -> Self {
        Self { user_id, products: vec![], amount, address: empty_address(), status: pending() }
    }

    pub fn with_item(mut self, product_id: i64, quantity: i64) -> Self {
        self.products.push(LineItem { product_id, quantity });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub user_id: Option<i64>,
    pub products: Option<Vec<LineItem>>,
    pub amount: Option<f64>,
    pub address: Option<Value>,
    pub status: Option<String>,
}

impl OrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() &&
            self.products.is_none() &&
            self.amount.is_none() &&
            self.address.is_none() &&
            self.status.is_none()
    }
}

//--------------------------------------     Statistics      ---------------------------------------------------------
/// One bucket of a per-month aggregation. `month` is the calendar month (1-12, UTC) of the record's creation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal<T> {
    #[serde(rename = "_id")]
    pub month: u32,
    pub total: T,
}
