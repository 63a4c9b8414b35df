use super::StoreError;
use crate::db_types::{Cart, CartUpdate, NewCart};

#[allow(async_fn_in_trait)]
pub trait CartManagement {
    async fn insert_cart(&self, cart: NewCart) -> Result<Cart, StoreError>;

    async fn fetch_cart(&self, id: i64) -> Result<Option<Cart>, StoreError>;

    /// Returns the first cart created for `user_id`, if there is one.
    async fn fetch_cart_for_user(&self, user_id: i64) -> Result<Option<Cart>, StoreError>;

    async fn update_cart(&self, id: i64, update: CartUpdate) -> Result<Option<Cart>, StoreError>;

    async fn delete_cart(&self, id: i64) -> Result<bool, StoreError>;

    async fn fetch_carts(&self) -> Result<Vec<Cart>, StoreError>;
}
