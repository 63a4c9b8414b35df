use std::fmt::Debug;

use crate::{
    db_types::{Cart, CartUpdate, NewCart},
    traits::{CartManagement, StoreError},
};

pub struct CartApi<B> {
    db: B,
}

impl<B: Debug> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.db)
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn create(&self, cart: NewCart) -> Result<Cart, StoreError> {
        self.db.insert_cart(cart).await
    }

    pub async fn cart(&self, id: i64) -> Result<Option<Cart>, StoreError> {
        self.db.fetch_cart(id).await
    }

    pub async fn cart_for_user(&self, user_id: i64) -> Result<Option<Cart>, StoreError> {
        self.db.fetch_cart_for_user(user_id).await
    }

    pub async fn update(&self, id: i64, update: CartUpdate) -> Result<Option<Cart>, StoreError> {
        self.db.update_cart(id, update).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.db.delete_cart(id).await
    }

    pub async fn carts(&self) -> Result<Vec<Cart>, StoreError> {
        self.db.fetch_carts().await
    }
}
