use super::StoreError;
use crate::db_types::{NewProduct, Product, ProductQueryFilter, ProductUpdate};

#[allow(async_fn_in_trait)]
pub trait ProductManagement {
    /// Adds a product to the catalog. Titles are unique, so a second product with the same title results in
    /// [`StoreError::Duplicate`].
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, StoreError>;

    async fn update_product(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, StoreError>;

    async fn delete_product(&self, id: i64) -> Result<bool, StoreError>;

    /// Fetches the products matching the filter. See [`ProductQueryFilter`] for the ordering rules.
    async fn fetch_products(&self, filter: ProductQueryFilter) -> Result<Vec<Product>, StoreError>;
}
