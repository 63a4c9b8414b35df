use std::fmt::Debug;

use crate::{
    db_types::{NewProduct, Product, ProductQueryFilter, ProductUpdate},
    traits::{ProductManagement, StoreError},
};

/// How many products `GET /products?new=true` returns
pub const NEWEST_PRODUCTS_LIMIT: i64 = 1;

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: ProductManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn add(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.db.insert_product(product).await
    }

    pub async fn product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        self.db.fetch_product(id).await
    }

    pub async fn update(&self, id: i64, update: ProductUpdate) -> Result<Option<Product>, StoreError> {
        self.db.update_product(id, update).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.db.delete_product(id).await
    }

    /// Lists the catalog.
    ///
    /// `newest` takes precedence: when it is set, the most recently created product is returned and `category` is
    /// ignored. Otherwise, a category restricts the result to products listing that category. With neither, the
    /// whole catalog is returned.
    pub async fn products(&self, newest: bool, category: Option<String>) -> Result<Vec<Product>, StoreError> {
        let filter = match (newest, category) {
            (true, _) => ProductQueryFilter::default().with_newest(NEWEST_PRODUCTS_LIMIT),
            (false, Some(category)) => ProductQueryFilter::default().with_category(category),
            (false, None) => ProductQueryFilter::default(),
        };
        self.db.fetch_products(filter).await
    }
}
