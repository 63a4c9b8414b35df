use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::Utc;
use serde_json::{json, Value};
use shop_engine::{
    db_types::{NewProduct, Product, ProductQueryFilter},
    CatalogApi,
    NEWEST_PRODUCTS_LIMIT,
};

use super::{helpers::*, mocks::*};
use crate::routes::{AddProductRoute, DeleteProductRoute, FindProductRoute, ProductsRoute, UpdateProductRoute};

fn configure_app(catalog: MockProductManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        with_auth(cfg);
        cfg.app_data(web::Data::new(CatalogApi::new(catalog)))
            .service(FindProductRoute::<MockProductManager>::new())
            .service(ProductsRoute::<MockProductManager>::new())
            .service(AddProductRoute::<MockProductManager>::new())
            .service(UpdateProductRoute::<MockProductManager>::new())
            .service(DeleteProductRoute::<MockProductManager>::new());
    }
}

fn stored(id: i64, p: NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id,
        title: p.title,
        desc: p.desc,
        img: p.img,
        categories: p.categories,
        size: p.size,
        color: p.color,
        price: p.price,
        in_stock: p.in_stock,
        created_at: now,
        updated_at: now,
    }
}

#[actix_web::test]
async fn admin_adds_a_product() {
    let mut catalog = MockProductManager::new();
    catalog.expect_insert_product().times(1).returning(|p| Ok(stored(12, p)));
    let req = TestRequest::post().uri("/products").set_json(json!({"title": "Shoe", "price": 20, "categories": ["man"]}));
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    let product: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(product["_id"], 12);
    assert_eq!(product["title"], "Shoe");
    assert_eq!(product["price"], 20.0);
    assert_eq!(product["inStock"], true);
}

#[actix_web::test]
async fn regular_users_cannot_add_products() {
    let mut catalog = MockProductManager::new();
    catalog.expect_insert_product().never();
    let req = TestRequest::post().uri("/products").set_json(json!({"title": "Shoe", "price": 20}));
    let (status, _) = send(req, Some(&bearer(2, false)), configure_app(catalog)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn anonymous_users_cannot_delete_products() {
    let mut catalog = MockProductManager::new();
    catalog.expect_delete_product().never();
    let (status, _) = send(TestRequest::delete().uri("/products/1"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn newest_product_ignores_the_category() {
    let mut catalog = MockProductManager::new();
    catalog
        .expect_fetch_products()
        .withf(|f| *f == ProductQueryFilter::default().with_newest(NEWEST_PRODUCTS_LIMIT))
        .returning(|_| Ok(vec![stored(3, NewProduct::new("Hat", 5.0))]));
    let req = TestRequest::get().uri("/products?new=true&category=man");
    let (status, body) = send(req, None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Hat");
}

#[actix_web::test]
async fn products_by_category() {
    let mut catalog = MockProductManager::new();
    catalog
        .expect_fetch_products()
        .withf(|f| *f == ProductQueryFilter::default().with_category("man"))
        .returning(|_| Ok(vec![stored(1, NewProduct::new("Shoe", 20.0).with_categories(["man"]))]));
    let (status, body) = send(TestRequest::get().uri("/products?category=man"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Shoe"));
}

#[actix_web::test]
async fn empty_new_flag_lists_by_category() {
    let mut catalog = MockProductManager::new();
    catalog
        .expect_fetch_products()
        .withf(|f| *f == ProductQueryFilter::default().with_category("man"))
        .returning(|_| Ok(vec![]));
    let (status, body) = send(TestRequest::get().uri("/products?new=&category=man"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn any_new_value_selects_the_newest() {
    let mut catalog = MockProductManager::new();
    catalog
        .expect_fetch_products()
        .withf(|f| *f == ProductQueryFilter::default().with_newest(NEWEST_PRODUCTS_LIMIT))
        .returning(|_| Ok(vec![]));
    let (status, _) = send(TestRequest::get().uri("/products?new=false"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn all_products() {
    let mut catalog = MockProductManager::new();
    catalog.expect_fetch_products().withf(|f| *f == ProductQueryFilter::default()).returning(|_| Ok(vec![]));
    let (status, body) = send(TestRequest::get().uri("/products"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn find_product_is_public() {
    let mut catalog = MockProductManager::new();
    catalog.expect_fetch_product().returning(|id| Ok(Some(stored(id, NewProduct::new("Shoe", 20.0)))));
    let (status, body) = send(TestRequest::get().uri("/products/find/8"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""_id":8"#), "was: {body}");
}

#[actix_web::test]
async fn find_missing_product() {
    let mut catalog = MockProductManager::new();
    catalog.expect_fetch_product().returning(|_| Ok(None));
    let (status, _) = send(TestRequest::get().uri("/products/find/8"), None, configure_app(catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_product() {
    let mut catalog = MockProductManager::new();
    catalog
        .expect_update_product()
        .withf(|id, update| *id == 8 && update.price == Some(15.0) && update.title.is_none())
        .returning(|id, _| Ok(Some(stored(id, NewProduct::new("Shoe", 15.0)))));
    let req = TestRequest::put().uri("/products/8").set_json(json!({"price": 15.0}));
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""price":15.0"#), "was: {body}");
}

#[actix_web::test]
async fn update_product_with_nothing_to_change() {
    let mut catalog = MockProductManager::new();
    catalog.expect_update_product().never();
    let req = TestRequest::put().uri("/products/8").set_json(json!({}));
    let (status, _) = send(req, Some(&bearer(1, true)), configure_app(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_product() {
    let mut catalog = MockProductManager::new();
    catalog.expect_delete_product().returning(|_| Ok(true));
    let req = TestRequest::delete().uri("/products/8");
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#""Product has been deleted...""#);
}
