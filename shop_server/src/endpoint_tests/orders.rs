use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{Months, Utc};
use serde_json::{json, Value};
use shop_engine::{
    db_types::{MonthlyTotal, NewOrder, Order, DEFAULT_ORDER_STATUS},
    OrderApi,
    INCOME_WINDOW_MONTHS,
};

use super::{helpers::*, mocks::*};
use crate::routes::{DeleteOrderRoute, IncomeRoute, OrdersForUserRoute, OrdersRoute, PlaceOrderRoute, UpdateOrderRoute};

fn configure_app(orders: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        with_auth(cfg);
        cfg.app_data(web::Data::new(OrderApi::new(orders)))
            .service(IncomeRoute::<MockOrderManager>::new())
            .service(OrdersForUserRoute::<MockOrderManager>::new())
            .service(OrdersRoute::<MockOrderManager>::new())
            .service(PlaceOrderRoute::<MockOrderManager>::new())
            .service(UpdateOrderRoute::<MockOrderManager>::new())
            .service(DeleteOrderRoute::<MockOrderManager>::new());
    }
}

fn stored(id: i64, o: NewOrder) -> Order {
    let now = Utc::now();
    Order {
        id,
        user_id: o.user_id,
        products: o.products,
        amount: o.amount,
        address: o.address,
        status: o.status,
        created_at: now,
        updated_at: now,
    }
}

#[actix_web::test]
async fn placed_orders_are_pending() {
    let mut orders = MockOrderManager::new();
    orders.expect_insert_order().times(1).returning(|o| Ok(stored(1, o)));
    let req = TestRequest::post()
        .uri("/orders")
        .set_json(json!({"userId": 3, "products": [{"productId": 2, "quantity": 4}], "amount": 80, "address": {"city": "Paris"}}));
    let (status, body) = send(req, Some(&bearer(3, false)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], DEFAULT_ORDER_STATUS);
    assert_eq!(order["address"]["city"], "Paris");
    assert_eq!(order["products"][0]["quantity"], 4);
}

#[actix_web::test]
async fn placing_an_order_requires_a_login() {
    let mut orders = MockOrderManager::new();
    orders.expect_insert_order().never();
    let req = TestRequest::post().uri("/orders").set_json(json!({"userId": 3, "amount": 80}));
    let (status, _) = send(req, None, configure_app(orders)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn only_admins_update_orders() {
    let mut orders = MockOrderManager::new();
    orders.expect_update_order().never();
    let req = TestRequest::put().uri("/orders/1").set_json(json!({"status": "shipped"}));
    let (status, _) = send(req, Some(&bearer(3, false)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut orders = MockOrderManager::new();
    orders
        .expect_update_order()
        .withf(|id, update| *id == 1 && update.status.as_deref() == Some("shipped"))
        .returning(|id, u| Ok(Some(Order { status: u.status.unwrap_or_default(), ..stored(id, NewOrder::new(3, 80.0)) })));
    let req = TestRequest::put().uri("/orders/1").set_json(json!({"status": "shipped"}));
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""status":"shipped""#), "was: {body}");
}

#[actix_web::test]
async fn update_order_with_nothing_to_change() {
    let mut orders = MockOrderManager::new();
    orders.expect_update_order().never();
    let req = TestRequest::put().uri("/orders/1").set_json(json!({}));
    let (status, _) = send(req, Some(&bearer(1, true)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_order() {
    let mut orders = MockOrderManager::new();
    orders.expect_delete_order().returning(|_| Ok(true));
    let (status, body) = send(TestRequest::delete().uri("/orders/1"), Some(&bearer(1, true)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#""Order has been deleted...""#);
}

#[actix_web::test]
async fn orders_for_self() {
    let mut orders = MockOrderManager::new();
    orders
        .expect_fetch_orders_for_user()
        .withf(|id| *id == 3)
        .returning(|id| Ok(vec![stored(1, NewOrder::new(id, 10.0)), stored(2, NewOrder::new(id, 20.0))]));
    let req = TestRequest::get().uri("/orders/find/3");
    let (status, body) = send(req, Some(&bearer(3, false)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(list.len(), 2);
}

#[actix_web::test]
async fn orders_for_someone_else() {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_user().never();
    let req = TestRequest::get().uri("/orders/find/3");
    let (status, _) = send(req, Some(&bearer(4, false)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn all_orders() {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders().returning(|| Ok(vec![]));
    let (status, body) = send(TestRequest::get().uri("/orders"), Some(&bearer(1, true)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn income_covers_the_last_two_months() {
    let mut orders = MockOrderManager::new();
    orders
        .expect_income_per_month()
        .withf(|since| {
            let expected = Utc::now().checked_sub_months(Months::new(INCOME_WINDOW_MONTHS)).unwrap();
            (expected - *since).num_seconds().abs() < 60
        })
        .returning(|_| Ok(vec![MonthlyTotal { month: 9, total: 120.5 }, MonthlyTotal { month: 10, total: 80.0 }]));
    let (status, body) =
        send(TestRequest::get().uri("/orders/income"), Some(&bearer(1, true)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"[{"_id":9,"total":120.5},{"_id":10,"total":80.0}]"#);
}

#[actix_web::test]
async fn income_is_for_admins() {
    let mut orders = MockOrderManager::new();
    orders.expect_income_per_month().never();
    let (status, _) = send(TestRequest::get().uri("/orders/income"), Some(&bearer(3, false)), configure_app(orders)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
