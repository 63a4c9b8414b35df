use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::json;

use super::{helpers::*, mocks::*};
use crate::{
    integrations::stripe::{ChargeReceipt, PaymentError},
    routes::PaymentRoute,
};

fn configure_app(processor: MockProcessor) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(processor)).service(PaymentRoute::<MockProcessor>::new());
    }
}

fn payment_request() -> TestRequest {
    TestRequest::post().uri("/payment").set_json(json!({"tokenId": "tok_visa", "amount": 2000}))
}

#[actix_web::test]
async fn successful_payment_returns_the_receipt() {
    let mut processor = MockProcessor::new();
    processor
        .expect_charge()
        .withf(|token, amount| token.to_string() == "tok_visa" && *amount == 2000)
        .times(1)
        .returning(|_, amount| Ok(ChargeReceipt(json!({"id": "ch_1", "amount": amount, "paid": true}))));
    let (status, body) = send(payment_request(), None, configure_app(processor)).await;
    assert_eq!(status, StatusCode::OK);
    let receipt: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(receipt, json!({"id": "ch_1", "amount": 2000, "paid": true}));
}

#[actix_web::test]
async fn declined_payment() {
    let mut processor = MockProcessor::new();
    processor
        .expect_charge()
        .returning(|_, _| Err(PaymentError::Declined { status: 402, message: "Your card was declined.".into() }));
    let (status, body) = send(payment_request(), None, configure_app(processor)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Your card was declined."), "was: {body}");
}
