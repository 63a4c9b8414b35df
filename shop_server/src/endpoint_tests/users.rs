use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use serde_json::{json, Value};
use shop_engine::{db_types::MonthlyTotal, UserApi, NEWEST_USERS_LIMIT};

use super::{helpers::*, mocks::*};
use crate::routes::{DeleteUserRoute, FindUserRoute, UpdateUserRoute, UserStatsRoute, UsersRoute};

fn configure_app(users: MockUserManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        with_auth(cfg);
        cfg.app_data(web::Data::new(UserApi::new(users)))
            .service(UserStatsRoute::<MockUserManager>::new())
            .service(FindUserRoute::<MockUserManager>::new())
            .service(UsersRoute::<MockUserManager>::new())
            .service(UpdateUserRoute::<MockUserManager>::new())
            .service(DeleteUserRoute::<MockUserManager>::new());
    }
}

fn untouched() -> MockUserManager {
    let mut users = MockUserManager::new();
    users.expect_fetch_user().never();
    users.expect_fetch_users().never();
    users.expect_update_user().never();
    users.expect_delete_user().never();
    users
}

#[actix_web::test]
async fn find_user_without_a_token() {
    let req = TestRequest::get().uri("/users/find/1");
    let (status, body) = send(req, None, configure_app(untouched())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"You are not authenticated!"}"#);
}

#[actix_web::test]
async fn find_user_with_a_forged_token() {
    let req = TestRequest::get().uri("/users/find/1");
    let (status, body) = send(req, Some("Bearer not.a.token"), configure_app(untouched())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Token is not valid!"}"#);
}

#[actix_web::test]
async fn find_user_with_a_token_from_another_server() {
    let config = crate::config::AuthConfig {
        jwt_secret: shop_common::Secret::from("some-other-secret"),
        ..auth_config()
    };
    let token = format!("Bearer {}", crate::auth::TokenIssuer::new(&config).issue(1, true).unwrap());
    let req = TestRequest::get().uri("/users/find/1");
    let (status, _) = send(req, Some(&token), configure_app(untouched())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn find_user_as_a_regular_user() {
    let req = TestRequest::get().uri("/users/find/1");
    let (status, body) = send(req, Some(&bearer(1, false)), configure_app(untouched())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"You are not allowed to do that!"}"#);
}

#[actix_web::test]
async fn find_user_as_admin() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user().withf(|id| *id == 4).returning(|id| Ok(Some(user(id, "bob", false))));
    let req = TestRequest::get().uri("/users/find/4");
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["_id"], 4);
    assert_eq!(user["email"], "bob@example.com");
    assert!(user.get("password").is_none(), "password leaked: {body}");
}

#[actix_web::test]
async fn find_missing_user() {
    let mut users = MockUserManager::new();
    users.expect_fetch_user().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/users/find/404");
    let (status, _) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn newest_users() {
    let mut users = MockUserManager::new();
    users
        .expect_fetch_users()
        .withf(|newest| *newest == Some(NEWEST_USERS_LIMIT))
        .returning(|_| Ok(vec![user(6, "frank", false), user(5, "erin", false)]));
    let req = TestRequest::get().uri("/users?new=true");
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
    let list: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|u| u.get("password").is_none()));
}

#[actix_web::test]
async fn all_users() {
    let mut users = MockUserManager::new();
    users.expect_fetch_users().withf(|newest| newest.is_none()).returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/users");
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn signup_stats() {
    let mut users = MockUserManager::new();
    users
        .expect_signups_per_month()
        .returning(|_| Ok(vec![MonthlyTotal { month: 9, total: 3 }, MonthlyTotal { month: 10, total: 1 }]));
    let req = TestRequest::get().uri("/users/stats");
    let (status, body) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"[{"_id":9,"total":3},{"_id":10,"total":1}]"#);
}

#[actix_web::test]
async fn update_self_reseals_the_password() {
    let mut users = MockUserManager::new();
    users
        .expect_update_user()
        .withf(|id, update| {
            *id == 3 &&
                update.email.as_deref() == Some("new@example.com") &&
                update.password.as_deref().is_some_and(|p| p != "s3cret" && codec().matches(p, "s3cret"))
        })
        .returning(|id, _| Ok(Some(user(id, "carol", false))));
    let req = TestRequest::put().uri("/users/3").set_json(json!({"email": "new@example.com", "password": "s3cret"}));
    let (status, body) = send(req, Some(&bearer(3, false)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["_id"], 3);
    assert!(user.get("password").is_none(), "password leaked: {body}");
}

#[actix_web::test]
async fn update_someone_else() {
    let req = TestRequest::put().uri("/users/4").set_json(json!({"email": "pwned@example.com"}));
    let (status, _) = send(req, Some(&bearer(3, false)), configure_app(untouched())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn regular_users_cannot_promote_themselves() {
    let req = TestRequest::put().uri("/users/3").set_json(json!({"isAdmin": true}));
    let (status, _) = send(req, Some(&bearer(3, false)), configure_app(untouched())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn admin_updates_anyone() {
    let mut users = MockUserManager::new();
    users
        .expect_update_user()
        .withf(|id, update| *id == 4 && update.is_admin == Some(true) && update.password.is_none())
        .returning(|id, _| Ok(Some(user(id, "dave", true))));
    let req = TestRequest::put().uri("/users/4").set_json(json!({"isAdmin": true}));
    let (status, _) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn update_with_nothing_to_change() {
    let req = TestRequest::put().uri("/users/3").set_json(json!({}));
    let (status, body) = send(req, Some(&bearer(3, false)), configure_app(untouched())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("does not change any fields"), "was: {body}");
}

#[actix_web::test]
async fn delete_self() {
    let mut users = MockUserManager::new();
    users.expect_delete_user().withf(|id| *id == 3).returning(|_| Ok(true));
    let req = TestRequest::delete().uri("/users/3");
    let (status, body) = send(req, Some(&bearer(3, false)), configure_app(users)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#""User has been deleted...""#);
}

#[actix_web::test]
async fn delete_missing_user() {
    let mut users = MockUserManager::new();
    users.expect_delete_user().returning(|_| Ok(false));
    let req = TestRequest::delete().uri("/users/77");
    let (status, _) = send(req, Some(&bearer(1, true)), configure_app(users)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
