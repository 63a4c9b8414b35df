use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::{Duration, Utc};
use log::debug;
use shop_common::Secret;
use shop_engine::db_types::User;

use crate::{
    auth::TokenIssuer,
    config::AuthConfig,
    credentials::{CredentialCodec, PasswordScheme},
    middleware::TOKEN_HEADER,
};

// Fixed secrets for endpoint tests. DO NOT re-use these anywhere.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::from("endpoint-tests-jwt-secret"),
        password_secret: Secret::from("endpoint-tests-password-secret"),
        password_scheme: PasswordScheme::Reversible,
        token_ttl: Duration::hours(72),
    }
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(&auth_config())
}

pub fn codec() -> CredentialCodec {
    let config = auth_config();
    CredentialCodec::new(config.password_secret, config.password_scheme)
}

/// A valid `token` header value for the given user
pub fn bearer(id: i64, is_admin: bool) -> String {
    format!("Bearer {}", issuer().issue(id, is_admin).unwrap())
}

/// Registers the token issuer and the credential codec. Every app with a gated route needs these.
pub fn with_auth(cfg: &mut ServiceConfig) {
    cfg.app_data(web::Data::new(issuer())).app_data(web::Data::new(codec()));
}

/// A stored user whose password is "password"
pub fn user(id: i64, username: &str, is_admin: bool) -> User {
    let now = Utc::now();
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: codec().seal("password").unwrap(),
        is_admin,
        created_at: now,
        updated_at: now,
    }
}

pub async fn send<F>(req: TestRequest, token: Option<&str>, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = match token {
        Some(t) => req.insert_header((TOKEN_HEADER, t)),
        None => req,
    };
    let app = test::init_service(App::new().configure(configure)).await;
    debug!("Making request");
    let (_, res) = test::call_service(&app, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
