//! Session tokens.
//!
//! A session token is an HS256 JWT carrying the user's id and admin flag. Tokens are minted on login by
//! [`TokenIssuer::issue`] and checked on every gated request by [`TokenIssuer::verify`]. There is no revocation: a token
//! stays valid until it expires.
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub id: i64,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Handlers behind a gate can take `SessionClaims` as an argument to learn who is calling. The gate stores the
/// verified claims in the request extensions; a handler that is not gated gets a 401 instead.
impl FromRequest for SessionClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<SessionClaims>().cloned().ok_or(ServerError::Unauthenticated);
        ready(claims)
    }
}

pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: config.token_ttl,
        }
    }

    /// Issue a new session token for the given user.
    /// This method DOES NOT check that the user exists or that `is_admin` is accurate. The caller must have already
    /// authenticated the user.
    pub fn issue(&self, id: i64, is_admin: bool) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = SessionClaims { id, is_admin, iat, exp: iat + self.ttl.num_seconds() };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| AuthError::SigningError(e.to_string()))
    }

    /// Checks the token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("🔐️ Session token rejected. {e}");
            AuthError::ValidationError(e.to_string())
        })?;
        Ok(data.claims)
    }
}
