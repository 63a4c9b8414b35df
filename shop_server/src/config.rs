use std::env;

use chrono::Duration;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use shop_common::{helpers::env_or, Secret};

use crate::credentials::PasswordScheme;

const DEFAULT_SHOP_HOST: &str = "127.0.0.1";
const DEFAULT_SHOP_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/shop.db";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 72;
const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com/v1";
const DEFAULT_CURRENCY: &str = "usd";

/// The variables that are safe to print, paired with the value used when each one is not set.
pub fn public_env_defaults() -> [(&'static str, String); 8] {
    [
        ("RUST_LOG", "error".to_string()),
        ("SHOP_HOST", DEFAULT_SHOP_HOST.to_string()),
        ("SHOP_PORT", DEFAULT_SHOP_PORT.to_string()),
        ("SHOP_DATABASE_URL", DEFAULT_DATABASE_URL.to_string()),
        ("SHOP_PASSWORD_SCHEME", PasswordScheme::default().to_string()),
        ("SHOP_TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS.to_string()),
        ("SHOP_STRIPE_API_URL", DEFAULT_STRIPE_API_URL.to_string()),
        ("SHOP_CURRENCY", DEFAULT_CURRENCY.to_string()),
    ]
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHOP_HOST.to_string(),
            port: DEFAULT_SHOP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SHOP_HOST").ok().unwrap_or_else(|| DEFAULT_SHOP_HOST.into());
        let port = env_or("SHOP_PORT", DEFAULT_SHOP_PORT);
        let database_url = env::var("SHOP_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ SHOP_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::from_env_or_default();
        let stripe = StripeConfig::from_env_or_default();
        Self { host, port, database_url, auth, stripe }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC key used to sign and verify session tokens.
    pub jwt_secret: Secret<String>,
    /// The key that stored passwords are encrypted with when using the reversible scheme.
    pub password_secret: Secret<String>,
    pub password_scheme: PasswordScheme,
    /// How long a session token stays valid after it is issued.
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT and password secrets have not been set. I'm using random values for this session. DO \
             NOT operate on production like this since all sessions and stored passwords become unreadable when the \
             server restarts. 🚨️🚨️🚨️"
        );
        Self {
            jwt_secret: random_secret(),
            password_secret: random_secret(),
            password_scheme: PasswordScheme::default(),
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }
}

impl AuthConfig {
    pub fn from_env_or_default() -> Self {
        let jwt_secret = secret_from_env("SHOP_JWT_SECRET");
        let password_secret = secret_from_env("SHOP_PASSWORD_SECRET");
        let password_scheme = env_or("SHOP_PASSWORD_SCHEME", PasswordScheme::default());
        if password_scheme == PasswordScheme::Reversible {
            warn!(
                "🪛️ Passwords are stored with reversible encryption. Anyone with SHOP_PASSWORD_SECRET can read them. \
                 Set SHOP_PASSWORD_SCHEME=argon2 to store one-way hashes instead."
            );
        }
        let hours = env_or("SHOP_TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS);
        let token_ttl = if hours > 0 {
            Duration::hours(hours)
        } else {
            warn!("🪛️ SHOP_TOKEN_TTL_HOURS must be positive. Using the default of {DEFAULT_TOKEN_TTL_HOURS} hrs.");
            Duration::hours(DEFAULT_TOKEN_TTL_HOURS)
        };
        Self { jwt_secret, password_secret, password_scheme, token_ttl }
    }
}

fn random_secret() -> Secret<String> {
    let s: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
    Secret::new(s)
}

fn secret_from_env(name: &str) -> Secret<String> {
    match env::var(name) {
        Ok(s) if !s.is_empty() => Secret::new(s),
        _ => {
            warn!(
                "🚨️🚨️🚨️ {name} is not set. I'm using a random value for this session. DO NOT operate on production \
                 like this. 🚨️🚨️🚨️"
            );
            random_secret()
        },
    }
}

//-------------------------------------------------  StripeConfig  -----------------------------------------------------
#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: Secret<String>,
    /// Base URL of the charges API, without a trailing slash
    pub api_url: String,
    pub currency: String,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: Secret::default(),
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl StripeConfig {
    pub fn from_env_or_default() -> Self {
        let secret_key = env::var("SHOP_STRIPE_SECRET_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ SHOP_STRIPE_SECRET_KEY is not set. Payment requests will fail until it is configured.");
            String::default()
        });
        let api_url = env_or("SHOP_STRIPE_API_URL", DEFAULT_STRIPE_API_URL.to_string()).trim_end_matches('/').to_string();
        let currency = env_or("SHOP_CURRENCY", DEFAULT_CURRENCY.to_string()).to_lowercase();
        Self { secret_key: Secret::new(secret_key), api_url, currency }
    }
}
