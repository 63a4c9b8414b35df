//! Card payments through Stripe's charges API.
//!
//! The storefront never sees card details. The client collects a card token from Stripe directly and hands it to
//! `POST /api/payment`, which turns it into a charge with [`PaymentProcessor::charge`].
use std::sync::Arc;

use log::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::StripeConfig;

#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    #[error("Could not initialize payment client: {0}")]
    Initialization(String),
    #[error("Payment processor is not configured. {0}")]
    NotConfigured(String),
    #[error("Could not reach the payment processor: {0}")]
    RequestError(String),
    #[error("Charge was declined. Error {status}. {message}")]
    Declined { status: u16, message: String },
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
}

/// The processor's record of a successful charge, passed through to the client as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeReceipt(pub Value);

#[allow(async_fn_in_trait)]
pub trait PaymentProcessor {
    /// Charges `amount` (in the smallest unit of the configured currency) to the card behind `token_id`.
    async fn charge(&self, token_id: &str, amount: i64) -> Result<ChargeReceipt, PaymentError>;
}

#[derive(Clone)]
pub struct StripeClient {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let client = Client::builder().build().map_err(|e| PaymentError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }
}

impl PaymentProcessor for StripeClient {
    async fn charge(&self, token_id: &str, amount: i64) -> Result<ChargeReceipt, PaymentError> {
        if self.config.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured("SHOP_STRIPE_SECRET_KEY is not set".to_string()));
        }
        let amount = amount.to_string();
        let params = [("source", token_id), ("amount", amount.as_str()), ("currency", self.config.currency.as_str())];
        debug!("💳️ Requesting a charge of {amount} {}", self.config.currency);
        let response = self
            .client
            .post(self.url("/charges"))
            .bearer_auth(self.config.secret_key.reveal())
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::RequestError(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            let receipt = response.json::<Value>().await.map_err(|e| PaymentError::JsonError(e.to_string()))?;
            info!("💳️ Charge {} succeeded", receipt["id"].as_str().unwrap_or("(no id)"));
            Ok(ChargeReceipt(receipt))
        } else {
            let message = response.text().await.map_err(|e| PaymentError::RequestError(e.to_string()))?;
            warn!("💳️ Charge failed with status {status}. {message}");
            Err(PaymentError::Declined { status: status.as_u16(), message })
        }
    }
}
