//! Razorpay orders API adapter.
//!
//! Orders are created over the REST API with basic auth (key id + secret).
//! Checkout callbacks and webhooks are verified locally with HMAC-SHA256.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::PaymentConfig;
use crate::domain::subscription::{verify_payment_signature, verify_webhook_signature, SignatureError};
use crate::ports::{GatewayOrder, PaymentError, PaymentGateway};

const RAZORPAY_API_BASE: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

pub struct RazorpayGateway {
    key_id: String,
    key_secret: SecretString,
    webhook_secret: SecretString,
    currency: String,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let key_secret = config.razorpay_key_secret.clone().ok_or(PaymentError::NotConfigured)?;
        let webhook_secret = config
            .razorpay_webhook_secret
            .clone()
            .ok_or(PaymentError::NotConfigured)?;
        Ok(Self {
            key_id: config.razorpay_key_id.clone(),
            key_secret,
            webhook_secret,
            currency: config.currency.clone(),
            http_client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, amount_paise: i64, receipt: &str) -> Result<GatewayOrder, PaymentError> {
        // Razorpay caps receipts at 40 characters
        let receipt: String = receipt.chars().take(40).collect();
        let request = CreateOrderRequest {
            amount: amount_paise,
            currency: &self.currency,
            receipt: &receipt,
        };

        let response = self
            .http_client
            .post(format!("{}/orders", RAZORPAY_API_BASE))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Razorpay create_order failed");
            return Err(PaymentError::Gateway(format!("Razorpay API error: {}", error_text)));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Gateway(format!("Failed to parse Razorpay response: {}", e)))?;

        Ok(GatewayOrder {
            order_id: order.id,
            amount_paise: order.amount,
            currency: order.currency,
            key_id: self.key_id.clone(),
        })
    }

    fn verify_payment(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<(), SignatureError> {
        verify_payment_signature(self.key_secret.expose_secret(), order_id, payment_id, signature)
    }

    fn verify_webhook(&self, body: &[u8], signature: &str) -> Result<(), SignatureError> {
        verify_webhook_signature(self.webhook_secret.expose_secret(), body, signature)
    }
}
