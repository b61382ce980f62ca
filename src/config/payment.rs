//! Payment configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Razorpay,
    /// Accepts every signature; development only
    #[default]
    Mock,
}

/// Payment configuration (Razorpay)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub provider: PaymentProvider,

    /// Public key id, also handed to the checkout client
    #[serde(default)]
    pub razorpay_key_id: String,

    pub razorpay_key_secret: Option<SecretString>,

    pub razorpay_webhook_secret: Option<SecretString>,

    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PaymentConfig {
    /// Check if using Razorpay test keys
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        match self.provider {
            PaymentProvider::Mock if *environment == Environment::Production => {
                Err(ValidationError::MockPaymentInProduction)
            }
            PaymentProvider::Mock => Ok(()),
            PaymentProvider::Razorpay => {
                if self.razorpay_key_id.is_empty() {
                    return Err(ValidationError::MissingRequired("RAZORPAY_KEY_ID"));
                }
                if !self.razorpay_key_id.starts_with("rzp_") {
                    return Err(ValidationError::InvalidRazorpayKey);
                }
                if self.razorpay_key_secret.is_none() {
                    return Err(ValidationError::MissingRequired("RAZORPAY_KEY_SECRET"));
                }
                if self.razorpay_webhook_secret.is_none() {
                    return Err(ValidationError::MissingRequired("RAZORPAY_WEBHOOK_SECRET"));
                }
                Ok(())
            }
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}
