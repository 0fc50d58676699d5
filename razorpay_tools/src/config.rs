use std::time::Duration;

use affiliate_common::{helpers::parse_number_or_default, Secret};
use log::*;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";
pub const DEFAULT_GATEWAY_TIMEOUT: u64 = 10;

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// The public key id. This is handed to the checkout widget, so it is not secret.
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_url: String,
    /// Upper bound on every call made to the gateway.
    pub timeout: Duration,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            key_id: String::default(),
            key_secret: Secret::default(),
            api_url: DEFAULT_RAZORPAY_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT),
        }
    }
}

impl RazorpayConfig {
    pub fn new(key_id: &str, key_secret: &str) -> Self {
        Self { key_id: key_id.to_string(), key_secret: Secret::new(key_secret.to_string()), ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("ALS_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("💳️ ALS_RAZORPAY_KEY_ID not set. Orders cannot be created until it is configured.");
            String::default()
        });
        let key_secret = Secret::new(std::env::var("ALS_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("💳️ ALS_RAZORPAY_KEY_SECRET not set. Every payment signature will be rejected.");
            String::default()
        }));
        let api_url = std::env::var("ALS_RAZORPAY_API_URL").unwrap_or_else(|_| {
            info!("💳️ ALS_RAZORPAY_API_URL not set, using {DEFAULT_RAZORPAY_API_URL}");
            DEFAULT_RAZORPAY_API_URL.to_string()
        });
        let (secs, err) = parse_number_or_default(std::env::var("ALS_GATEWAY_TIMEOUT").ok(), DEFAULT_GATEWAY_TIMEOUT);
        if let Some(e) = err {
            warn!("💳️ ALS_GATEWAY_TIMEOUT: {e}");
        }
        Self { key_id, key_secret, api_url, timeout: Duration::from_secs(secs) }
    }
}
