use bigdecimal::BigDecimal;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

const DEFAULT_MAX_TOPUP_AMOUNT: &str = "100000.00";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    /// PromptPay payee identifier: a Thai phone number, a 13-digit
    /// national id, or a 15-digit e-wallet id.
    pub promptpay_id: String,
    pub payment_webhook_secret: String,
    pub max_topup_amount: BigDecimal,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            promptpay_id: env::var("PROMPTPAY_ID")?,
            payment_webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET")?,
            max_topup_amount: env::var("MAX_TOPUP_AMOUNT")
                .unwrap_or_else(|_| DEFAULT_MAX_TOPUP_AMOUNT.to_string())
                .parse()
                .map_err(|e| anyhow::anyhow!("MAX_TOPUP_AMOUNT is not a valid decimal: {}", e))?,
        })
    }
}
