use crate::calc::autocalc::{DEFAULT_OVERTIME_MULTIPLIER, DEFAULT_OVERTIME_THRESHOLD};
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,

    // Auto-calculation defaults used when a preview request carries no settings
    pub overtime_threshold: f64,
    pub overtime_multiplier: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RATE_API_PER_MIN must be an integer"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            overtime_threshold: env::var("OVERTIME_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_OVERTIME_THRESHOLD),
            overtime_multiplier: env::var("OVERTIME_MULTIPLIER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_OVERTIME_MULTIPLIER),
        }
    }
}
