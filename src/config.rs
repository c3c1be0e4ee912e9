use std::env;

use tracing::warn;

const DEFAULT_DATABASE_URL: &str = "hospital.db";
const DEFAULT_JWT_SECRET: &str = "jwt-secret";
const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60 * 4;
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_TELEMEDICINE_BASE_URL: &str = "https://telemedicine.example.com/sessions";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bind_address: String,
    pub pool_size: u32,
    pub telemedicine_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            warn!("DATABASE_URL not set, using {}", DEFAULT_DATABASE_URL);
            DEFAULT_DATABASE_URL.to_string()
        });
        let jwt_secret = lookup("JWT_SECRET_KEY").unwrap_or_else(|| {
            warn!("JWT_SECRET_KEY not set, using the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });
        let token_ttl_secs = parse_or(
            "JWT_ACCESS_TOKEN_EXPIRES",
            lookup("JWT_ACCESS_TOKEN_EXPIRES"),
            DEFAULT_TOKEN_TTL_SECS,
        );
        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let pool_size = parse_or(
            "DATABASE_POOL_SIZE",
            lookup("DATABASE_POOL_SIZE"),
            DEFAULT_POOL_SIZE,
        );
        let telemedicine_base_url = lookup("TELEMEDICINE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TELEMEDICINE_BASE_URL.to_string());

        Self {
            database_url,
            jwt_secret,
            token_ttl_secs,
            bind_address,
            pool_size,
            telemedicine_base_url: telemedicine_base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using the default", key, raw);
            default
        }),
        None => default,
    }
}
