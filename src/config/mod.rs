use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

use crate::error::AppError;

/// Full runtime configuration, assembled from an optional
/// `configuration` file, `APP__`-prefixed variables, and plain
/// environment variables (loaded from `.env` in development).
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(flatten)]
    pub http: HttpConfig,
    pub mongodb: MongoConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}

impl MarketplaceConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let http: HttpConfig = Config::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        let is_prod = env::var("ENVIRONMENT")
            .map(|v| v == "prod" || v == "production")
            .unwrap_or(false);

        Ok(MarketplaceConfig {
            http,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("marketplace_db"), is_prod)?,
            },
            cors: CorsConfig {
                allowed_origins: get_env("CORS_ALLOWED_ORIGINS", Some("*"), is_prod)?
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
            },
        })
    }
}

/// Reads an environment variable, falling back to `default` outside of
/// production. In production a missing variable is a hard error so that
/// a misconfigured deployment fails at startup instead of at first use.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => match default {
            Some(value) if !is_prod => Ok(value.to_string()),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "Missing required environment variable: {}",
                key
            ))),
        },
    }
}
