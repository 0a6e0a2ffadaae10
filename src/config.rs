use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Number of batch worker permits; fixed regardless of item count.
    pub batch_workers: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let batch_workers = env::var("BATCH_WORKERS")
            .unwrap_or_else(|_| "8".to_string())
            .parse::<usize>()
            .context("BATCH_WORKERS must be a valid usize")?
            .max(1);

        Ok(Self {
            host,
            port,
            batch_workers,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
