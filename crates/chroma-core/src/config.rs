//! Configuration module
//!
//! This module provides configuration structures for the API server, covering
//! the HTTP listener, database, storage directories and the colorization model.
//! Values come from the environment (with `.env` support via dotenvy).

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 8000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 20;
const JPEG_QUALITY: u8 = 95;
const UPLOAD_DIR: &str = "uploads";
const COLORIZED_DIR: &str = "colorized";
const MODEL_PATH: &str = "colorization_release_v2.onnx";
const CLUSTER_CENTERS_PATH: &str = "pts_in_hull.npy";
const ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,bmp,webp,tif,tiff";

/// Settings shared by every server process
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// Colorization service configuration
#[derive(Clone, Debug)]
pub struct ColorizerConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage directories
    pub upload_dir: PathBuf,
    pub colorized_dir: PathBuf,
    // Model files, supplied out-of-band
    pub model_path: PathBuf,
    pub cluster_centers_path: PathBuf,
    // Upload limits
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub jpeg_quality: u8,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ColorizerConfig>);

impl Config {
    fn inner(&self) -> &ColorizerConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ColorizerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.inner().upload_dir
    }

    pub fn colorized_dir(&self) -> &PathBuf {
        &self.inner().colorized_dir
    }

    pub fn model_path(&self) -> &PathBuf {
        &self.inner().model_path
    }

    pub fn cluster_centers_path(&self) -> &PathBuf {
        &self.inner().cluster_centers_path
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.inner().jpeg_quality
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ColorizerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an in-memory map instead of the process environment.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = get("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = get("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let base = BaseConfig {
            server_port: get("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: get("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let config = ColorizerConfig {
            base,
            database_url: get("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            upload_dir: get("UPLOAD_DIR")
                .unwrap_or_else(|| UPLOAD_DIR.to_string())
                .into(),
            colorized_dir: get("COLORIZED_DIR")
                .unwrap_or_else(|| COLORIZED_DIR.to_string())
                .into(),
            model_path: get("MODEL_PATH")
                .unwrap_or_else(|| MODEL_PATH.to_string())
                .into(),
            cluster_centers_path: get("CLUSTER_CENTERS_PATH")
                .unwrap_or_else(|| CLUSTER_CENTERS_PATH.to_string())
                .into(),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions: split_list(
                &get("ALLOWED_EXTENSIONS").unwrap_or_else(|| ALLOWED_EXTENSIONS.to_string()),
            ),
            jpeg_quality: get("JPEG_QUALITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(JPEG_QUALITY),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
        }

        if self.upload_dir == self.colorized_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and COLORIZED_DIR must be different directories"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS cannot be empty"));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        Ok(())
    }
}
