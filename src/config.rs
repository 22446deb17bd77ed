//! Runtime configuration, read from `QICOMPOSITE_*` environment variables.

use std::env::vars;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::composite::DEFAULT_CANVAS_SIZE;
use crate::error::ConfigError;
use crate::render::{DEFAULT_BARCODE_ENDPOINT, DEFAULT_QR_ENDPOINT};

const ENV_PREFIX: &str = "QICOMPOSITE_";

pub const DEFAULT_APP_NAME: &str = "QR Generator BD";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerConfig {
    pub app_name: String,
    pub qr_endpoint: String,
    pub barcode_endpoint: String,
    pub http_timeout: Duration,
    pub canvas_size: u32,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            app_name: DEFAULT_APP_NAME.to_string(),
            qr_endpoint: DEFAULT_QR_ENDPOINT.to_string(),
            barcode_endpoint: DEFAULT_BARCODE_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            canvas_size: DEFAULT_CANVAS_SIZE,
        }
    }
}

// Every field is optional; unset ones fall back to the defaults above.
#[derive(Debug, Deserialize)]
struct RawConfig {
    app_name: Option<String>,
    qr_endpoint: Option<String>,
    barcode_endpoint: Option<String>,
    http_timeout_secs: Option<u64>,
    canvas_size: Option<u32>,
}

impl ComposerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment variables");
        Self::from_vars(vars())
    }

    /// Builds a config from `(name, value)` pairs, keeping only `QICOMPOSITE_`-prefixed names.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_string(), value.into()))
            })
            .collect();
        let raw: RawConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let defaults = ComposerConfig::default();
        let canvas_size = raw.canvas_size.unwrap_or(defaults.canvas_size);
        if canvas_size == 0 {
            return Err(ConfigError::ZeroCanvas);
        }
        let http_timeout = match raw.http_timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.http_timeout,
        };
        Ok(ComposerConfig {
            app_name: raw.app_name.unwrap_or(defaults.app_name),
            qr_endpoint: raw.qr_endpoint.unwrap_or(defaults.qr_endpoint),
            barcode_endpoint: raw.barcode_endpoint.unwrap_or(defaults.barcode_endpoint),
            http_timeout,
            canvas_size,
        })
    }
}
