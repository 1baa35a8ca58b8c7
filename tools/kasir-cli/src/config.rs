//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use kasir_client::printer::PrintOptions;
use kasir_client::ClientConfig;
use kasir_core::receipt::DEFAULT_RECEIPT_WIDTH;
use serde::{Deserialize, Serialize};

/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "KASIR_API_URL";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// API endpoint and timeouts.
    #[serde(default)]
    pub api: ClientConfig,

    /// Store details printed on receipts.
    #[serde(default)]
    pub store: StoreConfig,

    /// Receipt printer.
    #[serde(default)]
    pub printer: PrinterConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Apply an API URL taken from the environment.
    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }
}

/// Store details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name printed at the top of receipts.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Receipt width in characters.
    #[serde(default = "default_receipt_width")]
    pub receipt_width: usize,
}

fn default_store_name() -> String {
    "NAMA TOKO".to_string()
}

fn default_receipt_width() -> usize {
    DEFAULT_RECEIPT_WIDTH
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            receipt_width: default_receipt_width(),
        }
    }
}

/// Printer device and write pacing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Device node, e.g. `/dev/rfcomm0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,

    #[serde(flatten)]
    pub options: PrintOptions,
}

/// Generate a default kasir.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# kasir configuration

[api]
base_url = "{base_url}"
request_timeout = 30   # seconds
connect_timeout = 5    # seconds

[store]
name = "NAMA TOKO"
receipt_width = 32

[printer]
# device = "/dev/rfcomm0"
chunk_size = 512
chunk_delay = 50         # milliseconds
connect_timeout = 10000  # milliseconds
"#,
        base_url = base_url
    )
}
