//! Client configuration.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. Callers set only what they care about and rely on
//! the defaults for the rest.

use crate::error::ClientError;
use crate::layout::page_size::{ChromeLayout, PageSizeConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 10 MiB, the service's upload limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration for talking to the conversion service.
///
/// # Example
/// ```rust
/// use pdf2md_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8000")
///     .timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint("/files"), "http://localhost:8000/files");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the REST API, without a trailing slash.
    /// Default: `http://localhost:8000`.
    pub base_url: String,

    /// Per-request timeout in seconds. Default: 120.
    ///
    /// Upload and update block until the server has finished converting,
    /// which takes tens of seconds for long documents.
    pub timeout_secs: u64,

    /// Largest file accepted for upload or update, in bytes. Default: 10 MiB.
    pub max_upload_bytes: u64,

    /// Which flows enforce `max_upload_bytes` locally. Default: [`SizeLimitPolicy::All`].
    pub size_limit: SizeLimitPolicy,

    /// Geometry used to size list pages from the viewport height.
    pub page_size: PageSizeConfig,

    /// Quiet period before a resize recomputes the page size, in ms. Default: 150.
    pub resize_debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            size_limit: SizeLimitPolicy::default(),
            page_size: PageSizeConfig::default(),
            resize_debounce_ms: 150,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute URL for an API path such as `/files/abc`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn size_limit(mut self, policy: SizeLimitPolicy) -> Self {
        self.config.size_limit = policy;
        self
    }

    pub fn page_size(mut self, page_size: PageSizeConfig) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn items_per_page_bounds(mut self, min: u32, max: u32) -> Self {
        self.config.page_size.min_items = min;
        self.config.page_size.max_items = max;
        self
    }

    pub fn item_height(mut self, height: u32) -> Self {
        self.config.page_size.item_height = height;
        self
    }

    pub fn chrome(mut self, chrome: ChromeLayout) -> Self {
        self.config.page_size.chrome = chrome;
        self
    }

    pub fn resize_debounce_ms(mut self, ms: u64) -> Self {
        self.config.resize_debounce_ms = ms;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        let p = &c.page_size;
        if p.min_items == 0 || p.max_items == 0 {
            return Err(ClientError::InvalidConfig(
                "items-per-page bounds must be ≥ 1".into(),
            ));
        }
        if p.min_items > p.max_items {
            return Err(ClientError::InvalidConfig(format!(
                "min items per page ({}) exceeds max ({})",
                p.min_items, p.max_items
            )));
        }
        if p.item_height == 0 {
            return Err(ClientError::InvalidConfig(
                "item height must be ≥ 1".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(ClientError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Where the local upload size limit applies.
///
/// The service rejects oversize files itself; the local gate only saves a
/// round trip. `UpdateOnly` reproduces clients that check size when
/// replacing a file but let new uploads through to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeLimitPolicy {
    /// Check size before both upload and update. (default)
    #[default]
    All,
    /// Check size before update only.
    UpdateOnly,
}

impl SizeLimitPolicy {
    pub fn applies_to_upload(self) -> bool {
        self == SizeLimitPolicy::All
    }

    pub fn applies_to_update(self) -> bool {
        true
    }
}
