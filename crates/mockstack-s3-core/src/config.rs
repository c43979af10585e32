//! S3 engine configuration.
//!
//! Provides [`S3Config`], which carries the default page sizes applied when a
//! listing call leaves its cap unset. Values are loaded from environment
//! variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Page size S3 applies when a request does not name one.
const DEFAULT_PAGE_SIZE: usize = 1000;

/// S3 engine configuration.
///
/// # Examples
///
/// ```
/// use mockstack_s3_core::config::S3Config;
///
/// let config = S3Config::default();
/// assert_eq!(config.default_max_keys, 1000);
///
/// let small = S3Config::builder().default_max_keys(2).build();
/// assert_eq!(small.default_max_keys, 2);
/// assert_eq!(small.default_max_parts, 1000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct S3Config {
    /// Cap used by object and version listings when none is given.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub default_max_keys: usize,

    /// Cap used by `list_parts` when none is given.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub default_max_parts: usize,

    /// Cap used by `list_multipart_uploads` when none is given.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub default_max_uploads: usize,

    /// Cap used by `list_buckets_page` when none is given.
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub default_max_buckets: usize,

    /// Log level filter string (e.g. `"info"`, `"mockstack_s3_core=debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            default_max_keys: DEFAULT_PAGE_SIZE,
            default_max_parts: DEFAULT_PAGE_SIZE,
            default_max_uploads: DEFAULT_PAGE_SIZE,
            default_max_buckets: DEFAULT_PAGE_SIZE,
            log_level: String::from("info"),
        }
    }
}

impl S3Config {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults
    /// when unset or unparsable):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3_DEFAULT_MAX_KEYS` | `1000` |
    /// | `S3_DEFAULT_MAX_PARTS` | `1000` |
    /// | `S3_DEFAULT_MAX_UPLOADS` | `1000` |
    /// | `S3_DEFAULT_MAX_BUCKETS` | `1000` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(n) = env_usize("S3_DEFAULT_MAX_KEYS") {
            config.default_max_keys = n;
        }
        if let Some(n) = env_usize("S3_DEFAULT_MAX_PARTS") {
            config.default_max_parts = n;
        }
        if let Some(n) = env_usize("S3_DEFAULT_MAX_UPLOADS") {
            config.default_max_uploads = n;
        }
        if let Some(n) = env_usize("S3_DEFAULT_MAX_BUCKETS") {
            config.default_max_buckets = n;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            if !v.is_empty() {
                config.log_level = v;
            }
        }

        config
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| parse_usize(&v))
}

/// Parse a positive page size; zero and garbage are rejected.
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
