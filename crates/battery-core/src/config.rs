//! Client configuration types

use crate::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration shared by every call made through one execution context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Prefix joined onto relative endpoints
    ///
    /// Endpoints that already carry a scheme (`http://`, `https://`) are used
    /// as is.
    #[serde(default)]
    pub base_url: String,

    /// Headers added to every request before the call-specific ones
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,

    /// Value of the `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Log the body of error responses
    #[serde(default)]
    pub debug_dump_response: bool,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Worker threads of an owned runtime (default: number of CPU cores)
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

fn default_user_agent() -> String {
    format!("battery/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            default_headers: BTreeMap::new(),
            user_agent: default_user_agent(),
            debug_dump_response: false,
            log_level: default_log_level(),
            worker_threads: None,
        }
    }
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes; empty input yields the defaults
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Create configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_debug_dump_response(mut self, enabled: bool) -> Self {
        self.debug_dump_response = enabled;
        self
    }

    /// Parsed log level, falling back to `Info` for unknown names
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }

    /// Resolve `endpoint` against [`base_url`](Self::base_url)
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        if self.base_url.is_empty() {
            return endpoint.to_string();
        }
        match (self.base_url.ends_with('/'), endpoint.starts_with('/')) {
            (true, true) => format!("{}{}", self.base_url, &endpoint[1..]),
            (false, false) if !endpoint.is_empty() => format!("{}/{}", self.base_url, endpoint),
            _ => format!("{}{}", self.base_url, endpoint),
        }
    }
}


#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;
