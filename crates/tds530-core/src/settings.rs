//! Settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies. Adapters
//! fill them from flags, environment variables and the `.env` file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default instrument address (factory setting of the logger's LAN port).
pub const DEFAULT_INSTRUMENT_HOST: &str = "192.168.100.100";

/// Default instrument TCP port.
pub const DEFAULT_INSTRUMENT_PORT: u16 = 4242;

/// Default bind address of the local HTTP UI.
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default port of the local HTTP UI.
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Per-read wait before checking again for a reply.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 500;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 2_000;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Hostname or IP address of the instrument.
    pub instrument_host: Option<String>,

    /// TCP port of the instrument.
    pub instrument_port: Option<u16>,

    /// Address the HTTP UI binds to.
    pub http_host: Option<String>,

    /// Port the HTTP UI listens on.
    pub http_port: Option<u16>,

    /// TSV file samples are appended to. `None` disables recording.
    pub output_path: Option<String>,

    /// Directory holding the web UI (`index.html` and assets).
    pub www_dir: Option<String>,

    /// Pause between a reply and the next request, in milliseconds.
    pub poll_interval_ms: Option<u64>,

    /// Wait per socket read before polling again, in milliseconds.
    pub read_timeout_ms: Option<u64>,

    /// Upper bound for establishing the TCP connection, in milliseconds.
    pub connect_timeout_ms: Option<u64>,

    /// Pause before reconnecting after a lost connection, in milliseconds.
    pub reconnect_delay_ms: Option<u64>,

    /// Whether to reconnect after the instrument drops the connection.
    pub reconnect: Option<bool>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            instrument_host: Some(DEFAULT_INSTRUMENT_HOST.to_string()),
            instrument_port: Some(DEFAULT_INSTRUMENT_PORT),
            http_host: Some(DEFAULT_HTTP_HOST.to_string()),
            http_port: Some(DEFAULT_HTTP_PORT),
            output_path: None,
            www_dir: None,
            poll_interval_ms: Some(0),
            read_timeout_ms: Some(DEFAULT_READ_TIMEOUT_MS),
            connect_timeout_ms: Some(DEFAULT_CONNECT_TIMEOUT_MS),
            reconnect_delay_ms: Some(DEFAULT_RECONNECT_DELAY_MS),
            reconnect: Some(true),
        }
    }

    #[must_use]
    pub fn effective_instrument_host(&self) -> &str {
        self.instrument_host
            .as_deref()
            .unwrap_or(DEFAULT_INSTRUMENT_HOST)
    }

    #[must_use]
    pub const fn effective_instrument_port(&self) -> u16 {
        match self.instrument_port {
            Some(port) => port,
            None => DEFAULT_INSTRUMENT_PORT,
        }
    }

    /// `host:port` of the instrument.
    #[must_use]
    pub fn instrument_address(&self) -> String {
        format!(
            "{}:{}",
            self.effective_instrument_host(),
            self.effective_instrument_port()
        )
    }

    #[must_use]
    pub fn effective_http_host(&self) -> &str {
        self.http_host.as_deref().unwrap_or(DEFAULT_HTTP_HOST)
    }

    #[must_use]
    pub const fn effective_http_port(&self) -> u16 {
        match self.http_port {
            Some(port) => port,
            None => DEFAULT_HTTP_PORT,
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(0))
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.unwrap_or(DEFAULT_READ_TIMEOUT_MS))
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(
            self.connect_timeout_ms
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
        )
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(
            self.reconnect_delay_ms
                .unwrap_or(DEFAULT_RECONNECT_DELAY_MS),
        )
    }

    #[must_use]
    pub fn effective_reconnect(&self) -> bool {
        self.reconnect.unwrap_or(true)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref host) = other.instrument_host {
            self.instrument_host.clone_from(host);
        }
        if let Some(port) = other.instrument_port {
            self.instrument_port = port;
        }
        if let Some(ref host) = other.http_host {
            self.http_host.clone_from(host);
        }
        if let Some(port) = other.http_port {
            self.http_port = port;
        }
        if let Some(ref path) = other.output_path {
            self.output_path.clone_from(path);
        }
        if let Some(ref dir) = other.www_dir {
            self.www_dir.clone_from(dir);
        }
        if let Some(ms) = other.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(ms) = other.read_timeout_ms {
            self.read_timeout_ms = ms;
        }
        if let Some(ms) = other.connect_timeout_ms {
            self.connect_timeout_ms = ms;
        }
        if let Some(ms) = other.reconnect_delay_ms {
            self.reconnect_delay_ms = ms;
        }
        if let Some(reconnect) = other.reconnect {
            self.reconnect = reconnect;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub instrument_host: Option<Option<String>>,
    pub instrument_port: Option<Option<u16>>,
    pub http_host: Option<Option<String>>,
    pub http_port: Option<Option<u16>>,
    pub output_path: Option<Option<String>>,
    pub www_dir: Option<Option<String>>,
    pub poll_interval_ms: Option<Option<u64>>,
    pub read_timeout_ms: Option<Option<u64>>,
    pub connect_timeout_ms: Option<Option<u64>>,
    pub reconnect_delay_ms: Option<Option<u64>>,
    pub reconnect: Option<Option<bool>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Instrument host cannot be empty")]
    EmptyHost,

    #[error("{field} must not be 0")]
    InvalidPort { field: &'static str },

    #[error("Read timeout must be between 10 and 60,000 ms, got {0}")]
    InvalidReadTimeout(u64),

    #[error("Connect timeout must be between 100 and 600,000 ms, got {0}")]
    InvalidConnectTimeout(u64),

    #[error("Poll interval must be at most 3,600,000 ms, got {0}")]
    InvalidPollInterval(u64),

    #[error("Reconnect delay must be at most 3,600,000 ms, got {0}")]
    InvalidReconnectDelay(u64),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(ref host) = settings.instrument_host {
        if host.trim().is_empty() {
            return Err(SettingsError::EmptyHost);
        }
    }

    if settings.instrument_port == Some(0) {
        return Err(SettingsError::InvalidPort {
            field: "Instrument port",
        });
    }

    if let Some(ms) = settings.read_timeout_ms {
        if !(10..=60_000).contains(&ms) {
            return Err(SettingsError::InvalidReadTimeout(ms));
        }
    }

    if let Some(ms) = settings.connect_timeout_ms {
        if !(100..=600_000).contains(&ms) {
            return Err(SettingsError::InvalidConnectTimeout(ms));
        }
    }

    if let Some(ms) = settings.poll_interval_ms {
        if ms > 3_600_000 {
            return Err(SettingsError::InvalidPollInterval(ms));
        }
    }

    if let Some(ms) = settings.reconnect_delay_ms {
        if ms > 3_600_000 {
            return Err(SettingsError::InvalidReconnectDelay(ms));
        }
    }

    Ok(())
}
