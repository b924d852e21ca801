//! # Node Configuration
//!
//! Unified configuration for every subsystem a node runs.
//!
//! Defaults come from `Default`; `from_env` overrides them from `LF_*`
//! environment variables. `validate` must pass before a node starts.

use lf_02_flow_engine::FlowConfig;
use shared_types::Currency;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Flow engine timeouts and buffers.
    pub flow: FlowConfig,
    pub vault: VaultConfig,
    /// Platform version stamped into every signature this node makes.
    pub platform_version: u32,
    pub issuance: IssuanceConfig,
    pub logging: LoggingConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            flow: FlowConfig::default(),
            vault: VaultConfig::default(),
            platform_version: 1,
            issuance: IssuanceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Vault configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Events buffered per bus subscriber before the oldest are dropped.
    pub event_capacity: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            event_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Issuer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceConfig {
    /// Currencies an issuer on this node will issue.
    pub allowed_currencies: Vec<Currency>,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            allowed_currencies: vec![Currency::USD, Currency::GBP, Currency::EUR, Currency::CHF],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `lf_02_flow_engine=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },

    /// A setting that must be non-zero is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// No currency may be issued.
    #[error("Currency allow-list is empty")]
    NoCurrencies,
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LF_*`
    /// variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse::<u64>(&lookup, "LF_SESSION_TIMEOUT_MS")? {
            config.flow.session_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>(&lookup, "LF_NOTARY_TIMEOUT_MS")? {
            config.flow.notary_timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = parse(&lookup, "LF_NOTARY_RETRIES")? {
            config.flow.notary_retries = retries;
        }
        if let Some(buffer) = parse(&lookup, "LF_SESSION_BUFFER")? {
            config.flow.session_buffer = buffer;
        }
        if let Some(capacity) = parse(&lookup, "LF_VAULT_EVENT_CAPACITY")? {
            config.vault.event_capacity = capacity;
        }
        if let Some(version) = parse(&lookup, "LF_PLATFORM_VERSION")? {
            config.platform_version = version;
        }
        if let Some(list) = lookup("LF_ALLOWED_CURRENCIES") {
            config.issuance.allowed_currencies = list
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(|code| {
                    Currency::new(code).map_err(|_| ConfigError::InvalidValue {
                        var: "LF_ALLOWED_CURRENCIES",
                        value: list.clone(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }
        if let Some(level) = lookup("LF_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = parse(&lookup, "LF_JSON_LOGS")? {
            config.logging.json = json;
        }

        Ok(config)
    }

    /// Reject settings a node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flow.session_timeout.is_zero() {
            return Err(ConfigError::Zero("session timeout"));
        }
        if self.flow.notary_timeout.is_zero() {
            return Err(ConfigError::Zero("notary timeout"));
        }
        if self.flow.session_buffer == 0 {
            return Err(ConfigError::Zero("session buffer"));
        }
        if self.vault.event_capacity == 0 {
            return Err(ConfigError::Zero("vault event capacity"));
        }
        if self.platform_version == 0 {
            return Err(ConfigError::Zero("platform version"));
        }
        if self.issuance.allowed_currencies.is_empty() {
            return Err(ConfigError::NoCurrencies);
        }
        Ok(())
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
