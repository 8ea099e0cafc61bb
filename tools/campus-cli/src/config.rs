//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use campus_commerce::Currency;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "CAMPUS_API_URL";
/// Environment variable overriding `api.token`.
pub const ENV_TOKEN: &str = "CAMPUS_TOKEN";

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_NAMES: [&str; 3] = ["campus.toml", ".campus.toml", "campus.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampusConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Cart persistence.
    #[serde(default)]
    pub cart: CartConfig,

    /// Search behaviour.
    #[serde(default)]
    pub search: SearchConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CampusConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `CAMPUS_API_URL` / `CAMPUS_TOKEN` from `lookup`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token);
        }
        self
    }

    /// Currency the backend prices in.
    pub fn currency(&self) -> Result<Currency> {
        match Currency::from_code(&self.api.currency) {
            Some(currency) => Ok(currency),
            None => bail!("Unknown currency in api.currency: {}", self.api.currency),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Per-request limit for backend calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Read a dotted key such as `api.base_url`.
    pub fn get(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["api", "base_url"] => Ok(self.api.base_url.clone()),
            ["api", "token"] => Ok(self.api.token.as_ref().map_or("", |_| "(set)").to_string()),
            ["api", "currency"] => Ok(self.api.currency.clone()),
            ["api", "timeout_secs"] => Ok(self.api.timeout_secs.to_string()),
            ["cart", "path"] => Ok(self.cart.path.clone()),
            ["search", "debounce_ms"] => Ok(self.search.debounce_ms.to_string()),
            ["logging", "level"] => Ok(self.logging.level.clone()),
            ["logging", "format"] => Ok(self.logging.format.as_str().to_string()),
            _ => bail!("Unknown config key: {}", key),
        }
    }

    /// Set a dotted key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["api", "base_url"] => self.api.base_url = value.to_string(),
            ["api", "token"] => {
                self.api.token = (!value.is_empty()).then(|| value.to_string());
            }
            ["api", "currency"] => {
                if Currency::from_code(value).is_none() {
                    bail!("Unknown currency: {}", value);
                }
                self.api.currency = value.to_uppercase();
            }
            ["api", "timeout_secs"] => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("api.timeout_secs must be a number, got {value}"))?;
                if secs == 0 {
                    bail!("api.timeout_secs must be at least 1");
                }
                self.api.timeout_secs = secs;
            }
            ["cart", "path"] => self.cart.path = value.to_string(),
            ["search", "debounce_ms"] => {
                self.search.debounce_ms = value
                    .parse()
                    .with_context(|| format!("search.debounce_ms must be a number, got {value}"))?;
            }
            ["logging", "level"] => self.logging.level = value.to_string(),
            ["logging", "format"] => {
                self.logging.format = match value {
                    "compact" => LogFormat::Compact,
                    "json" => LogFormat::Json,
                    _ => bail!("logging.format must be 'compact' or 'json'"),
                };
            }
            _ => bail!("Unknown config key: {}", key),
        }

        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the marketplace backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// ISO code of the currency prices are quoted in.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Seconds to wait for each backend response.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_currency() -> String {
    Currency::default().code().to_string()
}

fn default_timeout_secs() -> u64 {
    campus_data::DEFAULT_TIMEOUT.as_secs()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            currency: default_currency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Cart persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartConfig {
    /// Cart file, relative to the working directory unless absolute.
    #[serde(default = "default_cart_path")]
    pub path: String,
}

fn default_cart_path() -> String {
    ".campus/cart.json".to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            path: default_cart_path(),
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

/// Generate a default campus.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Campus marketplace CLI configuration

[api]
base_url = "{base_url}"
# token = "written by `campus login --save`, or set CAMPUS_TOKEN"
currency = "INR"
timeout_secs = 15

[cart]
path = ".campus/cart.json"

[search]
debounce_ms = 300

[logging]
level = "warn"
format = "compact"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CampusConfig =
            toml::from_str(&generate_default_config("http://localhost:5000")).unwrap();
        assert_eq!(config, CampusConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CampusConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://market.example.edu"
            token = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://market.example.edu");
        assert_eq!(config.api.token.as_deref(), Some("abc"));
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.currency().unwrap(), Currency::INR);
    }

    #[test]
    fn test_env_overrides() {
        let config = CampusConfig::default().with_env_overrides(|key| match key {
            ENV_API_URL => Some("http://10.0.0.2:5000".to_string()),
            ENV_TOKEN => Some(" ".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.api.token, None);
    }

    #[test]
    fn test_get_and_set() {
        let mut config = CampusConfig::default();
        config.set("search.debounce_ms", "150").unwrap();
        config.set("logging.format", "json").unwrap();
        config.set("api.currency", "usd").unwrap();
        config.set("api.token", "secret").unwrap();
        config.set("api.timeout_secs", "30").unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.get("logging.format").unwrap(), "json");
        assert_eq!(config.currency().unwrap(), Currency::USD);
        assert_eq!(config.get("api.token").unwrap(), "(set)");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        assert!(config.set("api.currency", "XYZ").is_err());
        assert!(config.set("search.debounce_ms", "soon").is_err());
        assert!(config.set("api.timeout_secs", "0").is_err());
        assert!(config.get("build.target").is_err());
    }

    #[test]
    fn test_save_and_load_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CampusConfig::default();
        config.cart.path = "/tmp/cart.json".to_string();

        for name in ["campus.toml", "campus.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(CampusConfig::load(&path).unwrap(), config);
        }
    }
}
