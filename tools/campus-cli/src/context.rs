//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use campus_commerce::checkout::AuthToken;
use campus_commerce::persist::{JsonFileBackend, PersistentCart};
use campus_commerce::search::{LocalCatalog, ProductSource};
use campus_commerce::Currency;
use campus_data::{FetchClient, MarketplaceApi};

use crate::config::{CampusConfig, CONFIG_NAMES};
use crate::output::Output;

/// The file-backed cart the CLI operates on; notifications print as toasts.
pub type Cart = PersistentCart<Output, JsonFileBackend>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, environment overrides applied.
    pub config: CampusConfig,
    /// Where the configuration was read from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CampusConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CampusConfig::load(&path)?, Some(path)),
                None => (CampusConfig::default(), None),
            },
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    pub fn currency(&self) -> Result<Currency> {
        self.config.currency()
    }

    /// Backend client built from `[api]`.
    pub fn api(&self) -> Result<MarketplaceApi> {
        let client = FetchClient::new()
            .with_base_url(self.config.api.base_url.clone())
            .with_default_header("Accept", "application/json")
            .with_timeout(self.config.request_timeout());
        Ok(MarketplaceApi::with_client(client).with_currency(self.currency()?))
    }

    /// Token of the signed-in user, if configured.
    pub fn token(&self) -> Option<AuthToken> {
        AuthToken::from_optional(self.config.api.token.as_deref())
    }

    /// Listings from a local JSON catalog when given, the backend otherwise.
    pub fn product_source(&self, catalog: Option<&Path>) -> Result<Box<dyn ProductSource>> {
        match catalog {
            Some(path) => {
                let path = resolve(&self.cwd, path);
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
                let catalog = LocalCatalog::from_json(&json)
                    .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
                self.output
                    .debug(&format!("Using local catalog ({} listings)", catalog.products().len()));
                Ok(Box::new(catalog))
            }
            None => {
                self.output
                    .debug(&format!("Using backend at {}", self.config.api.base_url));
                Ok(Box::new(self.api()?))
            }
        }
    }

    pub fn cart_path(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.cart.path)
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<Cart> {
        let path = self.cart_path();
        PersistentCart::open(self.output.clone(), JsonFileBackend::new(&path))
            .with_context(|| format!("Failed to open cart: {}", path.display()))
    }

    /// Where `config init` writes to.
    pub fn default_config_path(&self) -> PathBuf {
        self.cwd.join(CONFIG_NAMES[0])
    }
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Find a config file in `start` or its ancestors.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}
