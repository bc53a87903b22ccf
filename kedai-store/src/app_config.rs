use crate::snap::{PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
use kedai_catalog::{Catalog, CatalogError, Product, ShippingOption, ShippingTable};
use kedai_shared::Masked;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub catalog: CatalogConfig,
    pub shipping: ShippingConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Midtrans Snap over HTTPS.
    Snap,
    /// In-process gateway that hands out fake tokens.
    Mock,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    #[serde(default)]
    pub is_production: bool,
    #[serde(default)]
    pub server_key: Masked<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Overrides the sandbox/production URL, e.g. for a local stub.
    pub base_url: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl GatewayConfig {
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.is_production) {
            (Some(url), _) => url,
            (None, true) => PRODUCTION_BASE_URL,
            (None, false) => SANDBOX_BASE_URL,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShippingConfig {
    pub options: Vec<ShippingOption>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CheckoutConfig {
    /// How long a paid-for order id stays blocked from resubmission.
    #[serde(default = "default_duplicate_window")]
    pub duplicate_window_seconds: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            duplicate_window_seconds: default_duplicate_window(),
        }
    }
}

fn default_duplicate_window() -> u64 {
    24 * 60 * 60
}

impl CheckoutConfig {
    pub fn duplicate_window(&self) -> Duration {
        Duration::from_secs(self.duplicate_window_seconds)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `KEDAI__GATEWAY__SERVER_KEY=SB-Mid-server-...`
            .add_source(config::Environment::with_prefix("KEDAI").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document with no file or environment layering.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.gateway.mode == GatewayMode::Snap && self.gateway.server_key.expose().is_empty() {
            return Err(config::ConfigError::Message(
                "gateway.server_key is required when gateway.mode = \"snap\"".into(),
            ));
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.catalog.products.clone())
    }

    pub fn shipping_table(&self) -> Result<ShippingTable, CatalogError> {
        ShippingTable::new(self.shipping.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
port = 3000

[gateway]
mode = "snap"
server_key = "SB-Mid-server-test"

[[catalog.products]]
id = "susu-loli"
name = "Susu Loli"
price = 17000

[[catalog.products]]
id = "susu-mommy"
name = "Susu Mommy"
price = 50000

[[shipping.options]]
destination = "Jakarta"
cost = 9000

[[shipping.options]]
destination = "Bandung"
cost = 12000
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.gateway.mode, GatewayMode::Snap);
        assert_eq!(config.gateway.timeout_seconds, 30);
        assert_eq!(config.gateway.base_url(), SANDBOX_BASE_URL);
        assert_eq!(config.catalog().unwrap().products().len(), 2);
        assert_eq!(config.shipping_table().unwrap().cost("Bandung"), Some(12000));
        assert_eq!(config.checkout.duplicate_window(), Duration::from_secs(86400));
    }

    #[test]
    fn test_duplicate_window_override() {
        let source = format!("{}\n[checkout]\nduplicate_window_seconds = 600\n", SAMPLE);
        let config = Config::from_toml(&source).unwrap();

        assert_eq!(config.checkout.duplicate_window(), Duration::from_secs(600));
    }

    #[test]
    fn test_server_key_is_masked_in_debug() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let debug = format!("{:?}", config.gateway);

        assert!(!debug.contains("SB-Mid-server-test"));
        assert_eq!(config.gateway.server_key.expose(), "SB-Mid-server-test");
    }

    #[test]
    fn test_snap_mode_requires_server_key() {
        let without_key = SAMPLE.replace("server_key = \"SB-Mid-server-test\"\n", "");
        assert!(Config::from_toml(&without_key).is_err());

        let mock = without_key.replace("mode = \"snap\"", "mode = \"mock\"");
        assert!(Config::from_toml(&mock).is_ok());
    }

    #[test]
    fn test_production_and_override_urls() {
        let mut config = Config::from_toml(SAMPLE).unwrap();
        config.gateway.is_production = true;
        assert_eq!(config.gateway.base_url(), PRODUCTION_BASE_URL);

        config.gateway.base_url = Some("http://127.0.0.1:9999".into());
        assert_eq!(config.gateway.base_url(), "http://127.0.0.1:9999");
    }
}
