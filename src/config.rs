use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_RPC_URL_TEMPLATE: &str = "https://{network}.g.alchemy.com/v2/{key}";
pub const DEFAULT_NFT_URL_TEMPLATE: &str = "https://{network}.g.alchemy.com/nft/v2/{key}";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSourceKind {
    Static,
    CoinGecko,
}

impl From<&str> for PriceSourceKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "coingecko" => PriceSourceKind::CoinGecko,
            _ => PriceSourceKind::Static,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub rpc_url_template: String,
    pub nft_url_template: String,
    pub price_source: PriceSourceKind,
    pub coingecko_api_url: String,
    pub max_retries: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key =
            std::env::var("ALCHEMY_API_KEY").context("ALCHEMY_API_KEY must be set in .env")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8787".to_string())
            .parse()
            .context("Invalid PORT")?;

        let rpc_url_template = std::env::var("RPC_URL_TEMPLATE")
            .unwrap_or_else(|_| DEFAULT_RPC_URL_TEMPLATE.to_string());
        let nft_url_template = std::env::var("NFT_URL_TEMPLATE")
            .unwrap_or_else(|_| DEFAULT_NFT_URL_TEMPLATE.to_string());

        let price_source = std::env::var("PRICE_SOURCE")
            .map(|s| PriceSourceKind::from(s.as_str()))
            .unwrap_or(PriceSourceKind::Static);
        let coingecko_api_url = std::env::var("COINGECKO_API_URL")
            .unwrap_or_else(|_| DEFAULT_COINGECKO_API_URL.to_string());

        let max_retries = std::env::var("RPC_MAX_RETRIES")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .context("Invalid RPC_MAX_RETRIES")?;
        let timeout_secs: u64 = std::env::var("RPC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("Invalid RPC_TIMEOUT_SECS")?;

        let config = Config {
            host,
            port,
            api_key,
            rpc_url_template,
            nft_url_template,
            price_source,
            coingecko_api_url,
            max_retries,
            request_timeout: Duration::from_secs(timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Config pointing every provider URL at `base`, used by tests and local mocks.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_key: "test".to_string(),
            rpc_url_template: format!("{base}/{{network}}/v2/{{key}}"),
            nft_url_template: format!("{base}/{{network}}/nft/v2/{{key}}"),
            price_source: PriceSourceKind::Static,
            coingecko_api_url: format!("{base}/coingecko"),
            max_retries: 0,
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rpc_url_template.contains("{network}") {
            anyhow::bail!("RPC_URL_TEMPLATE must contain a {{network}} placeholder");
        }
        if !self.nft_url_template.contains("{network}") {
            anyhow::bail!("NFT_URL_TEMPLATE must contain a {{network}} placeholder");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("RPC_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn rpc_url(&self, network: &str) -> String {
        render_template(&self.rpc_url_template, network, &self.api_key)
    }

    pub fn nft_url(&self, network: &str) -> String {
        render_template(&self.nft_url_template, network, &self.api_key)
    }
}

fn render_template(template: &str, network: &str, key: &str) -> String {
    template.replace("{network}", network).replace("{key}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_network_and_key() {
        let mut config = Config::with_base_url("http://localhost:9000/");
        config.api_key = "abc".to_string();
        assert_eq!(
            config.rpc_url("polygon-mainnet"),
            "http://localhost:9000/polygon-mainnet/v2/abc"
        );
        assert_eq!(
            config.nft_url("eth-mainnet"),
            "http://localhost:9000/eth-mainnet/nft/v2/abc"
        );
    }

    #[test]
    fn rejects_template_without_network() {
        let mut config = Config::with_base_url("http://localhost:9000");
        config.rpc_url_template = "http://localhost:9000/v2/{key}".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn price_source_parsing_defaults_to_static() {
        assert_eq!(PriceSourceKind::from("CoinGecko"), PriceSourceKind::CoinGecko);
        assert_eq!(PriceSourceKind::from("anything"), PriceSourceKind::Static);
    }
}
