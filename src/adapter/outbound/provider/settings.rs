//! Market data provider configuration.

use serde::Deserialize;

/// Which provider implementation serves prices and sentiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    #[default]
    Yahoo,
    Simulated,
}

impl std::fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yahoo => write!(f, "yahoo"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}

/// `[providers]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub source: ProviderSource,
    pub yahoo: YahooConfig,
    pub simulated: SimulatedConfig,
}

/// HTTP client tuning for the Yahoo endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub retry_max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            retry_max_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

/// `[providers.yahoo]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// Chart endpoint; the ticker is appended as a path segment.
    pub chart_url: String,
    /// Search endpoint used for news headlines.
    pub search_url: String,
    /// Maximum news items scored per request.
    pub news_limit: usize,
    pub user_agent: String,
    pub http: HttpConfig,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".into(),
            search_url: "https://query1.finance.yahoo.com/v1/finance/search".into(),
            news_limit: 15,
            user_agent: concat!("augury/", env!("CARGO_PKG_VERSION")).into(),
            http: HttpConfig::default(),
        }
    }
}

/// `[providers.simulated]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    /// Starting price of every walk.
    pub seed_price: f64,
    /// Maximum relative move per step.
    pub volatility: f64,
    pub currency: String,
    /// RNG seed; the same seed replays the same walks.
    pub seed: u64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            seed_price: 100.0,
            volatility: 0.02,
            currency: "USD".into(),
            seed: 42,
        }
    }
}
