//! Yahoo Finance client.
//!
//! Prices come from the chart endpoint's `meta` block. Sentiment is the
//! keyword score of the news headlines returned by the search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::lexicon;
use super::settings::YahooConfig;
use crate::domain::id::AssetId;
use crate::domain::message::PriceResponse;
use crate::domain::snapshot::SentimentReading;
use crate::error::{Error, Result};
use crate::port::outbound::provider::{PriceProvider, SentimentProvider};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    regular_market_volume: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
}

impl NewsItem {
    fn text(&self) -> String {
        match &self.summary {
            Some(summary) if !summary.is_empty() => format!("{} {summary}", self.title),
            _ => self.title.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Yahoo chart and search endpoints.
pub struct YahooClient {
    http: HttpClient,
    chart_url: Url,
    search_url: Url,
    news_limit: usize,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl YahooClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns an error if either endpoint URL does not parse.
    pub fn from_config(config: &YahooConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            chart_url: Url::parse(&config.chart_url)?,
            search_url: Url::parse(&config.search_url)?,
            news_limit: config.news_limit,
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
        })
    }

    fn chart_endpoint(&self, ticker: &AssetId) -> Result<Url> {
        let mut url = self.chart_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Provider(format!("chart url cannot be a base: {}", self.chart_url)))?
            .pop_if_empty()
            .push(ticker.as_str());
        url.query_pairs_mut()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        Ok(url)
    }

    fn search_endpoint(&self, ticker: &AssetId) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", ticker.as_str())
            .append_pair("quotesCount", "0")
            .append_pair("newsCount", &self.news_limit.to_string());
        url
    }

    async fn get_with_retry<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let outcome = match self.http.get(url.clone()).send().await {
                Ok(response) => match response.error_for_status() {
                    Ok(response) => response.json::<T>().await,
                    Err(err) => return Err(err.into()),
                },
                Err(err) => Err(err),
            };

            match outcome {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    warn!(attempt, max_attempts, error = %err, "HTTP request failed, retrying");
                    if self.retry_backoff_ms > 0 {
                        sleep(Duration::from_millis(self.retry_backoff_ms)).await;
                    }
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    /// Fetch the latest news texts for a ticker.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body does not parse.
    pub async fn news(&self, ticker: &AssetId) -> Result<Vec<String>> {
        let response: SearchResponse = self.get_with_retry(self.search_endpoint(ticker)).await?;
        let texts: Vec<String> = response
            .news
            .iter()
            .take(self.news_limit)
            .map(NewsItem::text)
            .collect();
        debug!(asset = %ticker, count = texts.len(), "Fetched news");
        Ok(texts)
    }
}

fn price_from_chart(ticker: &AssetId, envelope: ChartEnvelope) -> Result<PriceResponse> {
    if let Some(error) = envelope.chart.error {
        return Err(Error::Provider(format!(
            "chart error for {ticker}: {}",
            error.description.unwrap_or_else(|| "unknown".into())
        )));
    }
    let meta = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.meta)
        .ok_or_else(|| Error::Provider(format!("no chart data for {ticker}")))?;

    let price = meta
        .regular_market_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .and_then(Decimal::from_f64)
        .ok_or_else(|| Error::Provider(format!("no usable price for {ticker}")))?;

    Ok(PriceResponse {
        ticker: ticker.clone(),
        timestamp: Utc::now(),
        price,
        currency: meta.currency.unwrap_or_else(|| "USD".into()),
        volume: meta.regular_market_volume.unwrap_or(0),
    })
}

#[async_trait]
impl PriceProvider for YahooClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn price(&self, ticker: &AssetId) -> Result<PriceResponse> {
        let envelope: ChartEnvelope = self.get_with_retry(self.chart_endpoint(ticker)?).await?;
        let response = price_from_chart(ticker, envelope)?;
        debug!(asset = %ticker, price = %response.price, "Fetched price");
        Ok(response)
    }
}

#[async_trait]
impl SentimentProvider for YahooClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn sentiment(&self, ticker: &AssetId) -> Result<SentimentReading> {
        let texts = self.news(ticker).await?;
        Ok(lexicon::aggregate(texts.iter().map(String::as_str))?)
    }
}
