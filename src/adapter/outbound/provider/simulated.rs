//! Offline provider driven by seeded random walks.
//!
//! Every ticker gets its own generator seeded from the configured seed
//! and the ticker text, so runs with the same seed replay the same walks.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::settings::SimulatedConfig;
use crate::domain::id::AssetId;
use crate::domain::message::PriceResponse;
use crate::domain::snapshot::SentimentReading;
use crate::error::{Error, Result};
use crate::port::outbound::provider::{PriceProvider, SentimentProvider};

struct Walk {
    rng: StdRng,
    price: f64,
}

/// Random-walk prices and sentiment.
pub struct SimulatedProvider {
    config: SimulatedConfig,
    walks: Mutex<HashMap<AssetId, Walk>>,
}

impl SimulatedProvider {
    #[must_use]
    pub fn new(config: SimulatedConfig) -> Self {
        Self {
            config,
            walks: Mutex::new(HashMap::new()),
        }
    }

    fn ticker_seed(&self, ticker: &AssetId) -> u64 {
        // FNV-1a over the ticker, mixed with the configured seed.
        ticker
            .as_str()
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64 ^ self.config.seed, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
            })
    }

    fn with_walk<T>(&self, ticker: &AssetId, f: impl FnOnce(&mut Walk, &SimulatedConfig) -> T) -> T {
        let mut walks = self.walks.lock();
        let walk = walks.entry(ticker.clone()).or_insert_with(|| Walk {
            rng: StdRng::seed_from_u64(self.ticker_seed(ticker)),
            price: self.config.seed_price,
        });
        f(walk, &self.config)
    }

    /// Advance the walk one step and return the new price.
    pub fn step(&self, ticker: &AssetId) -> f64 {
        self.with_walk(ticker, |walk, config| {
            let volatility = config.volatility.abs();
            let change = if volatility > 0.0 {
                walk.rng.gen_range(-volatility..=volatility)
            } else {
                0.0
            };
            walk.price = (walk.price * (1.0 + change)).max(0.01);
            walk.price
        })
    }
}

#[async_trait]
impl PriceProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn price(&self, ticker: &AssetId) -> Result<PriceResponse> {
        let price = self.step(ticker);
        let volume = self.with_walk(ticker, |walk, _| walk.rng.gen_range(1_000..100_000));
        let price = Decimal::from_f64(price)
            .map(|p| p.round_dp(4))
            .ok_or_else(|| Error::Provider(format!("simulated price out of range for {ticker}")))?;

        Ok(PriceResponse {
            ticker: ticker.clone(),
            timestamp: Utc::now(),
            price,
            currency: self.config.currency.clone(),
            volume,
        })
    }
}

#[async_trait]
impl SentimentProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn sentiment(&self, ticker: &AssetId) -> Result<SentimentReading> {
        let (score, news_count) = self.with_walk(ticker, |walk, _| {
            (walk.rng.gen_range(-1.0_f64..=1.0), walk.rng.gen_range(0..=15_u32))
        });
        if news_count == 0 {
            return Ok(SentimentReading::neutral());
        }
        Ok(SentimentReading::try_new(score, score.abs(), news_count)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(seed: u64) -> SimulatedProvider {
        SimulatedProvider::new(SimulatedConfig {
            seed,
            ..SimulatedConfig::default()
        })
    }

    #[test]
    fn same_seed_replays_the_same_walk() {
        let a = provider(7);
        let b = provider(7);
        let ticker = AssetId::new("AAPL");
        for _ in 0..20 {
            assert_eq!(a.step(&ticker), b.step(&ticker));
        }
    }

    #[test]
    fn tickers_walk_independently() {
        let p = provider(7);
        let first: Vec<f64> = (0..5).map(|_| p.step(&AssetId::new("AAPL"))).collect();
        let second: Vec<f64> = (0..5).map(|_| p.step(&AssetId::new("MSFT"))).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn steps_stay_within_volatility() {
        let p = provider(1);
        let ticker = AssetId::new("BTC-USD");
        let mut previous = SimulatedConfig::default().seed_price;
        for _ in 0..100 {
            let next = p.step(&ticker);
            assert!((next / previous - 1.0).abs() <= 0.02 + 1e-9);
            previous = next;
        }
    }

    #[tokio::test]
    async fn sentiment_is_in_range() {
        let p = provider(3);
        for _ in 0..20 {
            let reading = p.sentiment(&AssetId::new("AAPL")).await.unwrap();
            assert!((-1.0..=1.0).contains(&reading.score()));
            assert!((0.0..=1.0).contains(&reading.magnitude()));
        }
    }

    #[tokio::test]
    async fn prices_are_positive() {
        let p = provider(3);
        let response = p.price(&AssetId::new("AAPL")).await.unwrap();
        assert!(response.price > Decimal::ZERO);
        assert_eq!(response.currency, "USD");
    }
}
