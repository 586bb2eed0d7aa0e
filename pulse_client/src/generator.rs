//! Simulated price source.
//!
//! `PriceGenerator` evolves one current price per catalog symbol with a bounded
//! random walk. Each step draws a change of up to ±5% of the symbol's *base*
//! price (not its current price) and clamps the result to `[0.5, 1.5] × base`.
//!
//! [`PriceGenerator::start`] runs the walk on a background thread: it emits the
//! base prices immediately, then one batch per interval, until the receiving
//! side is dropped.

use chrono::Utc;
use crossbeam_channel::{Receiver, tick, unbounded};
use log::{debug, info};
use pulse_common::{PriceSnapshot, Ticker};
use rand::Rng;
use std::thread;
use std::time::Duration;

/// Lower bound of the per-tick change, as a fraction of the base price.
pub const MIN_DELTA_PERCENT: f64 = -0.05;
/// Upper bound of the per-tick change, as a fraction of the base price.
pub const MAX_DELTA_PERCENT: f64 = 0.05;
/// Floor of the walk, as a multiple of the base price.
pub const MIN_PRICE_FACTOR: f64 = 0.5;
/// Ceiling of the walk, as a multiple of the base price.
pub const MAX_PRICE_FACTOR: f64 = 1.5;

struct SymbolPrice {
    symbol: String,
    base_price: f64,
    current_price: f64,
}

/// Random-walk generator over a fixed table of symbols.
pub struct PriceGenerator {
    prices: Vec<SymbolPrice>,
}

impl PriceGenerator {
    /// Generator over the whole ticker catalog.
    pub fn from_catalog() -> Self {
        Self::with_base_prices(
            Ticker::catalog().map(|ticker| (ticker.to_string(), ticker.base_price())),
        )
    }

    /// Generator over an explicit `(symbol, base price)` table. Each symbol
    /// starts at its base price.
    pub fn with_base_prices<I, S>(table: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let prices = table
            .into_iter()
            .map(|(symbol, base_price)| SymbolPrice {
                symbol: symbol.into(),
                base_price,
                current_price: base_price,
            })
            .collect();
        Self { prices }
    }

    /// Number of symbols per batch.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// `true` when the table is empty.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Base prices unchanged, `previous_price == price`.
    pub fn initial_batch(&self) -> Vec<PriceSnapshot> {
        self.prices
            .iter()
            .map(|entry| PriceSnapshot::now(&entry.symbol, entry.base_price, entry.base_price))
            .collect()
    }

    /// Advance every symbol one step using the thread-local RNG.
    pub fn next_batch(&mut self) -> Vec<PriceSnapshot> {
        self.next_batch_with(&mut rand::rng())
    }

    /// Advance every symbol one step using `rng`. All snapshots of a batch
    /// share one timestamp.
    pub fn next_batch_with<R: Rng>(&mut self, rng: &mut R) -> Vec<PriceSnapshot> {
        let stamp = Utc::now().timestamp_millis();
        self.prices
            .iter_mut()
            .map(|entry| {
                let previous_price = entry.current_price;
                let delta_percent = rng.random_range(MIN_DELTA_PERCENT..MAX_DELTA_PERCENT);
                entry.current_price = next_price(entry.base_price, previous_price, delta_percent);
                PriceSnapshot {
                    symbol: entry.symbol.clone(),
                    price: entry.current_price,
                    previous_price,
                    timestamp: stamp,
                }
            })
            .collect()
    }

    /// Run the walk on a background thread.
    ///
    /// The initial batch is queued before this returns. The thread exits on the
    /// first tick after the returned receiver is dropped.
    pub fn start(mut self, interval: Duration) -> Receiver<Vec<PriceSnapshot>> {
        let (tx, rx) = unbounded();
        let _ = tx.send(self.initial_batch());

        thread::spawn(move || {
            info!(
                "Price generator started for {} symbols every {:?}",
                self.len(),
                interval
            );
            let ticker = tick(interval);
            while ticker.recv().is_ok() {
                if tx.send(self.next_batch()).is_err() {
                    break;
                }
            }
            debug!("Price generator stopped");
        });
        rx
    }
}

/// One walk step: shift by `delta_percent` of the base price, then clamp to
/// the allowed band around the base price.
pub fn next_price(base_price: f64, current_price: f64, delta_percent: f64) -> f64 {
    let candidate = current_price + base_price * delta_percent;
    candidate
        .max(base_price * MIN_PRICE_FACTOR)
        .min(base_price * MAX_PRICE_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    #[test]
    fn initial_batch_uses_base_prices() {
        let generator = PriceGenerator::from_catalog();
        let batch = generator.initial_batch();

        assert_eq!(batch.len(), 25);
        for snapshot in &batch {
            let base = Ticker::from_symbol(&snapshot.symbol).unwrap().base_price();
            assert_eq!(snapshot.price, base);
            assert_eq!(snapshot.previous_price, base);
        }
    }

    #[test]
    fn prices_stay_within_band_for_many_ticks() {
        let mut generator = PriceGenerator::from_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let bases: HashMap<String, f64> = Ticker::catalog()
            .map(|t| (t.to_string(), t.base_price()))
            .collect();

        for _ in 0..2_000 {
            for snapshot in generator.next_batch_with(&mut rng) {
                let base = bases[&snapshot.symbol];
                assert!(snapshot.price >= base * MIN_PRICE_FACTOR, "{:?}", snapshot);
                assert!(snapshot.price <= base * MAX_PRICE_FACTOR, "{:?}", snapshot);
            }
        }
    }

    #[test]
    fn previous_price_chains_between_ticks() {
        let mut generator = PriceGenerator::with_base_prices([("AAPL", 100.0)]);
        let mut rng = StdRng::seed_from_u64(42);

        let first = generator.next_batch_with(&mut rng);
        let second = generator.next_batch_with(&mut rng);

        assert_eq!(first[0].previous_price, 100.0);
        assert_eq!(second[0].previous_price, first[0].price);
        assert!((first[0].price - 100.0).abs() <= 5.0);
    }

    #[test]
    fn step_is_relative_to_base_price() {
        // Near the ceiling a +5% of base move is clamped, a -5% of base move is not.
        assert_eq!(next_price(100.0, 148.0, 0.05), 150.0);
        assert!((next_price(100.0, 148.0, -0.05) - 143.0).abs() < 1e-9);
        assert_eq!(next_price(100.0, 51.0, -0.05), 50.0);
        assert!((next_price(200.0, 150.0, 0.02) - 154.0).abs() < 1e-9);
    }

    #[test]
    fn started_generator_emits_initial_batch_immediately() {
        let rx = PriceGenerator::with_base_prices([("AAPL", 10.0), ("GOOG", 20.0)])
            .start(Duration::from_millis(20));

        let initial = rx.try_recv().unwrap();
        assert_eq!(initial.len(), 2);
        assert_eq!(initial[0].price, 10.0);

        let next = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].previous_price, 10.0);
    }
}
