//! All-time-high tracking
//!
//! The tracker owns its records exclusively. Stored prices only move up:
//! a record is created on the first observed price and rewritten only when
//! a strictly higher price arrives. A failed persist never touches the
//! in-memory record; the next higher price simply attempts the write again.

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::ath::store::AthStore;
use crate::types::AthRecord;

#[derive(Debug, Clone)]
pub struct AthUpdate {
    pub updated: bool,
    pub record: AthRecord,
}

pub struct AthTracker {
    records: HashMap<String, AthRecord>,
    store: Option<AthStore>,
}

impl AthTracker {
    /// Open a tracker backed by durable storage. An unreadable store is
    /// logged and treated as empty rather than blocking startup.
    pub fn open(store: AthStore) -> Self {
        let records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Could not load ATH state, starting empty: {}", e);
                HashMap::new()
            }
        };

        Self {
            records,
            store: Some(store),
        }
    }

    /// Tracker with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            records: HashMap::new(),
            store: None,
        }
    }

    /// Record `price` if it strictly exceeds the stored ATH (or none is
    /// stored yet). Non-increasing prices leave the record untouched.
    pub fn record_if_higher(&mut self, token: &str, price: Decimal) -> AthUpdate {
        match self.records.get_mut(token) {
            Some(existing) if price > existing.price => {
                existing.price = price;
                existing.timestamp = Utc::now();
                let record = existing.clone();
                info!("New ATH for {}: {}", token, price);
                self.persist();
                AthUpdate {
                    updated: true,
                    record,
                }
            }
            Some(existing) => AthUpdate {
                updated: false,
                record: existing.clone(),
            },
            None => {
                let record = AthRecord {
                    token: token.to_string(),
                    price,
                    timestamp: Utc::now(),
                };
                self.records.insert(token.to_string(), record.clone());
                self.persist();
                AthUpdate {
                    updated: true,
                    record,
                }
            }
        }
    }

    pub fn current(&self, token: &str) -> Option<&AthRecord> {
        self.records.get(token)
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            // Storage failures are never surfaced to users; the record in
            // memory stays authoritative and the next update retries.
            if let Err(e) = store.persist(&self.records) {
                warn!("Failed to persist ATH state: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn first_price_creates_a_record() {
        let mut tracker = AthTracker::in_memory();

        let update = tracker.record_if_higher("cake", dec!(0.15));
        assert!(update.updated);
        assert_eq!(update.record.price, dec!(0.15));
        assert_eq!(tracker.current("cake").unwrap().price, dec!(0.15));
    }

    #[test]
    fn only_strictly_higher_prices_update() {
        let mut tracker = AthTracker::in_memory();
        tracker.record_if_higher("cake", dec!(0.15));

        assert!(!tracker.record_if_higher("cake", dec!(0.15)).updated);
        assert!(!tracker.record_if_higher("cake", dec!(0.10)).updated);
        assert_eq!(tracker.current("cake").unwrap().price, dec!(0.15));

        assert!(tracker.record_if_higher("cake", dec!(0.16)).updated);
        assert_eq!(tracker.current("cake").unwrap().price, dec!(0.16));
    }

    #[test]
    fn repeated_non_increasing_sequences_are_idempotent() {
        let mut tracker = AthTracker::in_memory();
        tracker.record_if_higher("cake", dec!(2));
        let first = tracker.current("cake").unwrap().clone();

        for _ in 0..2 {
            for price in [dec!(2), dec!(1.5), dec!(0.01)] {
                assert!(!tracker.record_if_higher("cake", price).updated);
            }
        }
        assert_eq!(tracker.current("cake").unwrap(), &first);
    }

    #[test]
    fn tokens_are_tracked_independently() {
        let mut tracker = AthTracker::in_memory();
        tracker.record_if_higher("cake", dec!(1));
        tracker.record_if_higher("banana", dec!(9));

        assert_eq!(tracker.current("cake").unwrap().price, dec!(1));
        assert_eq!(tracker.current("banana").unwrap().price, dec!(9));
        assert!(tracker.current("other").is_none());
    }

    #[test]
    fn records_survive_a_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "ath-roundtrip-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let mut tracker = AthTracker::open(AthStore::new(&path));
            tracker.record_if_higher("cake", dec!(0.15));
            tracker.record_if_higher("cake", dec!(0.42));
        }

        let reopened = AthTracker::open(AthStore::new(&path));
        assert_eq!(reopened.current("cake").unwrap().price, dec!(0.42));

        let _ = std::fs::remove_file(&path);
    }

    proptest! {
        #[test]
        fn stored_price_is_monotonically_non_decreasing(
            prices in proptest::collection::vec(0u64..1_000_000, 1..50)
        ) {
            let mut tracker = AthTracker::in_memory();
            let mut last = Decimal::ZERO;

            for raw in prices {
                let price = Decimal::from(raw) / dec!(100);
                tracker.record_if_higher("cake", price);
                let stored = tracker.current("cake").unwrap().price;
                prop_assert!(stored >= last);
                prop_assert!(stored >= price);
                last = stored;
            }
        }
    }
}
