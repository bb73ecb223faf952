//! In-memory price feed.

use std::sync::RwLock;

use rust_decimal::Decimal;

use crate::error::SourceFailure;
use crate::processors::{ExternalPriceFeed, FeedReading};

/// A feed whose answer is pushed by the owner, e.g. a replay driver or a
/// bridge from an off-process price stream.
#[derive(Debug)]
pub struct MemoryFeed {
    latest: RwLock<Result<FeedReading, SourceFailure>>,
}

impl MemoryFeed {
    pub fn new(value: Decimal, updated_at: u64) -> Self {
        Self {
            latest: RwLock::new(Ok(FeedReading::new(value, updated_at))),
        }
    }

    /// Publish a new answer.
    pub fn set(&self, value: Decimal, updated_at: u64) {
        self.store(Ok(FeedReading::new(value, updated_at)));
    }

    /// Make subsequent reads fail until the next `set`.
    pub fn fail(&self, reason: &str) {
        self.store(Err(SourceFailure::new(reason)));
    }

    fn store(&self, reading: Result<FeedReading, SourceFailure>) {
        match self.latest.write() {
            Ok(mut guard) => *guard = reading,
            Err(poisoned) => *poisoned.into_inner() = reading,
        }
    }
}

impl ExternalPriceFeed for MemoryFeed {
    fn latest_value(&self) -> Result<FeedReading, SourceFailure> {
        self.latest
            .read()
            .map_err(|_| SourceFailure::new("feed lock poisoned"))?
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_feed() {
        let feed = MemoryFeed::new(Decimal::ONE, 10);
        assert_eq!(feed.latest_value(), Ok(FeedReading::new(Decimal::ONE, 10)));

        feed.fail("down");
        assert_eq!(feed.latest_value(), Err(SourceFailure::new("down")));

        feed.set(Decimal::TWO, 20);
        assert_eq!(feed.latest_value().unwrap().updated_at, 20);
    }
}
