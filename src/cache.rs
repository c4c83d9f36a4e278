//! Query cache for trade snapshots
//!
//! Snapshots are keyed by the [`TradeQuery`] that produced them and reused
//! while younger than the freshness window. Nothing expires on its own in
//! the background; callers invalidate after mutations.

use crate::types::{Trade, TradeQuery};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Immutable, shareable trade snapshot
pub type Snapshot = Arc<Vec<Trade>>;

struct CacheEntry {
    trades: Snapshot,
    fetched_at: Instant,
}

pub struct TradeCache {
    entries: RwLock<HashMap<TradeQuery, CacheEntry>>,
    ttl: Duration,
}

impl TradeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh snapshot for `query`, if any
    pub fn get(&self, query: &TradeQuery) -> Option<Snapshot> {
        let entries = self.entries.read();
        entries
            .get(query)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.trades.clone())
    }

    pub fn put(&self, query: TradeQuery, trades: Vec<Trade>) -> Snapshot {
        let trades = Arc::new(trades);
        self.entries.write().insert(
            query,
            CacheEntry {
                trades: trades.clone(),
                fetched_at: Instant::now(),
            },
        );
        trades
    }

    pub fn invalidate(&self, query: &TradeQuery) -> bool {
        self.entries.write().remove(query).is_some()
    }

    /// Drop every snapshot. Any mutation can change every query's result.
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
