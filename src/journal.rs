//! Journal service
//!
//! Reads go through the query cache; writes go straight to the backend and
//! invalidate every cached snapshot.

use crate::cache::{Snapshot, TradeCache};
use crate::client::JournalBackend;
use crate::error::Result;
use crate::types::{NewTrade, Trade, TradeQuery};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct Journal {
    backend: Arc<dyn JournalBackend>,
    cache: TradeCache,
}

impl Journal {
    pub fn new(backend: Arc<dyn JournalBackend>, cache_ttl: Duration) -> Self {
        Self {
            backend,
            cache: TradeCache::new(cache_ttl),
        }
    }

    /// Snapshot for `query`, fetched from the backend on a cache miss
    pub async fn trades(&self, query: &TradeQuery) -> Result<Snapshot> {
        if let Some(snapshot) = self.cache.get(query) {
            debug!("Cache hit for {:?} ({} trades)", query, snapshot.len());
            return Ok(snapshot);
        }

        debug!("Cache miss for {:?}", query);
        let trades = self.backend.fetch_trades(query).await?;
        Ok(self.cache.put(query.clone(), trades))
    }

    pub async fn log_trade(&self, trade: &NewTrade) -> Result<Trade> {
        let stored = self.backend.insert_trade(trade).await?;
        self.cache.invalidate_all();
        info!("Logged trade {} {} ({})", stored.id, stored.symbol, stored.pnl);
        Ok(stored)
    }

    pub async fn delete_trade(&self, id: &str) -> Result<()> {
        self.backend.delete_trade(id).await?;
        self.cache.invalidate_all();
        info!("Deleted trade {}", id);
        Ok(())
    }

    /// End the session. Cached snapshots belong to the session and are
    /// dropped with it.
    pub async fn sign_out(&self) -> Result<()> {
        self.backend.sign_out().await?;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Force the next read of every query to hit the backend
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }
}
