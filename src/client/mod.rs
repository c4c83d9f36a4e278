//! Backend client
//!
//! The journal only needs four things from the managed backend; they are
//! collected in [`JournalBackend`] so the rest of the crate never depends on
//! a concrete HTTP implementation.

pub mod rest;

#[cfg(test)]
mod tests;

pub use rest::RestBackend;

use crate::error::Result;
use crate::types::{NewTrade, Trade, TradeQuery};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JournalBackend: Send + Sync {
    /// Snapshot of the trade collection matching `query`
    async fn fetch_trades(&self, query: &TradeQuery) -> Result<Vec<Trade>>;

    /// Store a trade and return it as persisted
    async fn insert_trade(&self, trade: &NewTrade) -> Result<Trade>;

    async fn delete_trade(&self, id: &str) -> Result<()>;

    /// End the current user session
    async fn sign_out(&self) -> Result<()>;
}
