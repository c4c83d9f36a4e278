//! Trading Journal
//!
//! Client side of a trading journal backed by a hosted Postgres/REST service.
//!
//! ## Architecture
//!
//! ```text
//! Backend (REST + Auth) → Journal (query cache) → Metrics / Calendar → Dashboard (text, HTTP)
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod journal;
pub mod metrics;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
