//! Core journal types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single logged trade, as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    /// Net profit/loss after costs
    pub pnl: Decimal,
    pub date: NaiveDate,
    pub symbol: String,
    /// Whether the trade followed the user's predefined rules
    pub rules_followed: bool,
    pub emotion: Option<String>,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    /// Emotion tag, if present and not blank
    pub fn emotion_tag(&self) -> Option<&str> {
        self.emotion
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// A trade to be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrade {
    pub symbol: String,
    pub pnl: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub rules_followed: bool,
    #[serde(default)]
    pub emotion: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters of a trade collection query; also the cache key
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeQuery {
    /// Order by trade date
    pub order: SortOrder,
    pub limit: Option<usize>,
    /// Inclusive lower date bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to: Option<NaiveDate>,
}

impl TradeQuery {
    /// The full collection, oldest first
    pub fn all() -> Self {
        Self::default()
    }

    /// The `limit` most recent trades, newest first
    pub fn recent(limit: usize) -> Self {
        Self {
            order: SortOrder::Desc,
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }
}
