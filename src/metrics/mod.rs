//! Journal metrics
//!
//! Reduces an already-fetched trade snapshot into the summary shown on the
//! dashboard. Everything here is a pure function of its input: no state is
//! kept between calls and the input is never modified.

pub mod calendar;


pub use calendar::{DailyPnl, PnlCalendar};

use crate::config::HighlightKind;
use crate::types::Trade;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary statistics over a trade snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub total_trades: usize,
    /// Sum of net P&L
    pub pnl_total: Decimal,
    /// Percentage (0-100) of trades with positive P&L
    pub win_rate: Decimal,
    /// Percentage (0-100) of trades that followed the rules
    pub rule_compliance_rate: Decimal,
    pub highlight: Highlight,
}

/// The configurable fourth statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Highlight {
    /// Heuristic 0-100 composite of win rate, profitability and compliance.
    /// Not a statistically validated measure.
    TradeScore(u32),
    /// Most common emotion tag, `None` when no trade carries one
    MostFrequentEmotion(Option<String>),
}

impl TradeMetrics {
    pub fn is_profitable(&self) -> bool {
        self.pnl_total > Decimal::ZERO
    }
}

/// Compute summary metrics for `trades`.
///
/// Total over any finite input, including the empty slice, for which every
/// figure is zero and the highlight is its default. `pnl_total` saturates at
/// the `Decimal` bounds instead of overflowing.
pub fn compute_metrics(trades: &[Trade], highlight: HighlightKind) -> TradeMetrics {
    let total_trades = trades.len();
    let mut pnl_total = Decimal::ZERO;
    let mut wins = 0usize;
    let mut compliant = 0usize;

    for trade in trades {
        pnl_total = pnl_total.saturating_add(trade.pnl);
        if trade.is_win() {
            wins += 1;
        }
        if trade.rules_followed {
            compliant += 1;
        }
    }

    let win_rate = percentage(wins, total_trades);
    let rule_compliance_rate = percentage(compliant, total_trades);

    let highlight = match highlight {
        HighlightKind::Score => Highlight::TradeScore(trade_score(
            total_trades,
            win_rate,
            pnl_total,
            rule_compliance_rate,
        )),
        HighlightKind::Emotion => Highlight::MostFrequentEmotion(
            most_frequent_emotion(trades).map(str::to_string),
        ),
    };

    TradeMetrics {
        total_trades,
        pnl_total,
        win_rate,
        rule_compliance_rate,
        highlight,
    }
}

/// `part / total` as a 0-100 percentage, 0 when `total` is 0
fn percentage(part: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)
}

/// round(100 x win fraction x profit factor x compliance fraction), where the
/// profit factor is 1 for a net-profitable snapshot and 0.5 otherwise.
pub fn trade_score(
    total_trades: usize,
    win_rate: Decimal,
    pnl_total: Decimal,
    rule_compliance_rate: Decimal,
) -> u32 {
    if total_trades == 0 {
        return 0;
    }

    let profit_factor = if pnl_total > Decimal::ZERO {
        Decimal::ONE
    } else {
        Decimal::new(5, 1)
    };

    // Rates are already scaled by 100, so one division brings the product
    // back onto the 0-100 scale.
    (win_rate * profit_factor * rule_compliance_rate / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Most frequent non-blank emotion tag.
///
/// Ties go to the tag that reached the winning count first while walking
/// the trades in order, not to the tag that appeared first: for
/// `[calm, fear, fear, calm]` the result is `fear`.
pub fn most_frequent_emotion(trades: &[Trade]) -> Option<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut leader: Option<(&str, usize)> = None;

    for tag in trades.iter().filter_map(Trade::emotion_tag) {
        let count = counts.entry(tag).or_insert(0);
        *count += 1;

        if leader.map_or(true, |(_, best)| *count > best) {
            leader = Some((tag, *count));
        }
    }

    leader.map(|(tag, _)| tag)
}
