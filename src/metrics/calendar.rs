//! Daily P&L calendar

use crate::types::Trade;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated trading result for one calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPnl {
    pub pnl: Decimal,
    pub trades: usize,
    pub wins: usize,
}

/// Date -> daily P&L, ordered by date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PnlCalendar {
    days: BTreeMap<NaiveDate, DailyPnl>,
}

impl PnlCalendar {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut days: BTreeMap<NaiveDate, DailyPnl> = BTreeMap::new();

        for trade in trades {
            let day = days.entry(trade.date).or_default();
            day.pnl = day.pnl.saturating_add(trade.pnl);
            day.trades += 1;
            if trade.is_win() {
                day.wins += 1;
            }
        }

        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyPnl> {
        self.days.get(&date)
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DailyPnl)> {
        self.days.iter()
    }

    /// (year, month) of the most recent trading day
    pub fn latest_month(&self) -> Option<(i32, u32)> {
        self.days
            .keys()
            .next_back()
            .map(|d| (d.year(), d.month()))
    }

    /// Every date of the month with its entry, if any. Empty for an invalid month.
    pub fn month_days(&self, year: i32, month: u32) -> Vec<(NaiveDate, Option<&DailyPnl>)> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|d| (d, self.days.get(&d)))
            .collect()
    }

    /// Net P&L of a month, saturating at the `Decimal` bounds
    pub fn month_total(&self, year: i32, month: u32) -> Decimal {
        self.days
            .iter()
            .filter(|(d, _)| d.year() == year && d.month() == month)
            .fold(Decimal::ZERO, |total, (_, day)| total.saturating_add(day.pnl))
    }

    /// Day with the highest P&L; the earliest one on ties
    pub fn best_day(&self) -> Option<(NaiveDate, &DailyPnl)> {
        self.days
            .iter()
            .fold(None, |best: Option<(NaiveDate, &DailyPnl)>, (d, day)| match best {
                Some((_, b)) if b.pnl >= day.pnl => best,
                _ => Some((*d, day)),
            })
    }

    /// Day with the lowest P&L; the earliest one on ties
    pub fn worst_day(&self) -> Option<(NaiveDate, &DailyPnl)> {
        self.days
            .iter()
            .fold(None, |worst: Option<(NaiveDate, &DailyPnl)>, (d, day)| match worst {
                Some((_, w)) if w.pnl <= day.pnl => worst,
                _ => Some((*d, day)),
            })
    }
}
