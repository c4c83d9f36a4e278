//! Test fixtures

use crate::types::Trade;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn trade(id: &str, pnl: Decimal, rules_followed: bool, emotion: Option<&str>) -> Trade {
    Trade {
        id: id.to_string(),
        pnl,
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        symbol: "ES".to_string(),
        rules_followed,
        emotion: emotion.map(String::from),
    }
}

/// Compliant trade on `date` (`YYYY-MM-DD`)
pub fn trade_on(id: &str, date: &str, pnl: Decimal) -> Trade {
    Trade {
        date: date.parse().unwrap(),
        ..trade(id, pnl, true, None)
    }
}
