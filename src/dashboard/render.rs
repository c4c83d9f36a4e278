//! Plain-text rendering of the dashboard

use super::DashboardView;
use crate::metrics::PnlCalendar;
use crate::types::Trade;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::fmt::Write;

const CELL_WIDTH: usize = 10;

pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str("=== Trading Journal ===\n\n");
    for tile in &view.tiles {
        let _ = writeln!(out, "{:<16} {:>12}  {}", tile.title, tile.value, tile.caption);
    }

    out.push('\n');
    match view.calendar.latest_month() {
        Some((year, month)) => out.push_str(&render_month(&view.calendar, year, month)),
        None => out.push_str("No trades yet.\n"),
    }

    out.push_str("\nRecent trades\n");
    if view.recent.is_empty() {
        out.push_str("  (none)\n");
    }
    for trade in &view.recent {
        out.push_str(&render_trade_line(trade));
        out.push('\n');
    }

    out
}

/// Month grid, Monday first, with the day's P&L in each traded cell
pub fn render_month(calendar: &PnlCalendar, year: i32, month: u32) -> String {
    let days = calendar.month_days(year, month);
    let Some((first, _)) = days.first() else {
        return String::new();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (month P&L {})",
        first.format("%B %Y"),
        signed(calendar.month_total(year, month))
    );
    for name in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
        let _ = write!(out, "{:<width$}", name, width = CELL_WIDTH);
    }
    out.push('\n');

    let offset = first.weekday().num_days_from_monday() as usize;
    out.push_str(&" ".repeat(offset * CELL_WIDTH));

    for (date, day) in &days {
        let cell = match day {
            Some(d) => format!("{:>2} {}", date.day(), signed(d.pnl)),
            None => format!("{:>2}", date.day()),
        };
        let _ = write!(out, "{:<width$}", cell, width = CELL_WIDTH);

        if is_sunday(*date) {
            out.truncate(out.trim_end_matches(' ').len());
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.truncate(out.trim_end_matches(' ').len());
        out.push('\n');
    }

    out
}

pub fn render_trade_line(trade: &Trade) -> String {
    format!(
        "  {}  {:<8} {:>10}  {}{}",
        trade.date,
        trade.symbol,
        signed(trade.pnl),
        if trade.rules_followed { "rules ok" } else { "rules broken" },
        trade
            .emotion_tag()
            .map(|e| format!("  [{}]", e))
            .unwrap_or_default()
    )
}

fn is_sunday(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() == 6
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{:.2}", value)
    } else {
        format!("{:.2}", value)
    }
}
