//! Journal dashboard
//!
//! Composes metrics, the P&L calendar and the recent-trades list into one
//! view, and owns the sign-out action.

pub mod notification;
pub mod render;
pub mod server;

pub use notification::{Notification, NotificationLevel};
pub use render::render_text;
pub use server::{create_router, start_dashboard};

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::journal::Journal;
use crate::metrics::{compute_metrics, Highlight, PnlCalendar, TradeMetrics};
use crate::types::{Trade, TradeQuery};
use serde::Serialize;
use std::sync::Arc;

/// Everything the dashboard shows, computed from one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub metrics: TradeMetrics,
    pub tiles: Vec<SummaryTile>,
    pub calendar: PnlCalendar,
    /// Newest first
    pub recent: Vec<Trade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTile {
    pub title: String,
    pub value: String,
    pub caption: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Profit,
    Loss,
    Neutral,
}

pub struct Dashboard {
    journal: Arc<Journal>,
    settings: DashboardConfig,
}

impl Dashboard {
    pub fn new(journal: Arc<Journal>, settings: DashboardConfig) -> Self {
        Self { journal, settings }
    }

    pub fn journal(&self) -> &Arc<Journal> {
        &self.journal
    }

    pub fn settings(&self) -> &DashboardConfig {
        &self.settings
    }

    /// Fetch (or reuse) the snapshots and build the view
    pub async fn load(&self) -> Result<DashboardView> {
        let snapshot = self.journal.trades(&TradeQuery::all()).await?;
        let metrics = compute_metrics(&snapshot, self.settings.highlight);
        let calendar = PnlCalendar::from_trades(&snapshot);

        let recent = self
            .journal
            .trades(&TradeQuery::recent(self.settings.recent_limit))
            .await?;

        Ok(DashboardView {
            tiles: summary_tiles(&metrics),
            metrics,
            calendar,
            recent: recent.as_ref().clone(),
        })
    }

    /// Terminate the session; the outcome is reported as a notification
    pub async fn sign_out(&self) -> Notification {
        match self.journal.sign_out().await {
            Ok(()) => {
                tracing::info!("Session closed");
                Notification::success("Session closed")
            }
            Err(e) => {
                tracing::warn!("Sign-out failed: {}", e);
                Notification::error("Failed to sign out")
            }
        }
    }
}

/// The four summary tiles, in display order
pub fn summary_tiles(metrics: &TradeMetrics) -> Vec<SummaryTile> {
    let pnl_tone = if metrics.is_profitable() {
        Tone::Profit
    } else {
        Tone::Loss
    };

    let highlight = match &metrics.highlight {
        Highlight::TradeScore(score) => SummaryTile {
            title: "Trade Score".to_string(),
            value: score.to_string(),
            caption: "Overall score".to_string(),
            tone: Tone::Neutral,
        },
        Highlight::MostFrequentEmotion(emotion) => SummaryTile {
            title: "Top Emotion".to_string(),
            value: emotion.clone().unwrap_or_else(|| "none".to_string()),
            caption: "Most frequent emotion".to_string(),
            tone: Tone::Neutral,
        },
    };

    vec![
        SummaryTile {
            title: "Total P&L".to_string(),
            value: format!("${:.2}", metrics.pnl_total),
            caption: format!("{} trades", metrics.total_trades),
            tone: pnl_tone,
        },
        SummaryTile {
            title: "Win Rate".to_string(),
            value: format!("{:.1}%", metrics.win_rate),
            caption: "Overall win rate".to_string(),
            tone: Tone::Neutral,
        },
        SummaryTile {
            title: "Rule Compliance".to_string(),
            value: format!("{:.1}%", metrics.rule_compliance_rate),
            caption: "Trading discipline".to_string(),
            tone: Tone::Neutral,
        },
        highlight,
    ]
}
