//! Trading Journal
//!
//! Terminal dashboard and HTTP API over a hosted trade journal.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;
use trade_journal::{
    client::RestBackend,
    config::Config,
    dashboard::{self, render::render_trade_line, render_text, Dashboard},
    journal::Journal,
    types::{NewTrade, TradeQuery},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "trade-journal")]
#[command(about = "Trading journal dashboard: P&L, win rate, rule compliance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard
    Summary,
    /// List the most recent trades
    Recent {
        /// Number of trades to show (defaults to dashboard.recent_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Log a trade
    Log {
        #[arg(long)]
        symbol: String,
        /// Net P&L, negative for a loss
        #[arg(long, allow_hyphen_values = true)]
        pnl: Decimal,
        /// Trade date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// The trade followed your rules
        #[arg(long)]
        rules_followed: bool,
        #[arg(long)]
        emotion: Option<String>,
    },
    /// Delete a trade by id
    Delete { id: String },
    /// End the current session
    Logout,
    /// Serve the dashboard API
    Serve {
        /// Port (defaults to dashboard.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    let backend = Arc::new(RestBackend::new(&config.backend)?);
    let journal = Arc::new(Journal::new(backend, config.cache.ttl()));
    let dashboard = Arc::new(Dashboard::new(journal, config.dashboard.clone()));

    match cli.command {
        Commands::Summary => show_summary(&dashboard).await,
        Commands::Recent { limit } => {
            let limit = limit.unwrap_or(config.dashboard.recent_limit);
            show_recent(&dashboard, limit).await
        }
        Commands::Log {
            symbol,
            pnl,
            date,
            rules_followed,
            emotion,
        } => {
            let trade = NewTrade {
                symbol,
                pnl,
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                rules_followed,
                emotion,
            };
            log_trade(&dashboard, trade).await
        }
        Commands::Delete { id } => {
            dashboard.journal().delete_trade(&id).await?;
            println!("Deleted trade {}", id);
            Ok(())
        }
        Commands::Logout => logout(&dashboard).await,
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.dashboard.port);
            dashboard::start_dashboard(dashboard, port).await?;
            Ok(())
        }
    }
}

async fn show_summary(dashboard: &Dashboard) -> anyhow::Result<()> {
    let view = dashboard.load().await?;
    print!("{}", render_text(&view));
    Ok(())
}

async fn show_recent(dashboard: &Dashboard, limit: usize) -> anyhow::Result<()> {
    let trades = dashboard.journal().trades(&TradeQuery::recent(limit)).await?;

    if trades.is_empty() {
        println!("No trades yet.");
    }
    for trade in trades.iter() {
        println!("{}", render_trade_line(trade));
    }
    Ok(())
}

async fn log_trade(dashboard: &Dashboard, trade: NewTrade) -> anyhow::Result<()> {
    let stored = dashboard.journal().log_trade(&trade).await?;
    println!("Logged {}", render_trade_line(&stored).trim_start());
    println!("id: {}", stored.id);
    Ok(())
}

async fn logout(dashboard: &Dashboard) -> anyhow::Result<()> {
    let notification = dashboard.sign_out().await;
    println!("{}", notification.message);

    if !notification.is_success() {
        anyhow::bail!("sign-out failed");
    }
    Ok(())
}
