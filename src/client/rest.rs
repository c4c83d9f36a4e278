//! REST backend client
//!
//! Talks to a PostgREST data API (`/rest/v1/<table>`) and a GoTrue-style
//! auth API (`/auth/v1/logout`), the layout used by hosted Postgres
//! backends such as Supabase.

use crate::client::JournalBackend;
use crate::config::BackendConfig;
use crate::error::{JournalError, Result};
use crate::types::{NewTrade, Trade, TradeQuery};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const DATE_COLUMN: &str = "fecha";

/// Rows requested per page. Hosted PostgREST caps responses at `max-rows`
/// (1000 by default on Supabase), so larger reads are paged with `offset`.
const PAGE_SIZE: usize = 1000;

/// Backend client over HTTP
pub struct RestBackend {
    http: Client,
    base_url: String,
    api_key: String,
    table: String,
    /// Access token of the signed-in user, cleared on sign-out
    session: RwLock<Option<String>>,
}

/// Row shape of the `trades` table
#[derive(Debug, Deserialize)]
struct TradeRow {
    id: Value,
    #[serde(rename = "pnl_neto", default)]
    pnl: Option<Value>,
    #[serde(rename = "fecha")]
    date: String,
    #[serde(rename = "simbolo", default)]
    symbol: Option<String>,
    #[serde(rename = "reglas_cumplidas", default)]
    rules_followed: Option<bool>,
    #[serde(rename = "emocion", default)]
    emotion: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewTradeRow<'a> {
    id: String,
    pnl_neto: Decimal,
    fecha: NaiveDate,
    simbolo: &'a str,
    reglas_cumplidas: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    emocion: Option<&'a str>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
            session: RwLock::new(config.access_token.clone()),
        })
    }

    pub fn has_session(&self) -> bool {
        self.session.read().is_some()
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Attach the API key and the best available bearer token
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .session
            .read()
            .clone()
            .unwrap_or_else(|| self.api_key.clone());

        request
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }
}

#[async_trait]
impl JournalBackend for RestBackend {
    /// Fetch every row matching `query`, paging through the server's
    /// per-response row cap until a short page or `query.limit` ends the read.
    ///
    /// A server configured with `max-rows` below [`PAGE_SIZE`] answers every
    /// page short, so only the first page would be read.
    async fn fetch_trades(&self, query: &TradeQuery) -> Result<Vec<Trade>> {
        let params = query_params(query);
        debug!("Fetching trades from {} with {:?}", self.table, params);

        let mut trades = Vec::new();
        loop {
            let wanted = match query.limit {
                Some(limit) => limit.saturating_sub(trades.len()).min(PAGE_SIZE),
                None => PAGE_SIZE,
            };
            if wanted == 0 {
                break;
            }

            let resp = self
                .authorize(self.http.get(self.table_url()))
                .query(&params)
                .query(&page_params(trades.len(), wanted))
                .send()
                .await?;
            let rows: Vec<TradeRow> = check_status(resp).await?.json().await?;

            let received = rows.len();
            for row in rows {
                trades.push(parse_row(row)?);
            }
            if received < wanted {
                break;
            }
        }

        Ok(trades)
    }

    async fn insert_trade(&self, trade: &NewTrade) -> Result<Trade> {
        let row = NewTradeRow {
            id: uuid::Uuid::new_v4().to_string(),
            pnl_neto: trade.pnl,
            fecha: trade.date,
            simbolo: &trade.symbol,
            reglas_cumplidas: trade.rules_followed,
            emocion: trade.emotion.as_deref(),
        };

        let resp = self
            .authorize(self.http.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;
        let rows: Vec<TradeRow> = check_status(resp).await?.json().await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| JournalError::InvalidRow("insert returned no rows".into()))
            .and_then(parse_row)
    }

    async fn delete_trade(&self, id: &str) -> Result<()> {
        let resp = self
            .authorize(self.http.delete(self.table_url()))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        let rows: Vec<TradeRow> = check_status(resp).await?.json().await?;

        if rows.is_empty() {
            return Err(JournalError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(token) = self.session.read().clone() else {
            debug!("No active session, nothing to revoke");
            return Ok(());
        };

        let url = format!("{}/auth/v1/logout", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        match resp.status() {
            // session already gone on the server side
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!("Session already invalid ({})", resp.status());
            }
            _ => {
                check_status(resp).await?;
            }
        }

        *self.session.write() = None;
        Ok(())
    }
}

/// PostgREST query string for `query`
fn query_params(query: &TradeQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", format!("{}.{}", DATE_COLUMN, query.order.as_str())),
    ];

    if let Some(from) = query.from {
        params.push((DATE_COLUMN, format!("gte.{}", from)));
    }
    if let Some(to) = query.to {
        params.push((DATE_COLUMN, format!("lte.{}", to)));
    }

    params
}

/// `limit`/`offset` pair for one page of a read
fn page_params(offset: usize, size: usize) -> [(&'static str, String); 2] {
    [("limit", size.to_string()), ("offset", offset.to_string())]
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(JournalError::Backend {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Human-readable message from a PostgREST or auth error body
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str))
    });

    match field {
        Some(message) => message.to_string(),
        None if body.trim().is_empty() => "empty response".to_string(),
        None => body.trim().to_string(),
    }
}

fn parse_row(row: TradeRow) -> Result<Trade> {
    let id = match row.id {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => return Err(JournalError::InvalidRow(format!("id: {}", other))),
    };

    Ok(Trade {
        pnl: coerce_pnl(row.pnl.as_ref()).map_err(|e| with_id(e, &id))?,
        date: parse_date(&row.date).map_err(|e| with_id(e, &id))?,
        symbol: row.symbol.unwrap_or_default(),
        rules_followed: row.rules_followed.unwrap_or(false),
        emotion: row.emotion.filter(|e| !e.trim().is_empty()),
        id,
    })
}

fn with_id(err: JournalError, id: &str) -> JournalError {
    match err {
        JournalError::InvalidRow(msg) => JournalError::InvalidRow(format!("{} (trade {})", msg, id)),
        other => other,
    }
}

/// Numeric coercion for the P&L column: numbers and numeric strings parse,
/// `null` and blank strings count as zero.
fn coerce_pnl(value: Option<&Value>) -> Result<Decimal> {
    let text = match value {
        None | Some(Value::Null) => return Ok(Decimal::ZERO),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(Decimal::ZERO),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => return Err(JournalError::InvalidRow(format!("pnl_neto: {}", other))),
    };

    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| JournalError::InvalidRow(format!("pnl_neto: {:?}", text)))
}

/// Calendar date from a date or timestamp column
fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ts.date());
    }

    Err(JournalError::InvalidRow(format!("fecha: {:?}", raw)))
}
