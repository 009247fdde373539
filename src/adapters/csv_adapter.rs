//! CSV trade file adapter.
//!
//! Expected header: `symbol,timestamp,quantity,price,side`, with timestamps in
//! RFC 3339 (`2024-06-03T11:58:00Z`) and side one of `buy`/`sell`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::MarketError;
use crate::domain::trade::{Side, Trade};
use crate::ports::trade_port::TradePort;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct TradeRow {
    symbol: String,
    timestamp: String,
    quantity: u64,
    price: f64,
    side: String,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TradePort for CsvTradeAdapter {
    fn load_trades(&self) -> Result<Vec<Trade>, MarketError> {
        let content = fs::read_to_string(&self.path)?;
        let trades = parse_trades(&content, &self.path.display().to_string())?;
        tracing::info!(path = %self.path.display(), count = trades.len(), "trades loaded");
        Ok(trades)
    }
}

/// Parses CSV trade records; `source_name` only labels errors.
pub fn parse_trades(content: &str, source_name: &str) -> Result<Vec<Trade>, MarketError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut trades = Vec::new();

    let headers = rdr
        .headers()
        .map_err(|e| parse_error(source_name, 1, &e.to_string()))?
        .clone();

    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            parse_error(source_name, line, &e.to_string())
        })?;
        // Line the record starts on, counting skipped blank lines and
        // quoted fields that span lines.
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: TradeRow = record
            .deserialize(Some(&headers))
            .map_err(|e| parse_error(source_name, line, &e.to_string()))?;

        let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| {
                parse_error(
                    source_name,
                    line,
                    &format!("invalid timestamp `{}`: {}", row.timestamp, e),
                )
            })?
            .with_timezone(&Utc);
        let side: Side = row
            .side
            .parse()
            .map_err(|reason: String| parse_error(source_name, line, &reason))?;

        trades.push(Trade::new(
            row.symbol.to_uppercase(),
            timestamp,
            row.quantity,
            row.price,
            side,
        ));
    }

    Ok(trades)
}

fn parse_error(source_name: &str, line: u64, reason: &str) -> MarketError {
    MarketError::TradeParse {
        source_name: source_name.to_string(),
        line,
        reason: reason.to_string(),
    }
}
