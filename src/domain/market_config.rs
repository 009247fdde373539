//! Market configuration: validation and construction.
//!
//! ```ini
//! [market]
//! symbols = TEA,POP,ALE,GIN,JOE
//! vwsp_window_secs = 300
//!
//! [GIN]
//! type = preferred
//! last_dividend = 8
//! fixed_dividend = 2
//! par_value = 100
//! ```

use std::collections::HashSet;

use crate::domain::error::MarketError;
use crate::domain::market::{Market, StockSpec};
use crate::domain::stock::{StockKind, Window, DEFAULT_VWSP_WINDOW_SECS};
use crate::ports::config_port::ConfigPort;

pub const MARKET_SECTION: &str = "market";

/// A market built from configuration together with the window the driver
/// uses for windowed VWSP.
#[derive(Debug)]
pub struct MarketSetup {
    pub market: Market,
    pub vwsp_window: Window,
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, MarketError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(invalid(MARKET_SECTION, "symbols", "empty token in symbol list"));
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(invalid(
                MARKET_SECTION,
                "symbols",
                &format!("duplicate symbol: {}", symbol),
            ));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Checks the whole configuration and returns the listed symbols.
pub fn validate_market_config(config: &dyn ConfigPort) -> Result<Vec<String>, MarketError> {
    let symbols = configured_symbols(config)?;
    for symbol in &symbols {
        read_stock_spec(config, symbol)?;
    }
    Ok(symbols)
}

pub fn read_stock_spec(config: &dyn ConfigPort, symbol: &str) -> Result<StockSpec, MarketError> {
    let kind_str = config
        .get_string(symbol, "type")
        .ok_or_else(|| missing(symbol, "type"))?;
    let kind: StockKind = kind_str
        .parse()
        .map_err(|reason: String| invalid(symbol, "type", &reason))?;

    let par_value = non_negative(config, symbol, "par_value")?;
    let last_dividend = number(config, symbol, "last_dividend")?;

    match kind {
        StockKind::Common => Ok(StockSpec::common(par_value, last_dividend)),
        StockKind::Preferred => {
            let fixed = non_negative(config, symbol, "fixed_dividend")?;
            Ok(StockSpec::preferred(par_value, last_dividend, fixed))
        }
    }
}

pub fn build_market(config: &dyn ConfigPort) -> Result<MarketSetup, MarketError> {
    let symbols = configured_symbols(config)?;
    let mut market = Market::new();
    for symbol in &symbols {
        let spec = read_stock_spec(config, symbol)?;
        market.register_stock(symbol, spec)?;
    }

    let window_secs =
        config.get_int(MARKET_SECTION, "vwsp_window_secs", DEFAULT_VWSP_WINDOW_SECS);
    tracing::info!(stocks = market.len(), window_secs, "market built from config");

    Ok(MarketSetup {
        market,
        vwsp_window: Window::from_secs(window_secs),
    })
}

fn configured_symbols(config: &dyn ConfigPort) -> Result<Vec<String>, MarketError> {
    let raw = config
        .get_string(MARKET_SECTION, "symbols")
        .ok_or_else(|| missing(MARKET_SECTION, "symbols"))?;
    parse_symbols(&raw)
}

/// Any finite number; the sign is not checked.
fn number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, MarketError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| missing(section, key))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, &format!("`{}` is not a number", raw.trim())))?;
    if !value.is_finite() {
        return Err(invalid(section, key, &format!("{} must be finite", key)));
    }
    Ok(value)
}

fn non_negative(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, MarketError> {
    let value = number(config, section, key)?;
    if value < 0.0 {
        return Err(invalid(section, key, &format!("{} must be non-negative", key)));
    }
    Ok(value)
}

fn missing(section: &str, key: &str) -> MarketError {
    MarketError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> MarketError {
    MarketError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
