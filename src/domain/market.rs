//! Stock registry and the GBCE All Share Index.

use indexmap::IndexMap;

use super::error::MarketError;
use super::metric::{Metric, Undefined};
use super::stock::{CommonStock, PreferredStock, Stock, StockKind, Window};
use super::trade::{Side, Trade};

const INDEX_SUBJECT: &str = "GBCE";

/// Parameters needed to create a stock of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockSpec {
    pub kind: StockKind,
    pub par_value: f64,
    pub last_dividend: f64,
    /// Percentage, only meaningful for preferred stock.
    pub fixed_dividend_percent: Option<f64>,
}

impl StockSpec {
    pub fn common(par_value: f64, last_dividend: f64) -> Self {
        StockSpec {
            kind: StockKind::Common,
            par_value,
            last_dividend,
            fixed_dividend_percent: None,
        }
    }

    pub fn preferred(par_value: f64, last_dividend: f64, fixed_dividend_percent: f64) -> Self {
        StockSpec {
            kind: StockKind::Preferred,
            par_value,
            last_dividend,
            fixed_dividend_percent: Some(fixed_dividend_percent),
        }
    }

    fn build(&self, symbol: &str) -> Result<Box<dyn Stock>, MarketError> {
        match self.kind {
            StockKind::Common => Ok(Box::new(CommonStock::new(
                symbol,
                self.par_value,
                self.last_dividend,
            ))),
            StockKind::Preferred => {
                let fixed = self.fixed_dividend_percent.ok_or_else(|| {
                    MarketError::MissingFixedDividend {
                        symbol: symbol.to_string(),
                    }
                })?;
                Ok(Box::new(PreferredStock::new(
                    symbol,
                    self.par_value,
                    self.last_dividend,
                    fixed,
                )))
            }
        }
    }
}

/// Stocks keyed by symbol, listed in registration order.
#[derive(Debug, Default)]
pub struct Market {
    stocks: IndexMap<String, Box<dyn Stock>>,
}

impl Market {
    pub fn new() -> Self {
        Market {
            stocks: IndexMap::new(),
        }
    }

    /// Creates the stock described by `spec` under `symbol`. An existing stock
    /// with the same symbol is replaced, trade history included, and keeps its
    /// listing position.
    pub fn register_stock(&mut self, symbol: &str, spec: StockSpec) -> Result<(), MarketError> {
        let stock = spec.build(symbol)?;
        if self.stocks.insert(symbol.to_string(), stock).is_some() {
            tracing::info!(symbol, kind = %spec.kind, "stock replaced");
        } else {
            tracing::debug!(symbol, kind = %spec.kind, "stock registered");
        }
        Ok(())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.stocks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.stocks.contains_key(symbol)
    }

    pub fn stock(&self, symbol: &str) -> Result<&dyn Stock, MarketError> {
        match self.stocks.get(symbol) {
            Some(stock) => Ok(stock.as_ref()),
            None => Err(unknown(symbol)),
        }
    }

    pub fn stock_mut(&mut self, symbol: &str) -> Result<&mut dyn Stock, MarketError> {
        match self.stocks.get_mut(symbol) {
            Some(stock) => Ok(stock.as_mut()),
            None => Err(unknown(symbol)),
        }
    }

    pub fn add_trade(
        &mut self,
        symbol: &str,
        quantity: u64,
        price: f64,
        side: Side,
    ) -> Result<(), MarketError> {
        self.stock_mut(symbol)?.add_trade(quantity, price, side);
        Ok(())
    }

    /// Records a trade that already carries its own timestamp, routed by the
    /// trade's symbol.
    pub fn record_trade(&mut self, trade: &Trade) -> Result<(), MarketError> {
        self.stock_mut(trade.symbol())?.add_trade_at(
            trade.quantity(),
            trade.price(),
            trade.side(),
            trade.timestamp(),
        );
        Ok(())
    }

    /// Geometric mean of every stock's all-time VWSP. A single stock without
    /// trades contributes a factor of 0 and collapses the index to 0.
    pub fn gbce_all_share_index(&self) -> Metric {
        if self.stocks.is_empty() {
            return Metric::undefined(INDEX_SUBJECT, Undefined::NoStocks);
        }
        let product: f64 = self
            .stocks
            .values()
            .map(|s| s.vwsp(Window::AllTime).value())
            .product();
        Metric::defined(product.powf(1.0 / self.stocks.len() as f64))
    }
}

fn unknown(symbol: &str) -> MarketError {
    MarketError::UnknownSymbol {
        symbol: symbol.to_string(),
    }
}
