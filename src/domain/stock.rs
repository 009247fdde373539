//! Stocks, their trade ledgers and per-stock metrics.
//!
//! Every stock shares the same ledger and the same P/E and VWSP formulas; the
//! two variants differ only in how dividend yield is computed.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

use super::metric::{Metric, Undefined};
use super::trade::{Side, Trade};

/// Window used by the driver for the windowed VWSP (five minutes).
pub const DEFAULT_VWSP_WINDOW_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    AllTime,
    Last(Duration),
}

impl Window {
    /// Non-positive values mean all time.
    pub fn from_secs(seconds: i64) -> Self {
        if seconds <= 0 {
            return Window::AllTime;
        }
        Duration::try_seconds(seconds)
            .map(Window::Last)
            .unwrap_or(Window::AllTime)
    }

    /// Earliest timestamp still inside the window, `None` when unbounded.
    fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Window::AllTime => None,
            Window::Last(span) => now.checked_sub_signed(*span),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::AllTime => write!(f, "all time"),
            Window::Last(span) => write!(f, "last {}s", span.num_seconds()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockKind {
    Common,
    Preferred,
}

impl fmt::Display for StockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockKind::Common => f.pad("common"),
            StockKind::Preferred => f.pad("preferred"),
        }
    }
}

impl FromStr for StockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(StockKind::Common),
            "preferred" => Ok(StockKind::Preferred),
            _ => Err(format!("unknown stock type: `{}`", s.trim())),
        }
    }
}

/// Identity, static parameters and the append-only trade list of a stock.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    symbol: String,
    par_value: f64,
    last_dividend: f64,
    trades: Vec<Trade>,
}

impl Ledger {
    pub(crate) fn new(symbol: impl Into<String>, par_value: f64, last_dividend: f64) -> Self {
        Ledger {
            symbol: symbol.into(),
            par_value,
            last_dividend,
            trades: Vec::new(),
        }
    }
}

/// Per-stock metrics at one price and one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSummary {
    pub symbol: String,
    pub kind: StockKind,
    pub price: f64,
    pub window: Window,
    pub dividend_yield: Metric,
    pub pe_ratio: Metric,
    pub vwsp: Metric,
    pub vwsp_all_time: Metric,
    pub trade_count: usize,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::CommonStock {}
    impl Sealed for super::PreferredStock {}
}

/// A listed stock. Implemented only by [`CommonStock`] and [`PreferredStock`].
///
/// ```compile_fail
/// use stockmarket::domain::metric::Metric;
/// use stockmarket::domain::stock::{Ledger, Stock, StockKind};
///
/// #[derive(Debug)]
/// struct Bond(Ledger);
///
/// impl Stock for Bond {
///     fn ledger(&self) -> &Ledger { &self.0 }
///     fn ledger_mut(&mut self) -> &mut Ledger { &mut self.0 }
///     fn kind(&self) -> StockKind { StockKind::Common }
///     fn dividend_yield(&self, _price: f64) -> Metric { Metric::defined(0.0) }
/// }
/// ```
pub trait Stock: sealed::Sealed + fmt::Debug {
    fn ledger(&self) -> &Ledger;

    fn ledger_mut(&mut self) -> &mut Ledger;

    fn kind(&self) -> StockKind;

    fn dividend_yield(&self, price: f64) -> Metric;

    fn symbol(&self) -> &str {
        &self.ledger().symbol
    }

    fn par_value(&self) -> f64 {
        self.ledger().par_value
    }

    fn last_dividend(&self) -> f64 {
        self.ledger().last_dividend
    }

    /// Trades in insertion order.
    fn trades(&self) -> &[Trade] {
        &self.ledger().trades
    }

    /// price / last dividend
    fn pe_ratio(&self, price: f64) -> Metric {
        let last_dividend = self.last_dividend();
        if last_dividend == 0.0 {
            return Metric::undefined(self.symbol(), Undefined::ZeroDividend);
        }
        Metric::defined(price / last_dividend)
    }

    fn vwsp(&self, window: Window) -> Metric {
        self.vwsp_at(window, Utc::now())
    }

    /// Volume-weighted price of the trades inside `window` as seen at `now`.
    ///
    /// Trades are scanned newest first and the scan stops at the first trade
    /// older than the window, so the result assumes trades were recorded in
    /// non-decreasing timestamp order.
    fn vwsp_at(&self, window: Window, now: DateTime<Utc>) -> Metric {
        let trades = self.trades();
        if trades.is_empty() {
            return Metric::undefined(self.symbol(), Undefined::NoTrades);
        }

        let cutoff = window.cutoff(now);
        let mut notional = 0.0;
        let mut volume = 0.0;
        for trade in trades.iter().rev() {
            if cutoff.is_some_and(|c| trade.timestamp() < c) {
                break;
            }
            notional += trade.notional();
            volume += trade.quantity() as f64;
        }

        if volume == 0.0 {
            let reason = match window {
                Window::AllTime => Undefined::ZeroVolume,
                Window::Last(span) => Undefined::NoTradesInWindow {
                    seconds: span.num_seconds(),
                },
            };
            return Metric::undefined(self.symbol(), reason);
        }
        Metric::defined(notional / volume)
    }

    /// Records a trade stamped with the current wall-clock time.
    fn add_trade(&mut self, quantity: u64, price: f64, side: Side) {
        self.add_trade_at(quantity, price, side, Utc::now());
    }

    fn add_trade_at(&mut self, quantity: u64, price: f64, side: Side, timestamp: DateTime<Utc>) {
        let ledger = self.ledger_mut();
        let trade = Trade::new(ledger.symbol.clone(), timestamp, quantity, price, side);
        tracing::debug!(
            symbol = %ledger.symbol,
            quantity,
            price,
            %side,
            "trade recorded"
        );
        ledger.trades.push(trade);
    }

    fn summary(&self, price: f64, window: Window, now: DateTime<Utc>) -> StockSummary {
        StockSummary {
            symbol: self.symbol().to_string(),
            kind: self.kind(),
            price,
            window,
            dividend_yield: self.dividend_yield(price),
            pe_ratio: self.pe_ratio(price),
            vwsp: self.vwsp_at(window, now),
            vwsp_all_time: self.vwsp_at(Window::AllTime, now),
            trade_count: self.trades().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommonStock {
    ledger: Ledger,
}

impl CommonStock {
    pub fn new(symbol: impl Into<String>, par_value: f64, last_dividend: f64) -> Self {
        CommonStock {
            ledger: Ledger::new(symbol, par_value, last_dividend),
        }
    }
}

impl Stock for CommonStock {
    fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    fn kind(&self) -> StockKind {
        StockKind::Common
    }

    /// last dividend / price
    fn dividend_yield(&self, price: f64) -> Metric {
        if price == 0.0 {
            return Metric::undefined(self.symbol(), Undefined::ZeroPrice);
        }
        Metric::defined(self.last_dividend() / price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreferredStock {
    ledger: Ledger,
    fixed_dividend: f64,
}

impl PreferredStock {
    /// `fixed_dividend_percent` is given as a percentage (2 for 2%) and kept
    /// as a fraction.
    pub fn new(
        symbol: impl Into<String>,
        par_value: f64,
        last_dividend: f64,
        fixed_dividend_percent: f64,
    ) -> Self {
        PreferredStock {
            ledger: Ledger::new(symbol, par_value, last_dividend),
            fixed_dividend: fixed_dividend_percent / 100.0,
        }
    }

    pub fn fixed_dividend(&self) -> f64 {
        self.fixed_dividend
    }
}

impl Stock for PreferredStock {
    fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    fn kind(&self) -> StockKind {
        StockKind::Preferred
    }

    /// (fixed dividend * par value) / price
    fn dividend_yield(&self, price: f64) -> Metric {
        if price == 0.0 {
            return Metric::undefined(self.symbol(), Undefined::ZeroPrice);
        }
        Metric::defined(self.fixed_dividend * self.par_value() / price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
    }

    fn ago(seconds: i64) -> DateTime<Utc> {
        now() - Duration::seconds(seconds)
    }

    fn pop() -> CommonStock {
        CommonStock::new("POP", 100.0, 8.0)
    }

    fn gin() -> PreferredStock {
        PreferredStock::new("GIN", 100.0, 8.0, 2.0)
    }

    #[test]
    fn window_from_secs() {
        assert_eq!(Window::from_secs(-1), Window::AllTime);
        assert_eq!(Window::from_secs(0), Window::AllTime);
        assert_eq!(Window::from_secs(300), Window::Last(Duration::seconds(300)));
        assert_eq!(Window::from_secs(i64::MAX), Window::AllTime);
    }

    #[test]
    fn window_display() {
        assert_eq!(Window::AllTime.to_string(), "all time");
        assert_eq!(Window::from_secs(300).to_string(), "last 300s");
    }

    #[test]
    fn stock_kind_parses() {
        assert_eq!("Common".parse::<StockKind>().unwrap(), StockKind::Common);
        assert_eq!(" preferred".parse::<StockKind>().unwrap(), StockKind::Preferred);
        assert!("ordinary".parse::<StockKind>().is_err());
    }

    #[test]
    fn common_dividend_yield() {
        let stock = pop();
        assert_relative_eq!(stock.dividend_yield(50.0).value(), 8.0 / 50.0);
        assert!(stock.dividend_yield(50.0).is_defined());
    }

    #[test]
    fn common_dividend_yield_zero_price() {
        let m = pop().dividend_yield(0.0);
        assert_eq!(m.value(), 0.0);
        assert_eq!(m.reason(), Some(Undefined::ZeroPrice));
    }

    #[test]
    fn preferred_stores_fixed_dividend_as_fraction() {
        let stock = PreferredStock::new("GIN", 100.0, 8.0, 5.0);
        assert_relative_eq!(stock.fixed_dividend(), 0.05);
        assert_relative_eq!(stock.dividend_yield(25.0).value(), 0.05 * 100.0 / 25.0);
    }

    #[test]
    fn preferred_ignores_last_dividend_for_yield() {
        let stock = gin();
        assert_relative_eq!(stock.dividend_yield(10.0).value(), 0.02 * 100.0 / 10.0);
    }

    #[test]
    fn preferred_dividend_yield_zero_price() {
        let m = gin().dividend_yield(0.0);
        assert_eq!(m.value(), 0.0);
        assert_eq!(m.reason(), Some(Undefined::ZeroPrice));
    }

    #[test]
    fn pe_ratio_divides_by_last_dividend() {
        let m = pop().pe_ratio(40.0);
        assert!(m.is_defined());
        assert_eq!(m.value(), 40.0 / 8.0);
    }

    #[test]
    fn pe_ratio_zero_dividend() {
        let tea = CommonStock::new("TEA", 100.0, 0.0);
        let m = tea.pe_ratio(40.0);
        assert_eq!(m.value(), 0.0);
        assert_eq!(m.reason(), Some(Undefined::ZeroDividend));
    }

    #[test]
    fn vwsp_without_trades() {
        let stock = pop();
        for window in [Window::AllTime, Window::from_secs(300)] {
            let m = stock.vwsp_at(window, now());
            assert_eq!(m.value(), 0.0);
            assert_eq!(m.reason(), Some(Undefined::NoTrades));
        }
    }

    #[test]
    fn vwsp_all_time() {
        let mut stock = pop();
        stock.add_trade_at(100, 10.0, Side::Buy, ago(1000));
        stock.add_trade_at(50, 20.0, Side::Sell, ago(10));
        let m = stock.vwsp_at(Window::AllTime, now());
        assert_relative_eq!(m.value(), (100.0 * 10.0 + 50.0 * 20.0) / 150.0);
    }

    #[test]
    fn vwsp_window_excludes_old_trades() {
        let mut stock = pop();
        stock.add_trade_at(100, 10.0, Side::Buy, ago(100));
        stock.add_trade_at(50, 20.0, Side::Buy, ago(10));
        let m = stock.vwsp_at(Window::from_secs(30), now());
        assert_relative_eq!(m.value(), 20.0);
    }

    #[test]
    fn vwsp_window_includes_trade_at_cutoff() {
        let mut stock = pop();
        stock.add_trade_at(10, 4.0, Side::Buy, ago(30));
        let m = stock.vwsp_at(Window::from_secs(30), now());
        assert_relative_eq!(m.value(), 4.0);
    }

    #[test]
    fn vwsp_window_with_no_recent_trades() {
        let mut stock = pop();
        stock.add_trade_at(100, 10.0, Side::Buy, ago(600));
        let m = stock.vwsp_at(Window::from_secs(300), now());
        assert_eq!(m.value(), 0.0);
        assert_eq!(m.reason(), Some(Undefined::NoTradesInWindow { seconds: 300 }));
    }

    #[test]
    fn vwsp_scan_stops_at_first_old_trade() {
        // Recorded out of order: the recent trade sits behind an old one and
        // is never reached by the newest-first scan.
        let mut stock = pop();
        stock.add_trade_at(10, 50.0, Side::Buy, ago(5));
        stock.add_trade_at(10, 1.0, Side::Buy, ago(500));
        let m = stock.vwsp_at(Window::from_secs(60), now());
        assert_eq!(m.reason(), Some(Undefined::NoTradesInWindow { seconds: 60 }));
    }

    #[test]
    fn vwsp_all_time_zero_volume() {
        let mut stock = pop();
        stock.add_trade_at(0, 10.0, Side::Buy, ago(5));
        let m = stock.vwsp_at(Window::AllTime, now());
        assert_eq!(m.reason(), Some(Undefined::ZeroVolume));
    }

    #[test]
    fn add_trade_stamps_current_time() {
        let mut stock = gin();
        let before = Utc::now();
        stock.add_trade(25, 3.5, Side::Sell);
        let after = Utc::now();

        let trade = &stock.trades()[0];
        assert_eq!(trade.symbol(), "GIN");
        assert_eq!(trade.quantity(), 25);
        assert_eq!(trade.side(), Side::Sell);
        assert!(trade.timestamp() >= before && trade.timestamp() <= after);
        assert_relative_eq!(stock.vwsp(Window::from_secs(300)).value(), 3.5);
    }

    #[test]
    fn trades_keep_insertion_order() {
        let mut stock = pop();
        stock.add_trade_at(1, 1.0, Side::Buy, ago(3));
        stock.add_trade_at(2, 2.0, Side::Sell, ago(2));
        stock.add_trade_at(3, 3.0, Side::Buy, ago(1));
        let quantities: Vec<u64> = stock.trades().iter().map(|t| t.quantity()).collect();
        assert_eq!(quantities, vec![1, 2, 3]);
    }

    #[test]
    fn summary_bundles_metrics() {
        let mut stock = gin();
        stock.add_trade_at(100, 10.0, Side::Buy, ago(1000));
        stock.add_trade_at(100, 20.0, Side::Buy, ago(10));

        let summary = stock.summary(20.0, Window::from_secs(300), now());
        assert_eq!(summary.symbol, "GIN");
        assert_eq!(summary.kind, StockKind::Preferred);
        assert_eq!(summary.trade_count, 2);
        assert_relative_eq!(summary.dividend_yield.value(), 0.1);
        assert_relative_eq!(summary.pe_ratio.value(), 2.5);
        assert_relative_eq!(summary.vwsp.value(), 20.0);
        assert_relative_eq!(summary.vwsp_all_time.value(), 15.0);
    }
}
