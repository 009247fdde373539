//! Metric outcomes.
//!
//! A metric that cannot be computed is not an error: the caller gets a neutral
//! value of 0.0 tagged with the reason, and a warning is emitted through
//! `tracing`.

use std::fmt;

/// Why a metric has no meaningful value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undefined {
    ZeroDividend,
    ZeroPrice,
    NoTrades,
    NoTradesInWindow { seconds: i64 },
    ZeroVolume,
    NoStocks,
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Undefined::ZeroDividend => write!(f, "P/E ratio cannot be calculated as dividend is 0"),
            Undefined::ZeroPrice => write!(f, "dividend yield cannot be calculated as price is 0"),
            Undefined::NoTrades => write!(
                f,
                "volume weighted stock price cannot be calculated as there are no trades yet"
            ),
            Undefined::NoTradesInWindow { seconds } => write!(
                f,
                "volume weighted stock price cannot be calculated as there are no trades in last {seconds}s"
            ),
            Undefined::ZeroVolume => write!(
                f,
                "volume weighted stock price cannot be calculated as traded volume is 0"
            ),
            Undefined::NoStocks => write!(
                f,
                "GBCE All Share Index cannot be calculated as there are no stocks yet"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    value: f64,
    undefined: Option<Undefined>,
}

impl Metric {
    pub fn defined(value: f64) -> Self {
        Metric {
            value,
            undefined: None,
        }
    }

    /// 0.0 tagged with `reason`. `subject` names what was being measured
    /// (a stock symbol, or the index).
    pub fn undefined(subject: &str, reason: Undefined) -> Self {
        tracing::warn!(subject, %reason, "metric undefined");
        Metric {
            value: 0.0,
            undefined: Some(reason),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn reason(&self) -> Option<Undefined> {
        self.undefined
    }

    pub fn is_defined(&self) -> bool {
        self.undefined.is_none()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.undefined {
            None => write!(f, "{:.4}", self.value),
            Some(reason) => write!(f, "{:.4} ({reason})", self.value),
        }
    }
}
