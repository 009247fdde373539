//! Executed trade records.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "b" => Ok(Side::Buy),
            "sell" | "s" => Ok(Side::Sell),
            _ => Err(format!("unknown side: `{}`", s.trim())),
        }
    }
}

/// One executed trade. Immutable once created; owned by the stock that
/// recorded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    symbol: String,
    timestamp: DateTime<Utc>,
    quantity: u64,
    price: f64,
    side: Side,
}

impl Trade {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        quantity: u64,
        price: f64,
        side: Side,
    ) -> Self {
        Trade {
            symbol: symbol.into(),
            timestamp,
            quantity,
            price,
            side,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// price * quantity
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}
