//! Trade history source port trait.

use crate::domain::error::MarketError;
use crate::domain::trade::Trade;

pub trait TradePort {
    /// Trades in the order they should be recorded.
    fn load_trades(&self) -> Result<Vec<Trade>, MarketError>;
}
