#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;
use stockmarket::domain::market::{Market, StockSpec};
use stockmarket::domain::trade::{Side, Trade};

/// The sample GBCE listing.
pub const GBCE_INI: &str = r#"
[market]
symbols = TEA,POP,ALE,GIN,JOE
vwsp_window_secs = 300

[TEA]
type = common
last_dividend = 0
par_value = 100

[POP]
type = common
last_dividend = 8
par_value = 100

[ALE]
type = common
last_dividend = 23
par_value = 60

[GIN]
type = preferred
last_dividend = 8
fixed_dividend = 2
par_value = 100

[JOE]
type = common
last_dividend = 13
par_value = 250
"#;

pub fn gbce_market() -> Market {
    let mut market = Market::new();
    market.register_stock("TEA", StockSpec::common(100.0, 0.0)).unwrap();
    market.register_stock("POP", StockSpec::common(100.0, 8.0)).unwrap();
    market.register_stock("ALE", StockSpec::common(60.0, 23.0)).unwrap();
    market
        .register_stock("GIN", StockSpec::preferred(100.0, 8.0, 2.0))
        .unwrap();
    market.register_stock("JOE", StockSpec::common(250.0, 13.0)).unwrap();
    market
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
}

pub fn seconds_before(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    now - Duration::seconds(seconds)
}

pub fn make_trade(symbol: &str, at: DateTime<Utc>, quantity: u64, price: f64) -> Trade {
    Trade::new(symbol, at, quantity, price, Side::Buy)
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
