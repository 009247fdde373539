//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::MarketError;
use crate::domain::market::Market;
use crate::domain::market_config::{build_market, validate_market_config, MarketSetup};
use crate::domain::metric::Metric;
use crate::domain::stock::{Stock, StockSummary, Window};
use crate::ports::trade_port::TradePort;

#[derive(Parser, Debug)]
#[command(name = "stockmarket", about = "Super simple stock market calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the stocks registered by a market config
    List {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a market config
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Dividend yield, P/E ratio and VWSP for one stock
    Stock {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, allow_negative_numbers = true)]
        price: f64,
        /// Overrides [market] vwsp_window_secs; 0 or less means all time
        #[arg(long, allow_negative_numbers = true)]
        window_secs: Option<i64>,
    },
    /// GBCE All Share Index over every registered stock
    Index {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        trades: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::List { config } => run_list(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Stock {
            config,
            trades,
            symbol,
            price,
            window_secs,
        } => run_stock(&config, trades.as_deref(), &symbol, price, window_secs),
        Command::Index { config, trades } => run_index(&config, trades.as_deref()),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, MarketError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    tracing::debug!(file = %path.display(), "config loaded");
    Ok(adapter)
}

/// Builds the configured market and replays the trade file into it, if any.
pub fn load_market(
    config_path: &Path,
    trades_path: Option<&Path>,
) -> Result<MarketSetup, MarketError> {
    let adapter = load_config(config_path)?;
    let mut setup = build_market(&adapter)?;

    if let Some(path) = trades_path {
        let trades = CsvTradeAdapter::new(path.to_path_buf()).load_trades()?;
        for trade in &trades {
            setup.market.record_trade(trade)?;
        }
    }
    Ok(setup)
}

fn run_list(config_path: &Path) -> Result<String, MarketError> {
    let setup = load_market(config_path, None)?;
    format_listing(&setup.market)
}

fn run_validate(config_path: &Path) -> Result<String, MarketError> {
    let adapter = load_config(config_path)?;
    let symbols = validate_market_config(&adapter)?;
    Ok(format!(
        "{}: OK ({} stocks: {})\n",
        config_path.display(),
        symbols.len(),
        symbols.join(", ")
    ))
}

fn run_stock(
    config_path: &Path,
    trades_path: Option<&Path>,
    symbol: &str,
    price: f64,
    window_secs: Option<i64>,
) -> Result<String, MarketError> {
    let setup = load_market(config_path, trades_path)?;
    let window = window_secs.map_or(setup.vwsp_window, Window::from_secs);
    let stock = setup.market.stock(&symbol.to_uppercase())?;
    Ok(format_summary(&stock.summary(price, window, Utc::now())))
}

fn run_index(config_path: &Path, trades_path: Option<&Path>) -> Result<String, MarketError> {
    let setup = load_market(config_path, trades_path)?;
    Ok(format_index(&setup.market.gbce_all_share_index()))
}

pub fn format_listing(market: &Market) -> Result<String, MarketError> {
    let mut out = String::new();
    for symbol in market.symbols() {
        let stock = market.stock(symbol)?;
        out.push_str(&format!(
            "{:<6} {:<10} par {:>8.2}  last dividend {:>6.2}\n",
            symbol,
            stock.kind(),
            stock.par_value(),
            stock.last_dividend()
        ));
    }
    Ok(out)
}

pub fn format_summary(summary: &StockSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} ({}) at price {:.2} ===\n",
        summary.symbol, summary.kind, summary.price
    ));
    out.push_str(&format!("Dividend Yield:   {}\n", summary.dividend_yield));
    out.push_str(&format!("P/E Ratio:        {}\n", summary.pe_ratio));
    out.push_str(&format!("VWSP ({}): {}\n", summary.window, summary.vwsp));
    out.push_str(&format!("VWSP (all time):  {}\n", summary.vwsp_all_time));
    out.push_str(&format!("Trades:           {}\n", summary.trade_count));
    out
}

pub fn format_index(index: &Metric) -> String {
    format!("GBCE All Share Index: {index}\n")
}
