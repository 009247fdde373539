//! Core domain types and logic.

pub mod trade;
pub mod metric;
pub mod stock;
pub mod market;
pub mod market_config;
pub mod error;
