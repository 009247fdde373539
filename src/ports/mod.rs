//! Port traits at the edges of the domain.

pub mod config_port;
pub mod trade_port;
