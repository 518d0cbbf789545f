pub mod config;
pub mod console;
pub mod error;
pub mod ports;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use ports::{MarketDataSource, Notifier, OrderExecutor, OrderSubmitter};
pub use types::*;
