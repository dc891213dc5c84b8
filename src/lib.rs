//! RPC Latency Sweeper
//!
//! Measures round-trip latency of JSON-RPC `eth_call` requests against
//! multiple blockchain node endpoints (HTTP and WebSocket) under varying
//! call rates, then summarizes the samples and writes CSV and HTML chart
//! reports.

pub mod addresses;
pub mod config;
pub mod driver;
pub mod error;
pub mod provider;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use addresses::AddressPool;
pub use config::Config;
pub use driver::{run_sweep, CallTemplate, RunResult};
pub use error::{AppError, Result};
pub use provider::{Provider, RpcTransport, TransportKind};
pub use report::{ChartWriter, CsvWriter, ResultsTable, SweepKey};
pub use stats::Summary;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_CALL_RATES: &[u32] = &[1, 2, 16, 24, 32, 160];
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);
    pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(1500);
    pub const DEFAULT_ADDRESS_POOL_SIZE: usize = 100_000;
    pub const DEFAULT_OUTPUT_DIR: &str = "output";
    /// Contract invoked by the measured `eth_call`.
    pub const DEFAULT_CALL_TARGET: &str = "0x044BCd8063216E27059fB9299271D5F3b48DA99C";
    /// 4-byte function selector prepended to the call data.
    pub const DEFAULT_CALL_SELECTOR: &str = "a89a8884";
}
