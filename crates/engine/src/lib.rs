pub mod binance;
pub mod executor;
pub mod scheduler;

use std::sync::Arc;

use common::{OperatingMode, OrderExecutor, OrderSubmitter};
use paper::PaperExecutor;

pub use binance::BinanceFuturesClient;
pub use executor::LiveExecutor;
pub use scheduler::{Action, CycleReport, PollingScheduler, SchedulerState};

/// Pick the executor for the process lifetime. In simulate mode the
/// submitter is never called.
pub fn executor_for(mode: OperatingMode, submitter: Arc<dyn OrderSubmitter>) -> Arc<dyn OrderExecutor> {
    match mode {
        OperatingMode::Live => Arc::new(LiveExecutor::new(submitter)),
        OperatingMode::Simulate => Arc::new(PaperExecutor::new()),
    }
}
