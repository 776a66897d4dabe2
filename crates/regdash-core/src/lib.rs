pub mod aggregate;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod model;
pub mod seed;
pub mod timestamp;
pub mod trend;
pub mod window;

pub mod report;
pub mod storage;

pub use aggregate::{Aggregator, FailureBucket, WindowSummary};
pub use config::DashConfig;
pub use errors::{RegDashError, Result};
pub use ingest::{IngestHandler, IngestReport, RunRecord};
pub use model::{Run, RunStatus, RunView};
pub use storage::{RunFilter, RunRepository, Store};
pub use trend::{TrendBuilder, TrendPoint};
pub use window::{Window, WindowChoice, WindowResolver};
