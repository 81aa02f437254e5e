//! oadigest Core - Common infrastructure for the scholarly-metadata client
//!
//! This crate provides the pieces that are not specific to any one API:
//! the error family, a blocking JSON-over-HTTP transport with retry,
//! flat record values, export sinks, logging and progress reporting.

pub mod error;
pub mod flat;
pub mod http;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod shutdown;
pub mod sink;

// Re-exports for convenience
pub use error::ClientError;
pub use flat::{FlatRecord, FlatValue};
pub use http::{HttpClient, HttpConfig, SHARED_RUNTIME};
pub use logging::{IndicatifLogger, Verbosity, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use shutdown::{install_signal_handlers, is_shutdown_requested, shutdown_flag};
pub use sink::{JsonLinesSink, ParquetSink, RECORD_BATCH_SIZE};
