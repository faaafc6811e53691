pub mod channel;
pub mod config;
mod logging;
pub mod protocol;
pub mod runner;
pub mod sexp;
pub mod summary;
mod telemetry;

pub use logging::{init_logging, log_debug, log_debug_content, log_file_path};
pub use telemetry::init_tracing;
