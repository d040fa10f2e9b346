//! Tracing/logging setup shared by every process embedding the order service.
//!
//! Call [`init`] (or [`tracing::init_with`]) once at the top of the binary's `main`,
//! before building the `OrderApplicationService`, so its use-case logs are captured:
//!
//! ```ignore
//! fn main() {
//!     ordering_observability::init();
//!     let config = ordering_infra::ServiceConfig::from_env()?;
//!     // ...
//! }
//! ```

/// Initialize process-wide observability (tracing/logging) from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use tracing::{LogFormat, TracingConfig, TracingConfigError};
