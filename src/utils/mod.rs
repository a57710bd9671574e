//! Configuration and logging.

/// tracing-subscriber initialization.
pub mod logging;
/// TOML configuration (`rugs.toml`).
#[allow(missing_docs)]
pub mod toml_config;
