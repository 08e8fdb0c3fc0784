//! queuekeeper core
//!
//! Configuration and coordination layer for a long-running queue proxy:
//! - `schema`: declarative description of the config tree
//! - `validate`: schema validation with defaults and aggregated errors
//! - `config`: load local JSON5, merge the shared master config, validate
//! - `docs`: markdown reference generated from the schema
//! - `status`: process status record, relay flag coordination, dashboard

pub mod config;
pub mod console;
pub mod docs;
pub mod error;
pub mod result;
pub mod schema;
pub mod status;
pub mod validate;

// Re-export commonly used types
pub use config::{ConfigLoader, ValidatedConfig, deep_merge};
pub use error::{ErrorKind, QueueKeeperError};
pub use result::{Result, ResultExt};
pub use schema::{SchemaNode, config_schema};
pub use status::{CoordinationFlag, StatusField, StatusManager, StatusRecord};
pub use validate::{ValidationError, ValidationErrors, ValidationOptions, validate};

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr so they never interleave with the dashboard on stdout.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("queuekeeper=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
