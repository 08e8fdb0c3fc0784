//! Configuration pipeline
//!
//! ## Data flow
//!
//! ```text
//! config/config.json5 (JSON5)            <coordination.path>/master-config.json5
//!     → loader.rs (read_raw)                 → loader.rs (read_master, optional)
//!                 ↘                         ↙
//!                   merge.rs (deep_merge, local wins)
//!                     → validate (schema, abort_early=false, allow_unknown=true)
//!                       → ValidatedConfig  |  ValidationErrors report
//! ```
//!
//! ## Example configuration
//!
//! ```jsonc
//! {
//!   // only the username is mandatory
//!   account: { username: "Alice123" },
//!   server: { port: 25565 },
//!   proxy: { whitelist: ["Alice123"], ignoredPackets: ["keep_alive"] },
//!   coordination: { active: true, path: "../shared" },
//! }
//! ```

mod loader;
mod merge;
mod validated;

pub use loader::{
    CONFIG_PATH_ENV, ConfigLoader, CoordinationSettings, DEFAULT_CONFIG_PATH, MASTER_CONFIG_FILE,
};
pub use merge::deep_merge;
pub use validated::ValidatedConfig;
