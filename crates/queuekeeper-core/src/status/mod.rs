//! Status reporting and relay coordination
//!
//! Collaborators report state through [`StatusManager::update`], the only
//! mutator of the [`StatusRecord`]. When the `livechatRelay` field changes and
//! coordination is enabled, the shared relay flag is reconciled before
//! `update` returns. Flag I/O failures are logged and swallowed: losing the
//! relay role degrades coordination but never stops the process.

mod coordination;
mod dashboard;
mod record;

pub use coordination::{CoordinationFlag, FLAG_FILE};
pub use dashboard::Dashboard;
pub use record::{StatusField, StatusRecord, UNKNOWN};

use crate::config::{CoordinationSettings, ValidatedConfig};
use crate::console::CLEAR_SCREEN;
use crate::result::{Result, ResultExt};
use std::io::Write;
use std::path::PathBuf;

/// Owner of the process status and this instance's side of relay coordination
#[derive(Debug)]
pub struct StatusManager {
    identity: String,
    record: StatusRecord,
    flag: Option<CoordinationFlag>,
    dashboard: Dashboard,
}

impl StatusManager {
    pub fn new(config: &ValidatedConfig) -> Result<Self> {
        let coordination = CoordinationSettings {
            active: config.bool_at("coordination.active").unwrap_or(false),
            path: PathBuf::from(config.str_at("coordination.path").unwrap_or("./coordination")),
        };
        let flag = coordination
            .active
            .then(|| CoordinationFlag::new(&coordination.path));

        Ok(Self {
            identity: config.identity().to_string(),
            record: StatusRecord::new(),
            flag,
            dashboard: Dashboard::from_config(config)?,
        })
    }

    pub fn with_dashboard(mut self, dashboard: Dashboard) -> Self {
        self.dashboard = dashboard;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn record(&self) -> &StatusRecord {
        &self.record
    }

    pub fn get(&self, field: StatusField) -> &str {
        self.record.get(field)
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn coordination_enabled(&self) -> bool {
        self.flag.is_some()
    }

    /// Store the string form of `value`; returns whether the stored value changed
    pub fn update(&mut self, field: StatusField, value: impl ToString) -> bool {
        let value = value.to_string();
        if !self.record.set(field, value) {
            return false;
        }
        tracing::debug!("Status {} = {}", field, self.record.get(field));

        if field == StatusField::LivechatRelay && self.flag.is_some() {
            let is_relay = self.record.get(field) == "true";
            self.reconcile_relay_flag(is_relay);
        }
        true
    }

    /// [`update`](Self::update) keyed by the field's name, e.g. `"position"`
    pub fn update_by_name(&mut self, name: &str, value: impl ToString) -> Result<bool> {
        let field = name.parse::<StatusField>()?;
        Ok(self.update(field, value))
    }

    /// Bring the shared flag in line with this instance's relay status.
    ///
    /// Claiming overwrites whatever is there; releasing only removes a flag
    /// naming this instance. Does nothing when coordination is disabled.
    pub fn reconcile_relay_flag(&self, is_relay: bool) {
        let Some(flag) = &self.flag else {
            return;
        };

        if is_relay {
            flag.claim(&self.identity).log_and_continue();
        } else {
            flag.release(&self.identity).log_and_continue();
        }
    }

    /// Current flag holder, if any (read errors are logged and read as `None`)
    pub fn relay_holder(&self) -> Option<String> {
        self.flag
            .as_ref()
            .and_then(|flag| flag.holder().log_and_continue())
            .flatten()
    }

    /// Claim the relay role if nobody holds it; returns whether this instance holds it
    pub fn elect(&mut self) -> bool {
        let Some(flag) = &self.flag else {
            return false;
        };

        let holder = match flag.holder().log_and_continue() {
            Some(holder) => holder,
            None => return false,
        };

        let is_relay = match holder {
            None => true,
            Some(holder) => holder == self.identity,
        };
        self.update(StatusField::LivechatRelay, is_relay);
        is_relay
    }

    /// Dashboard text for the current status
    pub fn snapshot(&self) -> String {
        self.dashboard.render(&self.identity, &self.record)
    }

    /// Clear the terminal and print the snapshot, unless the dashboard is disabled
    pub fn render_snapshot(&self) {
        if !self.dashboard.is_active() {
            return;
        }

        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{CLEAR_SCREEN}{}", self.snapshot());
        let _ = stdout.flush();
    }

    /// Give up the relay role, if held, before the process exits
    pub fn shutdown(&mut self) {
        self.update(StatusField::LivechatRelay, false);
    }
}
