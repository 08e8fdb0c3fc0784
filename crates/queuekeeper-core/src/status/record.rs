//! Process-wide status fields

use crate::error::QueueKeeperError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Value every field holds until its first update
pub const UNKNOWN: &str = "unknown";

/// The fixed set of status fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusField {
    /// Position in the server queue
    Position,
    /// Estimated time until the queue is through
    Eta,
    /// Scheduled restart, if any
    Restart,
    /// Whether the in-session bot is running
    Mineflayer,
    /// Whether the session is still queued
    InQueue,
    /// Public tunnel URL
    TunnelUrl,
    /// Whether this instance currently holds the relay role
    LivechatRelay,
    /// Client currently controlling the session
    Controller,
}

impl StatusField {
    pub const ALL: [StatusField; 8] = [
        StatusField::Position,
        StatusField::Eta,
        StatusField::Restart,
        StatusField::Mineflayer,
        StatusField::InQueue,
        StatusField::TunnelUrl,
        StatusField::LivechatRelay,
        StatusField::Controller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusField::Position => "position",
            StatusField::Eta => "eta",
            StatusField::Restart => "restart",
            StatusField::Mineflayer => "mineflayer",
            StatusField::InQueue => "inQueue",
            StatusField::TunnelUrl => "tunnelUrl",
            StatusField::LivechatRelay => "livechatRelay",
            StatusField::Controller => "controller",
        }
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusField {
    type Err = QueueKeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| QueueKeeperError::config_error(format!("unknown status field '{s}'")))
    }
}

/// String-typed status values keyed by field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    values: HashMap<StatusField, String>,
}

impl StatusRecord {
    /// Every field set to [`UNKNOWN`]
    pub fn new() -> Self {
        Self {
            values: StatusField::ALL
                .into_iter()
                .map(|field| (field, UNKNOWN.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, field: StatusField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or(UNKNOWN)
    }

    /// Store `value` if it differs from the current string; returns whether it changed
    pub(crate) fn set(&mut self, field: StatusField, value: String) -> bool {
        if self.get(field) == value {
            return false;
        }
        self.values.insert(field, value);
        true
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self::new()
    }
}
