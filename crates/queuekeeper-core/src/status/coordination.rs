//! Relay flag shared between cooperating instances
//!
//! The flag is a plain text file in the coordination directory whose whole
//! content is the identity of the instance holding the relay role. There is
//! no lock: claims are last-writer-wins and a release is a read-then-remove,
//! so two instances racing can interleave.

use crate::error::QueueKeeperError;
use crate::result::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the relay flag inside the coordination directory
pub const FLAG_FILE: &str = "relay.flag";

/// Handle to the relay flag artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinationFlag {
    path: PathBuf,
}

impl CoordinationFlag {
    pub fn new(coordination_dir: &Path) -> Self {
        Self {
            path: coordination_dir.join(FLAG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identity stored in the flag, or `None` when nobody holds it
    pub fn holder(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.error("read", e)),
        }
    }

    /// Write `identity` into the flag unconditionally
    pub fn claim(&self, identity: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.error("create directory for", e))?;
        }
        fs::write(&self.path, identity).map_err(|e| self.error("write", e))?;
        tracing::info!("Claimed relay role as '{}'", identity);
        Ok(())
    }

    /// Remove the flag if, and only if, it names `identity`.
    ///
    /// Returns whether the flag was removed.
    pub fn release(&self, identity: &str) -> Result<bool> {
        match self.holder()? {
            Some(holder) if holder == identity => {
                match fs::remove_file(&self.path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
                    Err(e) => return Err(self.error("remove", e)),
                }
                tracing::info!("Released relay role held by '{}'", identity);
                Ok(true)
            }
            Some(holder) => {
                tracing::debug!("Relay flag belongs to '{}', leaving it in place", holder);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn error(&self, action: &str, source: std::io::Error) -> QueueKeeperError {
        QueueKeeperError::coordination_error(format!(
            "failed to {action} relay flag {}: {source}",
            self.path.display()
        ))
    }
}
