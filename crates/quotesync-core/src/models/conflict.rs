//! Sync conflict model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::quote::Quote;

/// A remote record that matched a dirty local quote by key but not by content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Canonical key shared by both sides
    pub key: String,
    /// Local snapshot at detection time
    pub local: Quote,
    /// Incoming remote snapshot
    pub remote: Quote,
}

/// Manual decision for a pending conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Keep local content and treat it as acknowledged
    KeepLocal,
    /// Replace local content with the remote snapshot
    KeepRemote,
}

impl Resolution {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeepLocal => "keep_local",
            Self::KeepRemote => "keep_remote",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "keep_local" | "keep-local" => Ok(Self::KeepLocal),
            "remote" | "keep_remote" | "keep-remote" => Ok(Self::KeepRemote),
            other => Err(Error::Validation(format!(
                "Unknown conflict resolution '{other}' (expected local or remote)"
            ))),
        }
    }
}
