//! Quote model

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::canonical::canonical_key;
use crate::error::{Error, Result};
use crate::util::now_millis;

/// Identifier assigned by the remote side once an upload is accepted.
///
/// Remotes answer with either numeric or string ids; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteId(String);

impl RemoteId {
    /// Wrap a raw identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert a JSON id field (number or string) into a `RemoteId`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => Some(Self(number.to_string())),
            serde_json::Value::String(text) if !text.trim().is_empty() => {
                Some(Self(text.trim().to_string()))
            }
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom("remote id must be a number or string"))
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("Remote id cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Where a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Entered or imported on this device
    #[default]
    Local,
    /// Ingested from the remote feed
    Remote,
}

impl Origin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// A quote record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Quote text
    pub text: String,
    /// Category label
    pub category: String,
    /// Last mutation timestamp (Unix ms)
    #[serde(default)]
    pub updated_at: i64,
    /// Provenance
    #[serde(default)]
    pub origin: Origin,
    /// Created or modified locally and not yet acknowledged by the remote
    #[serde(default)]
    pub dirty: bool,
    /// Id assigned by the remote after a successful upload
    #[serde(default)]
    pub remote_id: Option<RemoteId>,
}

impl Quote {
    /// Create a quote entered on this device.
    ///
    /// Text and category are trimmed; empty values are rejected.
    pub fn new_local(text: impl Into<String>, category: impl Into<String>) -> Result<Self> {
        let text = text.into().trim().to_string();
        let category = category.into().trim().to_string();
        validate_fields(&text, &category)?;

        Ok(Self {
            text,
            category,
            updated_at: now_millis(),
            origin: Origin::Local,
            dirty: true,
            remote_id: None,
        })
    }

    /// Create a clean quote ingested from the remote feed.
    #[must_use]
    pub fn from_remote(
        text: impl Into<String>,
        category: impl Into<String>,
        remote_id: Option<RemoteId>,
    ) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            updated_at: now_millis(),
            origin: Origin::Remote,
            dirty: false,
            remote_id,
        }
    }

    /// Canonical identity used for de-duplication and conflict matching.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        canonical_key(&self.text, &self.category)
    }

    /// Raw content equality. Case or whitespace differences count as different.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.text == other.text && self.category == other.category
    }

    /// Check the quote satisfies the store's well-formedness rules.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.text, &self.category)
    }

    /// Record a confirmed upload.
    pub fn mark_uploaded(&mut self, remote_id: RemoteId) {
        self.dirty = false;
        self.remote_id = Some(remote_id);
        self.updated_at = now_millis();
    }
}

fn validate_fields(text: &str, category: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Validation("Quote text cannot be empty".to_string()));
    }
    if category.trim().is_empty() {
        return Err(Error::Validation(
            "Quote category cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Quotes shipped with the application, used when nothing is persisted yet.
///
/// They are local but clean: shipped content is not a pending user edit.
#[must_use]
pub fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The best way to predict the future is to create it.",
            "Motivation",
        ),
        (
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        (
            "Imagination is more important than knowledge.",
            "Inspiration",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
        updated_at: 0,
        origin: Origin::Local,
        dirty: false,
        remote_id: None,
    })
    .collect()
}
