//! Cloud storage provider tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A remote cloud-storage provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    /// Google Drive.
    Google,
    /// Microsoft OneDrive.
    Microsoft,
}

impl CloudProvider {
    /// Every known provider.
    pub const ALL: [Self; 2] = [Self::Google, Self::Microsoft];

    /// Returns the string representation of the provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Microsoft => "microsoft",
        }
    }

    /// Parses a provider from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "google" => Some(Self::Google),
            "microsoft" => Some(Self::Microsoft),
            _ => None,
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
