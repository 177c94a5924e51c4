use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Retrieval strategy used by [`super::Memsource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Cache first; backend on miss, written back in the background.
    #[default]
    ReadThrough,
    /// Cache and backend concurrently; first usable answer wins.
    Race,
    /// Stale-while-revalidate.
    Relay,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::ReadThrough => "readthrough",
            Mode::Race => "race",
            Mode::Relay => "relay",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mode '{0}': expected readthrough, race or relay")]
pub struct ModeParseError(pub String);

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "readthrough" | "read-through" => Ok(Mode::ReadThrough),
            "race" => Ok(Mode::Race),
            "relay" => Ok(Mode::Relay),
            _ => Err(ModeParseError(s.to_string())),
        }
    }
}
