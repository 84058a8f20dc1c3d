use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A validated catalog application identifier.
///
/// Identifiers are positive integers; zero is never a valid application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AppId(u32);

impl AppId {
    /// Creates a new `AppId` after validating the input.
    pub fn new(id: u32) -> Result<Self, CoreError> {
        if id == 0 {
            return Err(CoreError::InvalidAppId("identifier must be positive".to_string()));
        }
        Ok(Self(id))
    }

    /// Returns the raw numeric identifier.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for AppId {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for u32 {
    fn from(id: AppId) -> Self {
        id.0
    }
}

impl FromStr for AppId {
    type Err = CoreError;

    /// Parses a decimal identifier, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<u32>()
            .map_err(|e| CoreError::InvalidAppId(format!("'{trimmed}': {e}")))?;
        Self::new(value)
    }
}

impl Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
