use serde::{Deserialize, Serialize};
use std::fmt;

/// Activation state shared by catalog rows, clients and employees.
///
/// Inactive rows are kept for history but stop appearing in the pick
/// lists used when recording a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Active,
    Inactive,
}

impl Default for RecordState {
    fn default() -> Self {
        RecordState::Active
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordState::Active => write!(f, "active"),
            RecordState::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for RecordState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RecordState::Active),
            "inactive" => Ok(RecordState::Inactive),
            _ => Err(format!("Invalid record state: {}", s)),
        }
    }
}
