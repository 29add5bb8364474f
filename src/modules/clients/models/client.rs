use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, RecordState, Result};

/// Client category used by the finance office screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Student,
    Staff,
    External,
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientType::Student => write!(f, "student"),
            ClientType::Staff => write!(f, "staff"),
            ClientType::External => write!(f, "external"),
        }
    }
}

impl std::str::FromStr for ClientType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "student" => Ok(ClientType::Student),
            "staff" => Ok(ClientType::Staff),
            "external" => Ok(ClientType::External),
            _ => Err(format!("Invalid client type: {}", s)),
        }
    }
}

/// A person or entity the cashier bills
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub client_type: ClientType,
    /// Academic program, present for students
    pub program: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub state: RecordState,
}

/// Validate a client name from a form
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if trimmed.len() > 200 {
        return Err(AppError::validation("Name cannot exceed 200 characters"));
    }
    Ok(())
}
