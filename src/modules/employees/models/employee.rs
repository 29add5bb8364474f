use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, RecordState, Result};

/// Work shift at the cashier window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkShift {
    Morning,
    Afternoon,
    Evening,
}

impl std::fmt::Display for WorkShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkShift::Morning => write!(f, "morning"),
            WorkShift::Afternoon => write!(f, "afternoon"),
            WorkShift::Evening => write!(f, "evening"),
        }
    }
}

impl std::str::FromStr for WorkShift {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "morning" => Ok(WorkShift::Morning),
            "afternoon" => Ok(WorkShift::Afternoon),
            "evening" => Ok(WorkShift::Evening),
            _ => Err(format!("Invalid work shift: {}", s)),
        }
    }
}

/// A cashier employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    /// National id document; unique across employees
    pub national_id: String,
    pub work_shift: WorkShift,
    pub hired_on: NaiveDate,
    pub state: RecordState,
}

/// Validate employee form fields
pub fn validate(name: &str, national_id: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if national_id.trim().is_empty() {
        return Err(AppError::validation("National id cannot be empty"));
    }
    if national_id.trim().len() > 20 {
        return Err(AppError::validation(
            "National id cannot exceed 20 characters",
        ));
    }
    Ok(())
}
