use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub scheduled_time: String,
    pub location: Location,
    /// Meters from the simulated current position.
    pub distance: u32,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reached_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Reached,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reached => "reached",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "on_the_way" | "on-the-way" => Ok(Self::Pending),
            "reached" => Ok(Self::Reached),
            "skipped" => Ok(Self::Skipped),
            other => Err(AppError::invalid_input(format!(
                "unknown status '{other}' (expected pending, reached or skipped)"
            ))),
        }
    }
}

/// Whether the viewed day is in the past, present or future.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayContext {
    #[default]
    Today,
    Past,
    Upcoming,
}

impl DayContext {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Past => "past",
            Self::Upcoming => "upcoming",
        }
    }
}

impl FromStr for DayContext {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "past" => Ok(Self::Past),
            "upcoming" => Ok(Self::Upcoming),
            other => Err(AppError::invalid_input(format!(
                "unknown day context '{other}' (expected today, past or upcoming)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

/// Fields supplied by the caller when inserting a task; the store assigns
/// the id and starts it as pending.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub scheduled_time: String,
    pub location: Location,
    pub distance: u32,
}

#[cfg(test)]
mod tests {
    use super::{DayContext, Location, Task, TaskStatus};

    #[test]
    fn status_parses_known_names() {
        assert_eq!("pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!(" Reached ".parse::<TaskStatus>().unwrap(), TaskStatus::Reached);
        assert_eq!("SKIPPED".parse::<TaskStatus>().unwrap(), TaskStatus::Skipped);
        assert_eq!("on-the-way".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
    }

    #[test]
    fn status_rejects_unknown_name() {
        let err = "done".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn day_context_defaults_to_today() {
        assert_eq!(DayContext::default(), DayContext::Today);
        assert_eq!("past".parse::<DayContext>().unwrap(), DayContext::Past);
        assert!("tomorrow".parse::<DayContext>().is_err());
    }

    #[test]
    fn task_serializes_without_absent_optionals() {
        let task = Task {
            id: "1".to_string(),
            title: "Morning coffee".to_string(),
            scheduled_time: "08:30 AM".to_string(),
            location: Location {
                name: "Café Soleil".to_string(),
                lat: 48.8566,
                lng: 2.3522,
            },
            distance: 45,
            status: TaskStatus::Pending,
            reached_at: None,
            notes: None,
        };

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["status"], "pending");
        assert_eq!(value["location"]["name"], "Café Soleil");
        assert!(value.get("reached_at").is_none());
        assert!(value.get("notes").is_none());
    }
}
