use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Calendar-date format used on the wire for due dates, e.g. `31-12-2025`.
pub const DUE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Represents the status of a task.
///
/// Any wire value other than the three enumerated ones is rejected on
/// create and update.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task is yet to be started.
    Pending,
    /// Task is currently being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Task is completed.
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "In Progress" => Ok(TaskStatus::InProgress),
            "Completed" => Ok(TaskStatus::Completed),
            _ => Err(()),
        }
    }
}

/// Represents a task entity as held by the repository.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier for the task, assigned by the repository on creation
    /// and immutable afterwards.
    pub id: Uuid,
    /// The title of the task. Never empty.
    pub title: String,
    /// A description for the task. May be empty.
    pub description: String,
    /// The due date of the task. No time-of-day semantics.
    pub due_date: NaiveDate,
    /// The current status of the task.
    pub status: TaskStatus,
}

impl Task {
    /// Returns true if today is past the task's due date.
    pub fn is_overdue(&self) -> bool {
        Utc::now().date_naive() > self.due_date
    }
}

/// Input structure for creating or updating a task. The due date and status
/// arrive as plain strings and are validated by the use-case layer before
/// the repository is ever called.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskPayload {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// A description for the task. May be omitted or empty.
    #[serde(default)]
    pub description: String,

    /// Due date in `DD-MM-YYYY` format.
    pub due_date: String,

    /// Status string; must be one of "Pending", "In Progress", "Completed".
    pub status: String,
}

/// Wire-format task representation returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.format(DUE_DATE_FORMAT).to_string(),
            status: task.status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_round_trip() {
        for (text, status) in [
            ("Pending", TaskStatus::Pending),
            ("In Progress", TaskStatus::InProgress),
            ("Completed", TaskStatus::Completed),
        ] {
            assert_eq!(text.parse::<TaskStatus>().unwrap(), status);
            assert_eq!(status.to_string(), text);
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!("Unknown".parse::<TaskStatus>().is_err());
        assert!("pending".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_overdue() {
        let mut task = Task {
            id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: String::new(),
            due_date: Utc::now().date_naive() - Duration::days(1),
            status: TaskStatus::Pending,
        };
        assert!(task.is_overdue());

        task.due_date = Utc::now().date_naive() + Duration::days(1);
        assert!(!task.is_overdue());
    }

    #[test]
    fn test_dto_formats_due_date() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "Write spec".to_string(),
            description: "First draft".to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: TaskStatus::InProgress,
        };
        let dto = TaskDto::from(&task);
        assert_eq!(dto.id, task.id.to_string());
        assert_eq!(dto.due_date, "31-12-2025");
        assert_eq!(dto.status, "In Progress");
    }

    #[test]
    fn test_payload_validation() {
        let valid = TaskPayload {
            title: "Valid Title".to_string(),
            description: "Test Description".to_string(),
            due_date: "31-12-2025".to_string(),
            status: "Pending".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_title = TaskPayload {
            title: "".to_string(),
            description: "Test Description".to_string(),
            due_date: "31-12-2025".to_string(),
            status: "Pending".to_string(),
        };
        assert!(
            empty_title.validate().is_err(),
            "Validation should fail for empty title."
        );

        let long_title = TaskPayload {
            title: "a".repeat(201),
            description: "Test Description".to_string(),
            due_date: "31-12-2025".to_string(),
            status: "Pending".to_string(),
        };
        assert!(
            long_title.validate().is_err(),
            "Validation should fail for overly long title."
        );
    }
}
