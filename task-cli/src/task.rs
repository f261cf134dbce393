use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: u32,
    description: String,
    status: Status,
    #[serde(with = "crate::timestamp")]
    created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    updated_at: DateTime<Utc>,
}

impl Task {
    pub(crate) fn new(id: u32, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_description(&mut self, description: String, now: DateTime<Utc>) {
        self.description = description;
        self.touch(now);
    }

    pub(crate) fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    /// `updated_at` never moves backwards, even if the clock does.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }
}

/// Lifecycle status of a task. Any status may move to any other.
#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "unknown status `{s}`, expected one of: todo, in-progress, done"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn new_task_starts_as_todo_with_equal_timestamps() {
        let task = Task::new(1, "Test task".to_string(), fixed_time());

        assert_eq!(task.id(), 1);
        assert_eq!(task.description(), "Test task");
        assert_eq!(task.status(), Status::Todo);
        assert_eq!(task.created_at(), task.updated_at());
    }

    #[test]
    fn status_change_refreshes_updated_at_only() {
        // Arrange
        let mut task = Task::new(1, "Test task".to_string(), fixed_time());
        let later = fixed_time() + Duration::minutes(5);

        // Act
        task.set_status(Status::Done, later);

        // Assert
        assert_eq!(task.status(), Status::Done);
        assert_eq!(task.created_at(), fixed_time());
        assert_eq!(task.updated_at(), later);
    }

    #[test]
    fn updated_at_does_not_go_backwards() {
        let mut task = Task::new(1, "Test task".to_string(), fixed_time());

        task.set_description("Renamed".to_string(), fixed_time() - Duration::hours(1));

        assert_eq!(task.description(), "Renamed");
        assert_eq!(task.updated_at(), fixed_time());
    }

    #[test]
    fn serializes_with_camel_case_keys_and_kebab_case_status() {
        // Arrange
        let mut task = Task::new(7, "Write docs".to_string(), fixed_time());
        task.set_status(Status::InProgress, fixed_time());

        // Act
        let value = serde_json::to_value(&task).unwrap();

        // Assert
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "description": "Write docs",
                "status": "in-progress",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn deserialization_requires_status() {
        let json = r#"{
            "id": 1,
            "description": "Task 1",
            "createdAt": "2023-01-01T00:00:00Z",
            "updatedAt": "2023-01-01T00:00:00Z"
        }"#;

        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn status_parses_from_its_display_form() {
        for status in Status::ALL {
            assert_eq!(status.to_string().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = "finished".parse::<Status>().unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
    }
}
