use super::enums::{Priority, RecurrenceKind};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation failures when creating a task
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task title is required")]
    EmptyTitle,
    #[error("recurrence interval must be at least 1")]
    InvalidInterval,
    #[error("end date is required for recurring tasks")]
    MissingEndDate,
}

/// Repeat cadence attached to a recurring task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub kind: RecurrenceKind,
    pub interval: u32,
    pub end_date: Option<DateTime<Local>>,
}

impl Recurrence {
    pub fn new(kind: RecurrenceKind, interval: u32, end_date: Option<DateTime<Local>>) -> Self {
        Self {
            kind,
            interval,
            end_date,
        }
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if self.interval < 1 {
            return Err(TaskError::InvalidInterval);
        }
        if self.end_date.is_none() {
            return Err(TaskError::MissingEndDate);
        }
        Ok(())
    }

    /// Human-readable cadence, e.g. "Repeats every 2 weeks until 2026-10-20"
    pub fn describe(&self) -> String {
        let plural = self.interval > 1;
        let mut text = if plural {
            format!("Repeats every {} {}", self.interval, self.kind.unit(true))
        } else {
            format!("Repeats every {}", self.kind.unit(false))
        };
        if let Some(end) = self.end_date {
            text.push_str(&format!(" until {}", end.format("%Y-%m-%d")));
        }
        text
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    /// Explicit category; when absent the caller assigns one
    pub category: Option<String>,
    pub deadline: Option<DateTime<Local>>,
    pub recurrence: Option<Recurrence>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if self.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        if let Some(recurrence) = &self.recurrence {
            recurrence.validate()?;
        }
        Ok(())
    }
}

/// A user task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Local>>,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl Task {
    /// Build a task from a validated draft
    pub fn from_draft(draft: TaskDraft, category: String, now: DateTime<Local>) -> Result<Self, TaskError> {
        draft.validate()?;
        let description = draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description,
            priority: draft.priority,
            category: Some(category),
            deadline: draft.deadline,
            created_at: now,
            completed: false,
            completed_at: None,
            recurrence: draft.recurrence,
        })
    }

    /// Mark completed or reopen. Completion stamps `completed_at`, reopening clears it.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Local>) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }

    /// Flip completion state
    pub fn toggle_completed(&mut self, now: DateTime<Local>) {
        self.set_completed(!self.completed, now);
    }

    /// Category label, empty when unset
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Deadline as epoch milliseconds, 0 when unset
    pub fn deadline_millis(&self) -> i64 {
        self.deadline.map(|d| d.timestamp_millis()).unwrap_or(0)
    }

    /// Check if the task was completed on the given local calendar day
    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.completed
            && self
                .completed_at
                .map(|at| at.date_naive() == day)
                .unwrap_or(false)
    }

    /// Case-insensitive match against title or description
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }

    /// First eight hex digits of the id
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_from_draft_trims_and_assigns_category() {
        let mut draft = TaskDraft::new("  Write report  ");
        draft.description = Some("   ".to_string());
        let task = Task::from_draft(draft, "work".to_string(), at(2026, 3, 2, 9)).unwrap();

        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, None);
        assert_eq!(task.category.as_deref(), Some("work"));
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_from_draft_rejects_blank_title() {
        let draft = TaskDraft::new("   ");
        let err = Task::from_draft(draft, "other".to_string(), at(2026, 3, 2, 9)).unwrap_err();
        assert_eq!(err, TaskError::EmptyTitle);
    }

    #[test]
    fn test_recurring_draft_requires_end_date() {
        let mut draft = TaskDraft::new("Water plants");
        draft.recurrence = Some(Recurrence::new(RecurrenceKind::Weekly, 1, None));
        assert_eq!(draft.validate(), Err(TaskError::MissingEndDate));

        draft.recurrence = Some(Recurrence::new(RecurrenceKind::Weekly, 0, Some(at(2026, 6, 1, 0))));
        assert_eq!(draft.validate(), Err(TaskError::InvalidInterval));
    }

    #[test]
    fn test_recurrence_describe() {
        let weekly = Recurrence::new(RecurrenceKind::Weekly, 1, Some(at(2026, 10, 20, 0)));
        assert_eq!(weekly.describe(), "Repeats every week until 2026-10-20");

        let every_two_days = Recurrence::new(RecurrenceKind::Daily, 2, None);
        assert_eq!(every_two_days.describe(), "Repeats every 2 days");
    }

    #[test]
    fn test_toggle_completed_sets_and_clears_timestamp() {
        let mut task = Task::from_draft(TaskDraft::new("Clean kitchen"), "home".to_string(), at(2026, 3, 2, 9)).unwrap();

        task.toggle_completed(at(2026, 3, 2, 18));
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(at(2026, 3, 2, 18)));
        assert!(task.completed_on(at(2026, 3, 2, 0).date_naive()));
        assert!(!task.completed_on(at(2026, 3, 3, 0).date_naive()));

        task.toggle_completed(at(2026, 3, 2, 19));
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_matches_search_title_or_description() {
        let mut draft = TaskDraft::new("Quarterly planning");
        draft.description = Some("Budget REVIEW with finance".to_string());
        let task = Task::from_draft(draft, "finance".to_string(), at(2026, 3, 2, 9)).unwrap();

        assert!(task.matches_search(""));
        assert!(task.matches_search("PLANNING"));
        assert!(task.matches_search("review"));
        assert!(!task.matches_search("groceries"));
    }

    #[test]
    fn test_missing_fields_default_on_deserialize() {
        let json = r#"{
            "id": "6f1c2d3e-4b5a-4c6d-8e9f-0a1b2c3d4e5f",
            "title": "Legacy task",
            "created_at": "2026-03-02T09:00:00+00:00"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category_label(), "");
        assert_eq!(task.deadline_millis(), 0);
        assert!(!task.completed);
    }
}
