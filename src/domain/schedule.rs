use chrono::{DateTime, Local, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Please fill in the schedule title")]
    EmptyTitle,
    #[error("Please select at least one day")]
    NoDays,
    #[error("End time must be after start time")]
    EndNotAfterStart,
}

/// Parse a weekday label such as "mon" or "Monday"
pub fn parse_weekday(label: &str) -> Option<Weekday> {
    label.trim().parse().ok()
}

/// User input for a new weekly schedule
#[derive(Debug, Clone)]
pub struct ScheduleDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub days: Vec<Weekday>,
}

impl ScheduleDraft {
    pub fn new(title: impl Into<String>, start_time: NaiveTime, end_time: NaiveTime, days: Vec<Weekday>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_time,
            end_time,
            days,
        }
    }

    /// Checks run in order: title, days, then the time window
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.title.trim().is_empty() {
            return Err(ScheduleError::EmptyTitle);
        }
        if self.days.is_empty() {
            return Err(ScheduleError::NoDays);
        }
        if self.end_time <= self.start_time {
            return Err(ScheduleError::EndNotAfterStart);
        }
        Ok(())
    }
}

/// A block of time repeating on the same weekdays every week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Monday-first, no duplicates
    pub days: Vec<Weekday>,
    pub created_at: DateTime<Local>,
}

impl Schedule {
    pub fn from_draft(draft: ScheduleDraft, now: DateTime<Local>) -> Result<Self, ScheduleError> {
        draft.validate()?;

        let mut days = draft.days;
        days.sort_by_key(|day| day.num_days_from_monday());
        days.dedup();

        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            start_time: draft.start_time,
            end_time: draft.end_time,
            days,
            created_at: now,
        })
    }

    pub fn occurs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// e.g. "Mon, Wed, Fri"
    pub fn days_label(&self) -> String {
        self.days.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
    }

    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}
