use serde::{Deserialize, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse priority from a label like "high"
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Rank used by the priority sort (high first)
    pub fn sort_rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Self-reported mood used to bias task suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Neutral,
    Tired,
    Stressed,
    Productive,
}

impl Mood {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "neutral" => Some(Self::Neutral),
            "tired" => Some(Self::Tired),
            "stressed" => Some(Self::Stressed),
            "productive" => Some(Self::Productive),
            _ => None,
        }
    }

    /// Unknown labels fall back to neutral
    pub fn from_label_or_neutral(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::Neutral)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Tired => "tired",
            Self::Stressed => "stressed",
            Self::Productive => "productive",
        }
    }

    /// Get the emoji symbol for this mood
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Neutral => "😐",
            Self::Tired => "😫",
            Self::Stressed => "😰",
            Self::Productive => "💪",
        }
    }

    pub fn all() -> &'static [Mood] {
        &[
            Mood::Happy,
            Mood::Neutral,
            Mood::Tired,
            Mood::Stressed,
            Mood::Productive,
        ]
    }
}

/// Status filter for the task list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Check whether a task with the given completion flag passes this filter.
    ///
    /// Tasks carry no separate in-progress state, so `Pending` and
    /// `InProgress` both select every task that is not completed.
    pub fn accepts(&self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::Pending | Self::InProgress => !completed,
        }
    }
}

/// Sort key for the task list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Deadline,
    Priority,
    Category,
}

impl SortKey {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "deadline" => Some(Self::Deadline),
            "priority" => Some(Self::Priority),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

/// Cadence of a recurring task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Unit name, singular or plural
    pub fn unit(&self, plural: bool) -> &'static str {
        match (self, plural) {
            (Self::Daily, false) => "day",
            (Self::Daily, true) => "days",
            (Self::Weekly, false) => "week",
            (Self::Weekly, true) => "weeks",
            (Self::Monthly, false) => "month",
            (Self::Monthly, true) => "months",
        }
    }
}
