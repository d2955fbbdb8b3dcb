//! Task management core: keyword categorization, filtered task views,
//! mood-based suggestions, achievement bookkeeping, weekly schedules and a
//! pomodoro timer, with a locked JSON document store behind repository traits.

pub mod achievements;
pub mod categorizer;
pub mod domain;
pub mod logging;
pub mod mood_gate;
pub mod notifications;
pub mod persistence;
pub mod pomodoro;
pub mod report;
pub mod service;
pub mod suggest;
pub mod ticker;

pub use achievements::{claim, recompute, ClaimOutcome};
pub use categorizer::categorize;
pub use domain::{
    derive_view, Achievement, AchievementId, Mood, Priority, SortKey, StatusFilter, Task, TaskDraft, TaskStore,
};
pub use pomodoro::{Phase, PhaseCompletion, PomodoroTimer, TimerConfig};
pub use service::{ServiceError, TaskService};
pub use suggest::suggest;
