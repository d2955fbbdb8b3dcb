pub mod achievement;
pub mod enums;
pub mod schedule;
pub mod task;
pub mod views;

pub use achievement::{seed_achievements, Achievement, AchievementId, UserLevel};
pub use enums::{Mood, Priority, RecurrenceKind, SortKey, StatusFilter};
pub use schedule::{parse_weekday, Schedule, ScheduleDraft, ScheduleError};
pub use task::{Recurrence, Task, TaskDraft, TaskError};
pub use views::{derive_view, TaskStore};
