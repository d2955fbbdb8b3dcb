pub mod generator;
pub mod stats;

pub use generator::{generate_report, render_report};
pub use stats::{calculate_task_stats, completion_rates, count_by_category, count_by_priority, TaskStats};
