use crate::categorizer::FALLBACK_CATEGORY;
use crate::domain::{Priority, Task};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone};
use std::collections::BTreeMap;

/// Task counts and completion rates over the whole list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_count: usize,
    pub open_count: usize,
    pub overdue_count: usize,
    pub recurring_count: usize,
    pub completed_today: usize,
    pub weekly_completion_percent: f64,
    pub monthly_completion_percent: f64,
}

/// Start of the week (Sunday 00:00 local) containing `now`
pub fn start_of_week(now: DateTime<Local>) -> NaiveDate {
    let today = now.date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// First day of the month containing `now`
pub fn start_of_month(now: DateTime<Local>) -> NaiveDate {
    now.date_naive().with_day(1).unwrap_or_else(|| now.date_naive())
}

fn local_midnight(day: NaiveDate) -> Option<DateTime<Local>> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Percentage of tasks created since `since` that are completed; 0 when none were created
pub fn completion_rate_since(tasks: &[Task], since: NaiveDate) -> f64 {
    let Some(since) = local_midnight(since) else {
        return 0.0;
    };
    let created: Vec<&Task> = tasks.iter().filter(|t| t.created_at >= since).collect();
    if created.is_empty() {
        return 0.0;
    }
    let done = created.iter().filter(|t| t.completed).count();
    done as f64 / created.len() as f64 * 100.0
}

/// Weekly and monthly completion percentages
pub fn completion_rates(tasks: &[Task], now: DateTime<Local>) -> (f64, f64) {
    (
        completion_rate_since(tasks, start_of_week(now)),
        completion_rate_since(tasks, start_of_month(now)),
    )
}

/// Calculate summary statistics at `now`
pub fn calculate_task_stats(tasks: &[Task], now: DateTime<Local>) -> TaskStats {
    let completed_count = tasks.iter().filter(|t| t.completed).count();
    let overdue_count = tasks
        .iter()
        .filter(|t| !t.completed)
        .filter(|t| t.deadline.map(|d| d < now).unwrap_or(false))
        .count();
    let (weekly, monthly) = completion_rates(tasks, now);

    TaskStats {
        total_tasks: tasks.len(),
        completed_count,
        open_count: tasks.len() - completed_count,
        overdue_count,
        recurring_count: tasks.iter().filter(|t| t.is_recurring()).count(),
        completed_today: tasks.iter().filter(|t| t.completed_on(now.date_naive())).count(),
        weekly_completion_percent: weekly,
        monthly_completion_percent: monthly,
    }
}

/// Task count per category; tasks without one count as "other"
pub fn count_by_category(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        let category = task
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(FALLBACK_CATEGORY);
        *counts.entry(category.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Task count per priority, highest first
pub fn count_by_priority(tasks: &[Task]) -> Vec<(Priority, usize)> {
    Priority::all()
        .iter()
        .map(|p| (*p, tasks.iter().filter(|t| t.priority == *p).count()))
        .collect()
}
