use crate::domain::{Task, UserLevel};
use crate::persistence::{atomic_write, Profile};
use crate::report::stats::{calculate_task_stats, count_by_category, count_by_priority};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::Path;

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Text progress bar for a percentage, e.g. `[####------]`
fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).floor() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Render the Markdown report for a task list and profile at `now`
pub fn render_report(tasks: &[Task], profile: &Profile, now: DateTime<Local>) -> String {
    let stats = calculate_task_stats(tasks, now);
    let mut report = String::new();

    report.push_str(&format!("# Task Report - {}\n\n", now.format("%Y-%m-%d")));

    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Total Tasks:** {} (Open: {}, Completed: {})\n",
        stats.total_tasks, stats.open_count, stats.completed_count
    ));
    report.push_str(&format!("- **Completed Today:** {}\n", stats.completed_today));
    report.push_str(&format!("- **Overdue:** {}\n", stats.overdue_count));
    report.push_str(&format!("- **Recurring:** {}\n", stats.recurring_count));
    report.push_str(&format!(
        "- **Weekly Completion:** {}\n",
        format_percent(stats.weekly_completion_percent)
    ));
    report.push_str(&format!(
        "- **Monthly Completion:** {}\n\n",
        format_percent(stats.monthly_completion_percent)
    ));

    report.push_str("## Tasks by Category\n\n");
    report.push_str("| Category | Tasks |\n|----------|-------|\n");
    for (category, count) in count_by_category(tasks) {
        report.push_str(&format!("| {} | {} |\n", category, count));
    }
    report.push('\n');

    report.push_str("## Tasks by Priority\n\n");
    report.push_str("| Priority | Tasks |\n|----------|-------|\n");
    for (priority, count) in count_by_priority(tasks) {
        report.push_str(&format!("| {} | {} |\n", priority.label(), count));
    }
    report.push('\n');

    report.push_str("## Achievements\n\n");
    report.push_str(&format!(
        "- **Points:** {} ({} Level)\n",
        profile.points,
        UserLevel::for_points(profile.points).name()
    ));
    report.push_str(&format!(
        "- **Pomodoro Sessions:** {}\n\n",
        profile.pomodoro_completions
    ));
    for achievement in &profile.achievements {
        let state = if achievement.claimed {
            "claimed"
        } else if achievement.completed {
            "ready to claim"
        } else {
            "in progress"
        };
        report.push_str(&format!(
            "- {} {} {}/{} ({}, {} pts)\n",
            progress_bar(achievement.percent(), 10),
            achievement.title,
            achievement.progress,
            achievement.total,
            state,
            achievement.points
        ));
    }

    report
}

/// Render and write the report to `output`
pub fn generate_report(tasks: &[Task], profile: &Profile, now: DateTime<Local>, output: &Path) -> Result<()> {
    let report = render_report(tasks, profile, now);
    atomic_write(output, &report)?;
    log::info!("event=report_written module=report path={}", output.display());
    Ok(())
}
