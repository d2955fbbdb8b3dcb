use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use clap::{Parser, Subcommand};
use moodtasks::achievements::ClaimOutcome;
use moodtasks::domain::{
    parse_weekday, AchievementId, Mood, Priority, Recurrence, RecurrenceKind, Schedule, ScheduleDraft, SortKey,
    StatusFilter, Task, TaskDraft, TaskStore, UserLevel,
};
use moodtasks::persistence::{
    ensure_data_dir, ensure_default_settings, init_local_data_dir, load_metadata, load_settings, meta_file,
    report_file, save_metadata, settings_file, JsonStore, ProfileRepository, ScheduleRepository, Settings,
    TaskRepository,
};
use moodtasks::pomodoro::{format_time, PomodoroTimer};
use moodtasks::service::{AchievementRefresh, TaskService};
use moodtasks::suggest::{mood_profile, suggest};
use moodtasks::ticker::{tick_duration, Ticker};
use moodtasks::{logging, notifications, report};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "moodtasks")]
#[command(about = "Tasks, mood-based suggestions, achievements and a pomodoro timer", long_about = None)]
struct Cli {
    /// User whose tasks and achievements to use
    #[arg(short, long, global = true)]
    user: Option<String>,
    /// Log level (trace|debug|info|warn|error|off)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .moodtasks directory in the current directory
    Init,
    /// Create a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// low | medium | high
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Category label; assigned from the title when omitted
        #[arg(short, long)]
        category: Option<String>,
        /// Deadline (YYYY-MM-DD or "YYYY-MM-DD HH:MM")
        #[arg(long)]
        due: Option<String>,
        /// Repeat cadence: daily | weekly | monthly
        #[arg(long)]
        repeat: Option<String>,
        /// Repeat every N days/weeks/months
        #[arg(long, requires = "repeat")]
        every: Option<u32>,
        /// Last date of the repetition (YYYY-MM-DD)
        #[arg(long, requires = "repeat")]
        until: Option<String>,
    },
    /// List tasks
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// all | pending | in_progress | completed
        #[arg(long, default_value = "all")]
        status: String,
        /// deadline | priority | category
        #[arg(long, default_value = "deadline")]
        sort: String,
    },
    /// Toggle a task between completed and open
    Toggle {
        /// Task id or id prefix
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task id or id prefix
        id: String,
    },
    /// Mood check-in; without a mood, reports whether a check-in is due
    Mood {
        /// happy | neutral | tired | stressed | productive
        mood: Option<String>,
    },
    /// Suggest open tasks for a mood (defaults to today's check-in)
    Suggest {
        #[arg(short, long)]
        mood: Option<String>,
    },
    /// Show achievements, points and level
    Achievements,
    /// Claim the points of a completed achievement
    Claim {
        /// first_task | task_master | productive_day | pomodoro_master
        id: String,
    },
    /// Run the pomodoro timer in the terminal
    Pomodoro {
        /// Stop after this many work phases
        #[arg(long, default_value_t = 1)]
        sessions: u32,
    },
    /// Generate a Markdown report
    Report {
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Weekly schedules
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommand,
    },
}

#[derive(Subcommand)]
enum ScheduleCommand {
    /// Create a schedule repeating on the given weekdays
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
        /// Comma-separated weekdays, e.g. mon,wed,fri
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,
    },
    /// List schedules, optionally only those on one weekday
    List {
        /// Weekday (mon..sun) or "today"
        #[arg(long)]
        day: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&current_dir)?;
        ensure_default_settings(settings_file(&data_dir))?;
        println!("Initialized data directory: {}", data_dir.display());
        return Ok(());
    }

    let data_dir = ensure_data_dir()?;
    let settings = load_settings(settings_file(&data_dir))?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| logging::default_log_level().to_string());
    logging::init_logging(&level, cli.log_dir.as_deref())?;

    let user = cli.user.clone().unwrap_or_else(|| settings.default_user.clone());
    let service = TaskService::new(JsonStore::open(&data_dir, &user), settings.auto_categorize);
    log::debug!("event=cli_start module=cli user={} data_dir={}", user, data_dir.display());

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Add {
            title,
            description,
            priority,
            category,
            due,
            repeat,
            every,
            until,
        } => {
            let mut draft = TaskDraft::new(title);
            draft.description = description;
            draft.priority =
                Priority::from_label(&priority).ok_or_else(|| anyhow!("Unknown priority: {}", priority))?;
            draft.category = category;
            draft.deadline = due.as_deref().map(parse_local_datetime).transpose()?;
            if let Some(repeat) = repeat {
                let kind = RecurrenceKind::from_label(&repeat).ok_or_else(|| anyhow!("Unknown cadence: {}", repeat))?;
                let end_date = until.as_deref().map(parse_local_datetime).transpose()?;
                draft.recurrence = Some(Recurrence::new(kind, every.unwrap_or(1), end_date));
            }

            let (task, refresh) = service.create_task(draft, Local::now())?;
            println!("Created {} [{}] {}", task.short_id(), task.category_label(), task.title);
            if let Some(recurrence) = &task.recurrence {
                println!("  {}", recurrence.describe());
            }
            announce_unlocked(&refresh, &settings);
            Ok(())
        }
        Commands::List { search, status, sort } => {
            let mut store = TaskStore::new(service.tasks()?);
            store.set_search(search);
            store.set_filter(StatusFilter::from_label(&status).ok_or_else(|| anyhow!("Unknown status: {}", status))?);
            store.set_sort(SortKey::from_label(&sort).ok_or_else(|| anyhow!("Unknown sort key: {}", sort))?);

            let view = store.view();
            if view.is_empty() {
                println!("No tasks.");
            }
            for task in &view {
                print_task(task);
            }
            Ok(())
        }
        Commands::Toggle { id } => {
            let id = resolve_task_id(&service, &id)?;
            let (task, refresh) = service.toggle_task(id, Local::now())?;
            let state = if task.completed { "Completed" } else { "Reopened" };
            println!("{} {} {}", state, task.short_id(), task.title);
            announce_unlocked(&refresh, &settings);
            Ok(())
        }
        Commands::Delete { id } => {
            let id = resolve_task_id(&service, &id)?;
            service.delete_task(id, Local::now())?;
            println!("Deleted {}", &id.simple().to_string()[..8]);
            Ok(())
        }
        Commands::Mood { mood } => run_mood(&data_dir, &service, &settings, mood),
        Commands::Suggest { mood } => {
            let meta = load_metadata(meta_file(&data_dir))?;
            let mood = match mood {
                Some(label) => Some(Mood::from_label_or_neutral(&label)),
                None => meta.mood.mood_for_today(Local::now()),
            };
            let Some(mood) = mood else {
                println!("No mood recorded today. Run `moodtasks mood <mood>` or pass --mood.");
                return Ok(());
            };
            print_suggestions(&service.tasks()?, mood);
            Ok(())
        }
        Commands::Achievements => {
            let profile = service.refresh_achievements(Local::now())?.profile;
            println!(
                "{} points - {} Level - {} pomodoro sessions",
                profile.points,
                UserLevel::for_points(profile.points).name(),
                profile.pomodoro_completions
            );
            for achievement in &profile.achievements {
                let mark = if achievement.claimed {
                    "✓"
                } else if achievement.completed {
                    "★"
                } else {
                    " "
                };
                println!(
                    "{} {:<16} {:>2}/{:<2} {:>3} pts  {} ({})",
                    mark,
                    achievement.id.label(),
                    achievement.progress,
                    achievement.total,
                    achievement.points,
                    achievement.title,
                    achievement.description
                );
            }
            Ok(())
        }
        Commands::Claim { id } => {
            let id = AchievementId::from_label(&id).ok_or_else(|| anyhow!("Unknown achievement: {}", id))?;
            service.refresh_achievements(Local::now())?;
            let (outcome, profile) = service.claim(id)?;
            match outcome {
                ClaimOutcome::Claimed { points } => {
                    println!("Congratulations! You earned {} points. Total: {}", points, profile.points)
                }
                ClaimOutcome::AlreadyClaimed => println!("Already claimed."),
                ClaimOutcome::NotCompleted => println!("Not completed yet."),
                ClaimOutcome::Unknown => println!("No such achievement for this user."),
            }
            Ok(())
        }
        Commands::Pomodoro { sessions } => run_pomodoro(&service, &settings, sessions),
        Commands::Report { output } => {
            let now = Local::now();
            let output = output.unwrap_or_else(|| report_file(&data_dir, now.date_naive()));
            let profile = service.refresh_achievements(now)?.profile;
            report::generate_report(&service.tasks()?, &profile, now, &output)?;
            println!("Report generated: {}", output.display());
            Ok(())
        }
        Commands::Schedule { action } => run_schedule(service.store(), action),
    }
}

/// Parse "YYYY-MM-DD" (end of day) or "YYYY-MM-DD HH:MM" as local time
fn parse_local_datetime(value: &str) -> Result<DateTime<Local>> {
    let value = value.trim();
    let naive = if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        dt
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| anyhow!("Invalid time for {}", value))?
    };
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("{} does not exist in the local timezone", value))
}

fn resolve_task_id<S>(service: &TaskService<S>, prefix: &str) -> Result<Uuid>
where
    S: TaskRepository + ProfileRepository,
{
    let store = TaskStore::new(service.tasks()?);
    match store.find(prefix).as_slice() {
        [task] => Ok(task.id),
        [] => bail!("No task matches id {}", prefix),
        matches => bail!("Id {} is ambiguous ({} tasks match)", prefix, matches.len()),
    }
}

fn print_task(task: &Task) {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let due = task
        .deadline
        .map(|d| format!(" due {}", d.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    let repeat = if task.is_recurring() { " ↻" } else { "" };
    println!(
        "{} {} {:<6} {:<9} {}{}{}",
        check,
        task.short_id(),
        task.priority.label(),
        task.category_label(),
        task.title,
        due,
        repeat
    );
}

fn print_suggestions(tasks: &[Task], mood: Mood) {
    let picked = suggest(tasks, Some(mood));
    println!("{} {}", mood.symbol(), mood_profile(mood).description);
    if picked.is_empty() {
        println!("No suggested tasks available.");
    }
    for task in &picked {
        print_task(task);
    }
}

fn announce_unlocked(refresh: &AchievementRefresh, settings: &Settings) {
    for id in &refresh.unlocked {
        if let Some(achievement) = refresh.profile.achievement(*id) {
            println!(
                "🏆 Unlocked \"{}\" - run `moodtasks claim {}` for {} points",
                achievement.title,
                id.label(),
                achievement.points
            );
            if settings.notifications {
                notifications::notify_achievement_unlocked(&achievement.title, achievement.points);
            }
        }
    }
}

fn run_mood<S>(data_dir: &Path, service: &TaskService<S>, settings: &Settings, mood: Option<String>) -> Result<()>
where
    S: TaskRepository + ProfileRepository,
{
    let path = meta_file(data_dir);
    let mut meta = load_metadata(&path)?;
    let now = Local::now();

    match mood {
        None => {
            if !settings.show_mood_picker {
                println!("Mood check-ins are disabled in settings.");
                return Ok(());
            }
            if meta.mood.should_prompt(now) {
                save_metadata(&path, &meta)?;
                println!(
                    "How are you feeling? (check-in {}/{})",
                    meta.mood.prompts_today,
                    moodtasks::mood_gate::MAX_PROMPTS_PER_DAY
                );
                for mood in Mood::all() {
                    println!("  {} {}", mood.symbol(), mood.label());
                }
            } else {
                println!("You've already checked in {} times today.", meta.mood.prompts_today);
            }
            Ok(())
        }
        Some(label) => {
            let mood = Mood::from_label_or_neutral(&label);
            meta.mood.record_mood(mood, now);
            save_metadata(&path, &meta)?;
            log::info!("event=mood_recorded module=cli mood={}", mood.label());
            print_suggestions(&service.tasks()?, mood);
            Ok(())
        }
    }
}

fn run_pomodoro<S>(service: &TaskService<S>, settings: &Settings, sessions: u32) -> Result<()>
where
    S: TaskRepository + ProfileRepository,
{
    let mut config = settings.timer;
    config.auto_start = true;
    let mut timer = PomodoroTimer::new(config);
    let mut ticker = Ticker::new(tick_duration());
    let poll = tick_duration() / 4;

    timer.start();
    let mut stdout = io::stdout();
    while timer.work_completions() < sessions {
        for completion in timer.advance(ticker.due()) {
            println!("\r{} finished.            ", completion.finished.name());
            if settings.notifications {
                notifications::notify_phase_complete(completion.finished.name(), completion.next.name());
            }
            if let Some(refresh) = service.record_phase(completion, Local::now())? {
                announce_unlocked(&refresh, settings);
            }
            if timer.work_completions() >= sessions {
                break;
            }
        }

        print!(
            "\r{:<11} {}  cycle {}/{}",
            timer.phase().name(),
            format_time(timer.time_left()),
            timer.pomodoro_count() + 1,
            timer.config().long_break_every
        );
        stdout.flush()?;
        std::thread::sleep(poll);
    }
    println!();
    println!("Completed {} pomodoro session(s).", timer.work_completions());
    Ok(())
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| anyhow!("Invalid time {}. Use HH:MM: {}", value, e))
}

fn run_schedule<S: ScheduleRepository>(store: &S, action: ScheduleCommand) -> Result<()> {
    match action {
        ScheduleCommand::Add {
            title,
            description,
            start,
            end,
            days,
        } => {
            let days = days
                .iter()
                .filter(|d| !d.trim().is_empty())
                .map(|d| parse_weekday(d).ok_or_else(|| anyhow!("Unknown weekday: {}", d)))
                .collect::<Result<Vec<_>>>()?;
            let mut draft = ScheduleDraft::new(title, parse_time(&start)?, parse_time(&end)?, days);
            draft.description = description;

            let schedule = Schedule::from_draft(draft, Local::now())?;
            store.create_schedule(&schedule)?;
            println!("Created schedule {}", schedule.short_id());
            print_schedule(&schedule);
            Ok(())
        }
        ScheduleCommand::List { day } => {
            let day = match day.as_deref().map(str::trim) {
                None => None,
                Some("today") => Some(Local::now().weekday()),
                Some(label) => Some(parse_weekday(label).ok_or_else(|| anyhow!("Unknown weekday: {}", label))?),
            };
            let schedules: Vec<Schedule> = store
                .list_schedules()?
                .into_iter()
                .filter(|s| day.map_or(true, |d| s.occurs_on(d)))
                .collect();
            if schedules.is_empty() {
                println!("No schedules.");
            }
            for schedule in &schedules {
                print_schedule(schedule);
            }
            Ok(())
        }
    }
}

fn print_schedule(schedule: &Schedule) {
    println!(
        "{} {}-{} ({} min) {}  [{}]",
        schedule.short_id(),
        schedule.start_time.format("%H:%M"),
        schedule.end_time.format("%H:%M"),
        schedule.duration_minutes(),
        schedule.title,
        schedule.days_label()
    );
    if let Some(description) = &schedule.description {
        println!("  {}", description);
    }
}
