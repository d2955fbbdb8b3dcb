//! Document persistence for tasks, schedules and per-user profiles.
//!
//! # Responsibility
//! - Define the fetch/mutate contract the core expects from its storage
//!   collaborator.
//! - Provide a JSON file implementation rooted at a per-user directory.
//!
//! # Invariants
//! - Every write goes through a temp file + rename.
//! - Every read-modify-write holds the per-user `.lock` from read to rename,
//!   so concurrent writers are serialized and no update is lost.
//! - Profile writes are conditioned on the revision that was read; a stale
//!   caller gets `StoreError::Conflict` instead of overwriting newer state.

use super::files::{atomic_write, read_file, user_dir};
use super::lock::DirLock;
use crate::achievements::{claim_in_place, ClaimOutcome};
use crate::domain::{seed_achievements, Achievement, AchievementId, Schedule, Task};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const TASKS_FILE: &str = "tasks.json";
const SCHEDULES_FILE: &str = "schedules.json";
const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),
    #[error("profile was modified concurrently (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-user gamification state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Bumped on every successful save
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub points: u32,
    /// Lifetime finished work phases
    #[serde(default)]
    pub pomodoro_completions: u32,
    #[serde(default = "seed_achievements")]
    pub achievements: Vec<Achievement>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            revision: 0,
            points: 0,
            pomodoro_completions: 0,
            achievements: seed_achievements(),
        }
    }
}

impl Profile {
    /// Add template entries missing from an older achievement set
    fn fill_missing_achievements(&mut self) {
        for template in seed_achievements() {
            if !self.achievements.iter().any(|a| a.id == template.id) {
                self.achievements.push(template);
            }
        }
    }

    pub fn achievement(&self, id: AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }
}

/// Task documents owned by one user
pub trait TaskRepository {
    /// All tasks, newest first
    fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    fn create_task(&self, task: &Task) -> StoreResult<()>;
    /// Set completion state, stamping or clearing `completed_at`
    fn set_completion(&self, id: Uuid, completed: bool, at: DateTime<Local>) -> StoreResult<Task>;
    fn delete_task(&self, id: Uuid) -> StoreResult<()>;
}

/// Points, pomodoro count and achievements for one user
pub trait ProfileRepository {
    /// Load the profile, seeding it from the achievement templates on first use
    fn load_profile(&self) -> StoreResult<Profile>;
    /// Save if the stored revision still matches `profile.revision`
    fn save_profile(&self, profile: &Profile) -> StoreResult<Profile>;
    /// Claim an achievement and credit its points in one conditional write
    fn claim(&self, id: AchievementId) -> StoreResult<(ClaimOutcome, Profile)>;
}

/// Weekly schedules owned by one user
pub trait ScheduleRepository {
    /// All schedules ordered by start time
    fn list_schedules(&self) -> StoreResult<Vec<Schedule>>;
    fn create_schedule(&self, schedule: &Schedule) -> StoreResult<()>;
}

/// JSON file store under `<data_dir>/users/<user>/`
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open(data_dir: &Path, user: &str) -> Self {
        Self {
            dir: user_dir(data_dir, user),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lock(&self) -> StoreResult<DirLock> {
        Ok(DirLock::acquire(&self.dir)?)
    }

    fn read_list<T: DeserializeOwned>(&self, file: &str) -> StoreResult<Vec<T>> {
        let content = read_file(self.dir.join(file))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_list<T: Serialize>(&self, file: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(items)?;
        atomic_write(self.dir.join(file), &json)?;
        Ok(())
    }

    fn read_profile(&self) -> StoreResult<Option<Profile>> {
        let content = read_file(self.dir.join(PROFILE_FILE))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let mut profile: Profile = serde_json::from_str(&content)?;
        profile.fill_missing_achievements();
        Ok(Some(profile))
    }

    fn write_profile(&self, profile: &Profile) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(profile)?;
        atomic_write(self.dir.join(PROFILE_FILE), &json)?;
        Ok(())
    }

    /// Caller must hold the lock
    fn load_or_seed_profile(&self) -> StoreResult<Profile> {
        if let Some(profile) = self.read_profile()? {
            return Ok(profile);
        }
        let seeded = Profile::default();
        self.write_profile(&seeded)?;
        info!("event=profile_seeded module=store dir={}", self.dir.display());
        Ok(seeded)
    }

    /// Caller must hold the lock
    fn save_profile_locked(&self, profile: &Profile) -> StoreResult<Profile> {
        let found = self.read_profile()?.map(|p| p.revision).unwrap_or(0);
        if found != profile.revision {
            warn!(
                "event=profile_conflict module=store expected={} found={}",
                profile.revision, found
            );
            return Err(StoreError::Conflict {
                expected: profile.revision,
                found,
            });
        }

        let mut saved = profile.clone();
        saved.revision += 1;
        self.write_profile(&saved)?;
        debug!("event=profile_saved module=store revision={}", saved.revision);
        Ok(saved)
    }
}

impl TaskRepository for JsonStore {
    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.read_list(TASKS_FILE)?;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    fn create_task(&self, task: &Task) -> StoreResult<()> {
        let _lock = self.lock()?;
        let mut tasks: Vec<Task> = self.read_list(TASKS_FILE)?;
        tasks.push(task.clone());
        self.write_list(TASKS_FILE, &tasks)?;
        info!("event=task_created module=store id={} category={}", task.id, task.category_label());
        Ok(())
    }

    fn set_completion(&self, id: Uuid, completed: bool, at: DateTime<Local>) -> StoreResult<Task> {
        let _lock = self.lock()?;
        let mut tasks: Vec<Task> = self.read_list(TASKS_FILE)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;
        task.set_completed(completed, at);
        let updated = task.clone();
        self.write_list(TASKS_FILE, &tasks)?;
        info!("event=task_completion module=store id={} completed={}", id, completed);
        Ok(updated)
    }

    fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let _lock = self.lock()?;
        let mut tasks: Vec<Task> = self.read_list(TASKS_FILE)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StoreError::TaskNotFound(id));
        }
        self.write_list(TASKS_FILE, &tasks)?;
        info!("event=task_deleted module=store id={}", id);
        Ok(())
    }
}

impl ProfileRepository for JsonStore {
    fn load_profile(&self) -> StoreResult<Profile> {
        if let Some(profile) = self.read_profile()? {
            return Ok(profile);
        }
        let _lock = self.lock()?;
        self.load_or_seed_profile()
    }

    fn save_profile(&self, profile: &Profile) -> StoreResult<Profile> {
        let _lock = self.lock()?;
        self.save_profile_locked(profile)
    }

    fn claim(&self, id: AchievementId) -> StoreResult<(ClaimOutcome, Profile)> {
        let _lock = self.lock()?;
        let mut profile = self.load_or_seed_profile()?;
        let outcome = claim_in_place(&mut profile.achievements, id);
        if let ClaimOutcome::Claimed { points } = outcome {
            profile.points = profile.points.saturating_add(points);
            let saved = self.save_profile_locked(&profile)?;
            info!(
                "event=achievement_claimed module=store id={} points={} total={}",
                id.label(),
                points,
                saved.points
            );
            return Ok((outcome, saved));
        }
        debug!("event=claim_ignored module=store id={} outcome={:?}", id.label(), outcome);
        Ok((outcome, profile))
    }
}

impl ScheduleRepository for JsonStore {
    fn list_schedules(&self) -> StoreResult<Vec<Schedule>> {
        let mut schedules: Vec<Schedule> = self.read_list(SCHEDULES_FILE)?;
        schedules.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.created_at.cmp(&b.created_at)));
        Ok(schedules)
    }

    fn create_schedule(&self, schedule: &Schedule) -> StoreResult<()> {
        let _lock = self.lock()?;
        let mut schedules: Vec<Schedule> = self.read_list(SCHEDULES_FILE)?;
        schedules.push(schedule.clone());
        self.write_list(SCHEDULES_FILE, &schedules)?;
        info!(
            "event=schedule_created module=store id={} days={}",
            schedule.id,
            schedule.days_label()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::recompute;
    use crate::domain::TaskDraft;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn task(title: &str, day: u32) -> Task {
        Task::from_draft(TaskDraft::new(title), "other".to_string(), at(day, 9)).unwrap()
    }

    #[test]
    fn test_tasks_crud() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        assert!(store.list_tasks().unwrap().is_empty());

        let older = task("older", 1);
        let newer = task("newer", 2);
        store.create_task(&older).unwrap();
        store.create_task(&newer).unwrap();

        let listed = store.list_tasks().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "newer");

        let done = store.set_completion(older.id, true, at(3, 10)).unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_at, Some(at(3, 10)));

        store.delete_task(newer.id).unwrap();
        let listed = store.list_tasks().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].completed);
    }

    #[test]
    fn test_missing_task_is_reported() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        let id = Uuid::new_v4();
        assert!(matches!(store.delete_task(id), Err(StoreError::TaskNotFound(missing)) if missing == id));
        assert!(matches!(
            store.set_completion(id, true, at(1, 1)),
            Err(StoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_users_are_isolated() {
        let temp_dir = tempdir().unwrap();
        let alice = JsonStore::open(temp_dir.path(), "alice");
        let bob = JsonStore::open(temp_dir.path(), "bob");
        alice.create_task(&task("alice only", 1)).unwrap();
        assert!(bob.list_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_profile_seeded_on_first_load() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        let profile = store.load_profile().unwrap();
        assert_eq!(profile.revision, 0);
        assert_eq!(profile.achievements.len(), 4);
        assert!(store.dir().join(PROFILE_FILE).exists());
    }

    #[test]
    fn test_save_profile_rejects_stale_revision() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        let first_read = store.load_profile().unwrap();
        let second_read = first_read.clone();

        let saved = store.save_profile(&first_read).unwrap();
        assert_eq!(saved.revision, 1);

        let err = store.save_profile(&second_read).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 0, found: 1 }));
    }

    #[test]
    fn test_claim_credits_points_once() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        let mut profile = store.load_profile().unwrap();
        profile.achievements = recompute(&profile.achievements, &[task("x", 1)], 0, at(1, 12).date_naive());
        store.save_profile(&profile).unwrap();

        let (outcome, profile) = store.claim(AchievementId::FirstTask).unwrap();
        assert_eq!(outcome, ClaimOutcome::Claimed { points: 50 });
        assert_eq!(profile.points, 50);

        let (outcome, profile) = store.claim(AchievementId::FirstTask).unwrap();
        assert_eq!(outcome, ClaimOutcome::AlreadyClaimed);
        assert_eq!(profile.points, 50);
        assert_eq!(store.load_profile().unwrap().points, 50);
    }

    #[test]
    fn test_older_profile_gains_new_templates() {
        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        let mut legacy = Profile::default();
        legacy.achievements.truncate(3);
        legacy.points = 150;
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(
            store.dir().join(PROFILE_FILE),
            serde_json::to_string(&legacy).unwrap(),
        )
        .unwrap();

        let loaded = store.load_profile().unwrap();
        assert_eq!(loaded.points, 150);
        assert!(loaded.achievement(AchievementId::PomodoroMaster).is_some());
    }

    fn unlocked_profile(store: &JsonStore) {
        let mut profile = store.load_profile().unwrap();
        profile.pomodoro_completions = 5;
        profile.achievements = recompute(&profile.achievements, &[task("x", 1)], 5, at(1, 12).date_naive());
        store.save_profile(&profile).unwrap();
    }

    #[test]
    fn test_concurrent_claims_of_different_achievements_both_count() {
        let temp_dir = tempdir().unwrap();
        unlocked_profile(&JsonStore::open(temp_dir.path(), "alice"));

        let handles: Vec<_> = [AchievementId::FirstTask, AchievementId::PomodoroMaster]
            .into_iter()
            .map(|id| {
                let store = JsonStore::open(temp_dir.path(), "alice");
                std::thread::spawn(move || store.claim(id).unwrap().0)
            })
            .collect();
        for handle in handles {
            assert!(matches!(handle.join().unwrap(), ClaimOutcome::Claimed { .. }));
        }

        let profile = JsonStore::open(temp_dir.path(), "alice").load_profile().unwrap();
        assert_eq!(profile.points, 250);
    }

    #[test]
    fn test_concurrent_claims_of_same_achievement_award_once() {
        let temp_dir = tempdir().unwrap();
        unlocked_profile(&JsonStore::open(temp_dir.path(), "alice"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = JsonStore::open(temp_dir.path(), "alice");
                std::thread::spawn(move || store.claim(AchievementId::FirstTask).unwrap().0)
            })
            .collect();
        let outcomes: Vec<ClaimOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let claimed = outcomes
            .iter()
            .filter(|o| matches!(o, ClaimOutcome::Claimed { .. }))
            .count();
        assert_eq!(claimed, 1);
        assert_eq!(outcomes.iter().map(|o| o.awarded()).sum::<u32>(), 50);
        assert_eq!(
            JsonStore::open(temp_dir.path(), "alice").load_profile().unwrap().points,
            50
        );
    }

    #[test]
    fn test_concurrent_creates_keep_every_task() {
        let temp_dir = tempdir().unwrap();
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = JsonStore::open(temp_dir.path(), "alice");
                std::thread::spawn(move || {
                    for n in 0..5 {
                        store.create_task(&task(&format!("task {worker}-{n}"), 1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = JsonStore::open(temp_dir.path(), "alice");
        assert_eq!(store.list_tasks().unwrap().len(), 40);
        assert!(!store.dir().join(crate::persistence::lock::LOCK_FILE).exists());
    }

    #[test]
    fn test_schedules_listed_by_start_time() {
        use crate::domain::{Schedule, ScheduleDraft};
        use chrono::{NaiveTime, Weekday};

        let temp_dir = tempdir().unwrap();
        let store = JsonStore::open(temp_dir.path(), "alice");
        assert!(store.list_schedules().unwrap().is_empty());

        let hm = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        let gym = Schedule::from_draft(ScheduleDraft::new("Gym", hm(18), hm(19), vec![Weekday::Tue]), at(1, 8)).unwrap();
        let standup =
            Schedule::from_draft(ScheduleDraft::new("Standup", hm(9), hm(10), vec![Weekday::Mon]), at(1, 8)).unwrap();
        store.create_schedule(&gym).unwrap();
        store.create_schedule(&standup).unwrap();

        let listed = store.list_schedules().unwrap();
        assert_eq!(listed, vec![standup, gym]);
        assert!(store.dir().join(SCHEDULES_FILE).exists());
    }
}
