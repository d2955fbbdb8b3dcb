//! Use-case orchestration over the task and profile repositories.
//!
//! Every mutation of the task list is followed by an achievement recompute,
//! so the stored profile always reflects the latest snapshot.

use crate::achievements::{newly_completed, recompute, ClaimOutcome};
use crate::categorizer::{categorize, FALLBACK_CATEGORY};
use crate::domain::{AchievementId, Task, TaskDraft, TaskError};
use crate::persistence::{Profile, ProfileRepository, StoreError, TaskRepository};
use crate::pomodoro::PhaseCompletion;
use chrono::{DateTime, Local};
use log::{debug, info};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidTask(#[from] TaskError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Profile after a recompute, with the achievements that just unlocked
#[derive(Debug, Clone)]
pub struct AchievementRefresh {
    pub profile: Profile,
    pub unlocked: Vec<AchievementId>,
}

/// Task and achievement operations for one user
pub struct TaskService<S> {
    store: S,
    auto_categorize: bool,
}

impl<S> TaskService<S>
where
    S: TaskRepository + ProfileRepository,
{
    pub fn new(store: S, auto_categorize: bool) -> Self {
        Self { store, auto_categorize }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.store.list_tasks()?)
    }

    pub fn profile(&self) -> ServiceResult<Profile> {
        Ok(self.store.load_profile()?)
    }

    /// Category for a new task: explicit label, else keyword match, else fallback
    fn resolve_category(&self, draft: &TaskDraft) -> String {
        if let Some(category) = draft.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            return category.to_lowercase();
        }
        if self.auto_categorize {
            categorize(&draft.title).to_string()
        } else {
            FALLBACK_CATEGORY.to_string()
        }
    }

    pub fn create_task(&self, draft: TaskDraft, now: DateTime<Local>) -> ServiceResult<(Task, AchievementRefresh)> {
        let category = self.resolve_category(&draft);
        let task = Task::from_draft(draft, category, now)?;
        self.store.create_task(&task)?;
        let refresh = self.refresh_achievements(now)?;
        Ok((task, refresh))
    }

    /// Flip a task between completed and open
    pub fn toggle_task(&self, id: Uuid, now: DateTime<Local>) -> ServiceResult<(Task, AchievementRefresh)> {
        let current = self
            .store
            .list_tasks()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;
        let task = self.store.set_completion(id, !current.completed, now)?;
        let refresh = self.refresh_achievements(now)?;
        Ok((task, refresh))
    }

    pub fn delete_task(&self, id: Uuid, now: DateTime<Local>) -> ServiceResult<AchievementRefresh> {
        self.store.delete_task(id)?;
        self.refresh_achievements(now)
    }

    /// Count a finished phase. Only work phases move `pomodoro_master`.
    pub fn record_phase(&self, completion: PhaseCompletion, now: DateTime<Local>) -> ServiceResult<Option<AchievementRefresh>> {
        if !completion.is_work() {
            debug!("event=break_complete module=service phase={:?}", completion.finished);
            return Ok(None);
        }
        let mut profile = self.store.load_profile()?;
        profile.pomodoro_completions = profile.pomodoro_completions.saturating_add(1);
        let saved = self.store.save_profile(&profile)?;
        info!(
            "event=pomodoro_recorded module=service completions={}",
            saved.pomodoro_completions
        );
        self.refresh_achievements(now).map(Some)
    }

    /// Recompute achievements from the stored tasks and persist the result
    pub fn refresh_achievements(&self, now: DateTime<Local>) -> ServiceResult<AchievementRefresh> {
        let tasks = self.store.list_tasks()?;
        let mut profile = self.store.load_profile()?;
        let updated = recompute(&profile.achievements, &tasks, profile.pomodoro_completions, now.date_naive());
        let unlocked: Vec<AchievementId> = newly_completed(&profile.achievements, &updated)
            .iter()
            .map(|a| a.id)
            .collect();

        if updated == profile.achievements {
            return Ok(AchievementRefresh { profile, unlocked });
        }

        profile.achievements = updated;
        let saved = self.store.save_profile(&profile)?;
        for id in &unlocked {
            info!("event=achievement_unlocked module=service id={}", id.label());
        }
        Ok(AchievementRefresh {
            profile: saved,
            unlocked,
        })
    }

    pub fn claim(&self, id: AchievementId) -> ServiceResult<(ClaimOutcome, Profile)> {
        Ok(self.store.claim(id)?)
    }
}
