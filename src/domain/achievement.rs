use serde::{Deserialize, Serialize};

/// Fixed catalog of achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstTask,
    TaskMaster,
    ProductiveDay,
    PomodoroMaster,
}

impl AchievementId {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "first_task" => Some(Self::FirstTask),
            "task_master" => Some(Self::TaskMaster),
            "productive_day" => Some(Self::ProductiveDay),
            "pomodoro_master" => Some(Self::PomodoroMaster),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstTask => "first_task",
            Self::TaskMaster => "task_master",
            Self::ProductiveDay => "productive_day",
            Self::PomodoroMaster => "pomodoro_master",
        }
    }
}

/// A gamification goal, unlockable once and claimable once for points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub progress: u32,
    pub total: u32,
    pub completed: bool,
    pub claimed: bool,
    pub points: u32,
}

impl Achievement {
    fn template(id: AchievementId, title: &str, description: &str, icon: &str, total: u32, points: u32) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            progress: 0,
            total,
            completed: false,
            claimed: false,
            points,
        }
    }

    /// Set progress, clamped to `[0, total]`, and derive `completed` from it
    pub fn set_progress(&mut self, progress: u32) {
        self.progress = progress.min(self.total);
        self.completed = self.progress >= self.total;
    }

    /// Completed but not yet claimed
    pub fn is_claimable(&self) -> bool {
        self.completed && !self.claimed
    }

    /// Progress as a percentage of total
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.progress as f64 / self.total as f64 * 100.0
    }
}

/// The per-user achievement set as seeded on first use
pub fn seed_achievements() -> Vec<Achievement> {
    vec![
        Achievement::template(AchievementId::FirstTask, "First Steps", "Create your first task", "assignment", 1, 50),
        Achievement::template(AchievementId::TaskMaster, "Task Master", "Complete 10 tasks", "stars", 10, 100),
        Achievement::template(
            AchievementId::ProductiveDay,
            "Productive Day",
            "Complete 5 tasks in a single day",
            "wb-sunny",
            5,
            150,
        ),
        Achievement::template(
            AchievementId::PomodoroMaster,
            "Focus Champion",
            "Complete 5 Pomodoro sessions",
            "timer",
            5,
            200,
        ),
    ]
}

/// Level badge derived from the point total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLevel {
    Bronze,
    Silver,
    Gold,
}

impl UserLevel {
    pub fn for_points(points: u32) -> Self {
        if points >= 1000 {
            Self::Gold
        } else if points >= 500 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog() {
        let seeded = seed_achievements();
        let ids: Vec<_> = seeded.iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec![
                AchievementId::FirstTask,
                AchievementId::TaskMaster,
                AchievementId::ProductiveDay,
                AchievementId::PomodoroMaster
            ]
        );
        assert!(seeded.iter().all(|a| a.progress == 0 && !a.completed && !a.claimed));
        assert_eq!(seeded[0].points, 50);
        assert_eq!(seeded[3].total, 5);
    }

    #[test]
    fn test_set_progress_clamps_and_completes() {
        let mut achievement = seed_achievements().remove(1);
        achievement.set_progress(4);
        assert_eq!(achievement.progress, 4);
        assert!(!achievement.completed);

        achievement.set_progress(42);
        assert_eq!(achievement.progress, 10);
        assert!(achievement.completed);
        assert!(achievement.is_claimable());
    }

    #[test]
    fn test_user_level_thresholds() {
        assert_eq!(UserLevel::for_points(0), UserLevel::Bronze);
        assert_eq!(UserLevel::for_points(499), UserLevel::Bronze);
        assert_eq!(UserLevel::for_points(500), UserLevel::Silver);
        assert_eq!(UserLevel::for_points(1000), UserLevel::Gold);
    }

    #[test]
    fn test_id_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&AchievementId::PomodoroMaster).unwrap();
        assert_eq!(json, "\"pomodoro_master\"");
        assert_eq!(AchievementId::from_label("productive_day"), Some(AchievementId::ProductiveDay));
    }
}
