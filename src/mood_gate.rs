use crate::domain::Mood;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Maximum mood check-in prompts per calendar day
pub const MAX_PROMPTS_PER_DAY: u32 = 3;

/// Daily throttle for the mood check-in prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodCheckState {
    #[serde(default)]
    pub prompts_today: u32,
    #[serde(default)]
    pub last_prompt: Option<DateTime<Local>>,
    #[serde(default)]
    pub last_mood: Option<Mood>,
    #[serde(default)]
    pub last_mood_at: Option<DateTime<Local>>,
}

impl MoodCheckState {
    /// Decide whether to prompt now, recording the prompt when allowed.
    ///
    /// The counter restarts on the first call of a new local calendar day.
    pub fn should_prompt(&mut self, now: DateTime<Local>) -> bool {
        let new_day = self
            .last_prompt
            .map(|last| last.date_naive() != now.date_naive())
            .unwrap_or(false);
        if new_day {
            self.prompts_today = 0;
        }

        if self.prompts_today >= MAX_PROMPTS_PER_DAY {
            return false;
        }
        self.prompts_today += 1;
        self.last_prompt = Some(now);
        true
    }

    /// Store the selected mood
    pub fn record_mood(&mut self, mood: Mood, now: DateTime<Local>) {
        self.last_mood = Some(mood);
        self.last_mood_at = Some(now);
    }

    /// Mood selected today, if any
    pub fn mood_for_today(&self, now: DateTime<Local>) -> Option<Mood> {
        match (self.last_mood, self.last_mood_at) {
            (Some(mood), Some(at)) if at.date_naive() == now.date_naive() => Some(mood),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_three_prompts_per_day() {
        let mut state = MoodCheckState::default();
        assert!(state.should_prompt(at(2, 8)));
        assert!(state.should_prompt(at(2, 12)));
        assert!(state.should_prompt(at(2, 16)));
        assert!(!state.should_prompt(at(2, 20)));
        assert_eq!(state.prompts_today, 3);
        assert_eq!(state.last_prompt, Some(at(2, 16)));
    }

    #[test]
    fn test_counter_resets_next_day() {
        let mut state = MoodCheckState::default();
        for hour in [8, 9, 10] {
            state.should_prompt(at(2, hour));
        }
        assert!(!state.should_prompt(at(2, 11)));

        assert!(state.should_prompt(at(3, 7)));
        assert_eq!(state.prompts_today, 1);
    }

    #[test]
    fn test_mood_for_today_expires() {
        let mut state = MoodCheckState::default();
        state.record_mood(Mood::Tired, at(2, 9));
        assert_eq!(state.mood_for_today(at(2, 22)), Some(Mood::Tired));
        assert_eq!(state.mood_for_today(at(3, 8)), None);
    }
}
