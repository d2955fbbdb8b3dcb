//! Mood-driven task suggestions.
//!
//! Suggestions are a pure function of the current mood and task list. Open
//! tasks are sorted twice with stable sorts: first by category preference, then
//! by priority preference. The second pass dominates, so category preference
//! only orders tasks inside the same priority bucket.

use crate::domain::{Mood, Priority, Task};

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Per-mood ordering preferences
#[derive(Debug, Clone, Copy)]
pub struct MoodProfile {
    pub priority_order: &'static [Priority],
    pub categories: &'static [&'static str],
    pub description: &'static str,
}

/// Look up the ordering preferences for a mood
pub fn mood_profile(mood: Mood) -> MoodProfile {
    match mood {
        Mood::Happy => MoodProfile {
            priority_order: &[Priority::High, Priority::Medium, Priority::Low],
            categories: &["work", "study", "health"],
            description: "You seem energetic today! Here are some challenging tasks you might want to tackle:",
        },
        Mood::Neutral => MoodProfile {
            priority_order: &[Priority::Medium, Priority::High, Priority::Low],
            categories: &["work", "personal", "home"],
            description: "Here are some balanced tasks for today:",
        },
        Mood::Tired => MoodProfile {
            priority_order: &[Priority::Low, Priority::Medium, Priority::High],
            categories: &["personal", "home", "shopping"],
            description: "You seem tired. Consider these lighter tasks:",
        },
        Mood::Stressed => MoodProfile {
            priority_order: &[Priority::Low, Priority::Medium, Priority::High],
            categories: &["health", "personal", "home"],
            description: "You seem stressed. Here are some manageable tasks that might help you feel accomplished:",
        },
        Mood::Productive => MoodProfile {
            priority_order: &[Priority::High, Priority::Medium, Priority::Low],
            categories: &["work", "study", "finance"],
            description: "You're feeling productive! Here are some important tasks to keep your momentum going:",
        },
    }
}

/// Position of `value` in `order`, or `order.len()` when absent.
///
/// Unlisted entries rank after every listed one.
fn preference_rank<T: PartialEq>(order: &[T], value: &T) -> usize {
    order.iter().position(|v| v == value).unwrap_or(order.len())
}

/// Rank open tasks for a mood and return at most five of them
pub fn suggest(tasks: &[Task], mood: Option<Mood>) -> Vec<Task> {
    let Some(mood) = mood else {
        return Vec::new();
    };
    if tasks.is_empty() {
        return Vec::new();
    }

    let profile = mood_profile(mood);
    let mut open: Vec<Task> = tasks.iter().filter(|task| !task.completed).cloned().collect();

    open.sort_by_key(|task| preference_rank(profile.categories, &task.category_label()));
    open.sort_by_key(|task| preference_rank(profile.priority_order, &task.priority));

    open.truncate(MAX_SUGGESTIONS);
    open
}
