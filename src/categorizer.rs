/// Category assigned when no keyword matches
pub const FALLBACK_CATEGORY: &str = "other";

/// Ordered category table. The first category with a matching keyword wins,
/// so overlapping keywords ("health") resolve to the earlier entry.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("work", &["work", "meeting", "project", "report", "presentation"]),
    ("personal", &["personal", "self", "health", "exercise"]),
    ("shopping", &["buy", "purchase", "shopping", "grocery"]),
    ("home", &["home", "house", "clean", "repair"]),
    ("study", &["study", "learn", "read", "course"]),
    ("health", &["health", "doctor", "medical", "appointment"]),
    ("social", &["meet", "party", "event", "social"]),
    ("finance", &["bill", "payment", "budget", "finance"]),
];

/// Map a task title to a category label by keyword containment
pub fn categorize(title: &str) -> &'static str {
    let lowercase = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowercase.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_known_titles() {
        assert_eq!(categorize("Buy groceries"), "shopping");
        assert_eq!(categorize("Team meeting"), "work");
        assert_eq!(categorize("xyz"), "other");
        assert_eq!(categorize("Pay electricity BILL"), "finance");
    }

    #[test]
    fn test_categorize_uses_table_order_for_ties() {
        // "health" is listed under personal before the health entry
        assert_eq!(categorize("Health check"), "personal");
        // "meet" is social, but "meeting" hits work first
        assert_eq!(categorize("meet the team at the meeting"), "work");
        assert_eq!(categorize("Doctor appointment"), "health");
    }

    #[test]
    fn test_categorize_is_substring_based() {
        // "read" inside "already"
        assert_eq!(categorize("already done"), "study");
    }
}
