use crate::mood_gate::MoodCheckState;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Device-local metadata stored in meta.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub mood: MoodCheckState,
}

/// Load app metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<AppMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppMetadata::default());
    }

    let content = std::fs::read_to_string(path)?;
    let metadata: AppMetadata =
        serde_json::from_str(&content).with_context(|| format!("Invalid metadata in {}", path.display()))?;
    Ok(metadata)
}

/// Save app metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &AppMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mood;
    use chrono::{Local, TimeZone};
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_metadata() {
        let temp_dir = tempdir().unwrap();
        let metadata = load_metadata(temp_dir.path().join("meta.json")).unwrap();
        assert_eq!(metadata, AppMetadata::default());
    }

    #[test]
    fn test_save_and_load_metadata() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        let now = Local.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();

        let mut metadata = AppMetadata::default();
        metadata.mood.should_prompt(now);
        metadata.mood.record_mood(Mood::Stressed, now);

        save_metadata(&meta_path, &metadata).unwrap();

        let loaded = load_metadata(&meta_path).unwrap();
        assert_eq!(loaded.mood.prompts_today, 1);
        assert_eq!(loaded.mood.last_mood, Some(Mood::Stressed));
        assert_eq!(loaded.mood.mood_for_today(now), Some(Mood::Stressed));
    }

    #[test]
    fn test_load_tolerates_missing_fields() {
        let temp_dir = tempdir().unwrap();
        let meta_path = temp_dir.path().join("meta.json");
        std::fs::write(&meta_path, "{}").unwrap();

        let loaded = load_metadata(&meta_path).unwrap();
        assert_eq!(loaded.mood.prompts_today, 0);
    }
}
