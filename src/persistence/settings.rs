use crate::pomodoro::TimerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User preferences stored in settings.json. Every field has a default so
/// partial files keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Assign a category from the title when none is given
    pub auto_categorize: bool,
    /// Offer the mood check-in before showing suggestions
    pub show_mood_picker: bool,
    /// Desktop notifications for phase changes and unlocked achievements
    pub notifications: bool,
    /// User whose documents are used when `--user` is not given
    pub default_user: String,
    /// Log level override (trace|debug|info|warn|error)
    pub log_level: Option<String>,
    pub timer: TimerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_categorize: true,
            show_mood_picker: true,
            notifications: true,
            default_user: "local".to_string(),
            log_level: None,
            timer: TimerConfig::default(),
        }
    }
}

/// Load settings, falling back to defaults when the file is missing
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings =
        serde_json::from_str(&content).with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Write settings with defaults filled in, if the file does not exist yet
pub fn ensure_default_settings<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    let json = serde_json::to_string_pretty(&Settings::default())?;
    crate::persistence::atomic_write(path, &format!("{json}\n"))
}
