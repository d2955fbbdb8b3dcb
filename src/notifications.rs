/// Desktop notification support
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

fn send(title: &str, body: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        if let Err(err) = Command::new("osascript").arg("-e").arg(&script).output() {
            log::debug!("event=notify_failed module=notifications error={}", err);
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        log::debug!("event=notify_skipped module=notifications title={} body={}", title, body);
    }
}

/// Notify that a pomodoro phase finished
pub fn notify_phase_complete(finished: &str, next: &str) {
    send("Pomodoro", &format!("{finished} finished. Up next: {next}"));
}

/// Notify that an achievement unlocked
pub fn notify_achievement_unlocked(title: &str, points: u32) {
    send("Achievement Unlocked", &format!("🏆 {title} - claim {points} points"));
}
