use serde::{Deserialize, Serialize};

/// Timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Work => "Work Time",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Phase::Work)
    }
}

/// Phase durations and cycle length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub work_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    /// Work phases per cycle; the last one is followed by a long break
    pub long_break_every: u8,
    /// Start the next phase immediately instead of waiting for `start`
    pub auto_start: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_every: 4,
            auto_start: false,
        }
    }
}

impl TimerConfig {
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

/// Emitted when a phase runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCompletion {
    pub finished: Phase,
    pub next: Phase,
}

impl PhaseCompletion {
    /// Only finished work phases count as pomodoro sessions
    pub fn is_work(&self) -> bool {
        !self.finished.is_break()
    }
}

/// Countdown state machine cycling work and break phases
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    config: TimerConfig,
    phase: Phase,
    time_left: u32,
    running: bool,
    /// Work phases finished in the current cycle
    pomodoro_count: u8,
    work_completions: u32,
    break_completions: u32,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl PomodoroTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Work,
            time_left: config.work_secs,
            running: false,
            pomodoro_count: 0,
            work_completions: 0,
            break_completions: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_work_time(&self) -> bool {
        self.phase == Phase::Work
    }

    pub fn pomodoro_count(&self) -> u8 {
        self.pomodoro_count
    }

    /// Work phases finished since creation
    pub fn work_completions(&self) -> u32 {
        self.work_completions
    }

    /// Break phases finished since creation
    pub fn break_completions(&self) -> u32 {
        self.break_completions
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Toggle between running and paused without touching the remaining time
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Back to a stopped, full-length work phase with a fresh cycle
    pub fn reset(&mut self) {
        self.running = false;
        self.phase = Phase::Work;
        self.time_left = self.config.work_secs;
        self.pomodoro_count = 0;
    }

    /// Advance one second. Returns the completion when the phase ran out.
    pub fn tick(&mut self) -> Option<PhaseCompletion> {
        if !self.running {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return Some(self.finish_phase());
        }
        None
    }

    /// Advance several seconds, collecting every phase completion on the way
    pub fn advance(&mut self, seconds: u32) -> Vec<PhaseCompletion> {
        let mut completions = Vec::new();
        for _ in 0..seconds {
            if !self.running {
                break;
            }
            if let Some(completion) = self.tick() {
                completions.push(completion);
            }
        }
        completions
    }

    fn finish_phase(&mut self) -> PhaseCompletion {
        let finished = self.phase;
        let next = match finished {
            Phase::Work => {
                self.work_completions += 1;
                self.pomodoro_count += 1;
                if self.pomodoro_count >= self.config.long_break_every.max(1) {
                    self.pomodoro_count = 0;
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => {
                self.break_completions += 1;
                Phase::Work
            }
        };

        self.phase = next;
        self.time_left = self.config.duration_of(next);
        self.running = self.config.auto_start;

        log::debug!(
            "event=pomodoro_phase_complete finished={:?} next={:?} count={}",
            finished,
            next,
            self.pomodoro_count
        );

        PhaseCompletion { finished, next }
    }
}

/// Format seconds as `MM:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_phase(timer: &mut PomodoroTimer) -> PhaseCompletion {
        timer.start();
        let secs = timer.time_left();
        let completions = timer.advance(secs);
        assert_eq!(completions.len(), 1);
        completions[0]
    }

    #[test]
    fn test_new_timer_is_stopped_work_phase() {
        let timer = PomodoroTimer::default();
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.time_left(), 1500);
        assert!(!timer.is_running());
        assert_eq!(timer.pomodoro_count(), 0);
    }

    #[test]
    fn test_work_phase_moves_to_short_break() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        let mut completion = None;
        for _ in 0..1500 {
            if let Some(done) = timer.tick() {
                completion = Some(done);
            }
        }

        let completion = completion.expect("work phase should finish");
        assert!(completion.is_work());
        assert_eq!(completion.next, Phase::ShortBreak);
        assert_eq!(timer.phase(), Phase::ShortBreak);
        assert_eq!(timer.time_left(), 300);
        assert_eq!(timer.pomodoro_count(), 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_fourth_work_phase_moves_to_long_break() {
        let mut timer = PomodoroTimer::default();
        for round in 1..=4 {
            let work = run_phase(&mut timer);
            assert!(work.is_work());
            if round < 4 {
                assert_eq!(timer.phase(), Phase::ShortBreak);
                assert_eq!(timer.pomodoro_count(), round);
                let rest = run_phase(&mut timer);
                assert!(!rest.is_work());
                assert_eq!(timer.phase(), Phase::Work);
            }
        }

        assert_eq!(timer.phase(), Phase::LongBreak);
        assert_eq!(timer.time_left(), 900);
        assert_eq!(timer.pomodoro_count(), 0);
        assert_eq!(timer.work_completions(), 4);
        assert_eq!(timer.break_completions(), 3);
    }

    #[test]
    fn test_long_break_returns_to_work() {
        let config = TimerConfig {
            work_secs: 2,
            short_break_secs: 1,
            long_break_secs: 3,
            long_break_every: 1,
            auto_start: false,
        };
        let mut timer = PomodoroTimer::new(config);
        run_phase(&mut timer);
        assert_eq!(timer.phase(), Phase::LongBreak);

        let completion = run_phase(&mut timer);
        assert_eq!(completion.finished, Phase::LongBreak);
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.time_left(), 2);
    }

    #[test]
    fn test_pause_does_not_drift() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        timer.advance(10);
        assert_eq!(timer.time_left(), 1490);

        timer.pause();
        for _ in 0..50 {
            assert!(timer.tick().is_none());
        }
        assert_eq!(timer.time_left(), 1490);

        timer.toggle();
        assert!(timer.is_running());
        timer.tick();
        assert_eq!(timer.time_left(), 1489);
    }

    #[test]
    fn test_reset_restores_work_phase() {
        let mut timer = PomodoroTimer::default();
        run_phase(&mut timer);
        timer.start();
        timer.advance(20);

        timer.reset();
        assert_eq!(timer.phase(), Phase::Work);
        assert_eq!(timer.time_left(), 1500);
        assert_eq!(timer.pomodoro_count(), 0);
        assert!(!timer.is_running());
        // lifetime counters survive a reset
        assert_eq!(timer.work_completions(), 1);
    }

    #[test]
    fn test_auto_start_keeps_running_across_phases() {
        let config = TimerConfig {
            work_secs: 3,
            short_break_secs: 2,
            long_break_secs: 4,
            long_break_every: 4,
            auto_start: true,
        };
        let mut timer = PomodoroTimer::new(config);
        timer.start();
        let completions = timer.advance(5);
        assert_eq!(completions.len(), 2);
        assert!(completions[0].is_work());
        assert_eq!(completions[1].finished, Phase::ShortBreak);
        assert!(timer.is_running());
        assert_eq!(timer.phase(), Phase::Work);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
    }
}
