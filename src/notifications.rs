//! Audible cue when an interval finishes.
//! Rings the terminal bell everywhere; macOS also gets a desktop notification.
use crate::domain::TimerMode;
use std::io::Write;
#[cfg(target_os = "macos")]
use std::process::Command;

/// Receives a signal whenever a work or break interval elapses
pub trait Notifier {
    fn session_finished(&self, mode: TimerMode);
}

/// Notifier used by the TUI
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn session_finished(&self, mode: TimerMode) {
        ring_bell();
        notify_desktop(mode);
    }
}

fn ring_bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

fn completion_message(mode: TimerMode) -> &'static str {
    match mode {
        TimerMode::Work => "Session complete. Take a break or keep going?",
        TimerMode::ShortBreak | TimerMode::LongBreak => "Break over. Back to focus.",
    }
}

fn notify_desktop(mode: TimerMode) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Pomotask - {}""#,
            completion_message(mode),
            mode.label()
        );

        let _ = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output();
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = completion_message(mode);
    }
}
