//! Spoken and scripted time announcements.
//!
//! Announcements are fire-and-forget: child processes run with their output
//! discarded and are reaped opportunistically on later spawns. A failure to spawn
//! is logged and never interrupts the timer.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::config::Settings;

/// Speech synthesizers, in order of preference.
pub const VOICE_PROGRAMS: [&str; 3] = ["/usr/bin/say", "/usr/bin/espeak", "/usr/bin/espeak-ng"];

fn with_prefix(prefix: &str, phrase: String) -> String {
    format!("{} {}", prefix, phrase).trim().to_string()
}

/// Phrase spoken when a countdown shows `seconds`, if that second is announced.
///
/// Every second inside the critical window is read out as a bare number, a few
/// milestones further out get a short sentence.
pub fn countdown_phrase(seconds: i64, critical: i64, prefix: &str) -> Option<String> {
    let phrase = if seconds <= critical {
        return Some(seconds.to_string());
    } else if matches!(seconds, 5 | 10 | 20 | 30 | 60) {
        format!("{} seconds", seconds)
    } else if matches!(seconds, 300 | 600 | 1800) {
        format!("{} minutes", seconds / 60)
    } else if seconds == 3600 {
        "one hour".to_string()
    } else {
        return None;
    };
    Some(with_prefix(prefix, phrase))
}

/// Phrase passed to the exec command when a stopwatch shows `seconds`.
///
/// Empty for seconds that are not milestones.
pub fn stopwatch_phrase(seconds: i64, critical: i64, prefix: &str) -> String {
    let phrase = if seconds > 0 && seconds <= critical {
        return seconds.to_string();
    } else if matches!(seconds, 5 | 10 | 20 | 30 | 40 | 50 | 60) {
        format!("{} seconds", seconds)
    } else if matches!(seconds, 120 | 180 | 300 | 600 | 1800) {
        format!("{} minutes", seconds / 60)
    } else if seconds == 3600 {
        "one hour".to_string()
    } else if seconds > 0 && seconds % 3600 == 0 {
        format!("{} hours", seconds / 3600)
    } else {
        return String::new();
    };
    with_prefix(prefix, phrase)
}

/// Substitute `{0}` (seconds) and `{1}` (phrase) into an exec command template.
pub fn format_command(template: &str, seconds: i64, phrase: &str) -> String {
    template
        .replace("{0}", &seconds.to_string())
        .replace("{1}", phrase)
}

/// First installed speech synthesizer.
pub fn find_voice_program() -> Option<PathBuf> {
    VOICE_PROGRAMS
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

#[derive(Debug)]
struct Voice {
    program: PathBuf,
    name: String,
}

/// Runs announcement commands for the mode loops.
#[derive(Debug, Default)]
pub struct Announcer {
    voice: Option<Voice>,
    exec_cmd: Option<String>,
    prefix: String,
    critical: i64,
    children: Mutex<Vec<Child>>,
}

impl Announcer {
    pub fn new(settings: &Settings) -> Self {
        let voice = settings.voice.as_ref().and_then(|name| {
            let program = find_voice_program();
            if program.is_none() {
                log::warn!("No speech synthesizer found, voice announcements disabled");
            }
            program.map(|program| Voice {
                program,
                name: name.clone(),
            })
        });
        Announcer {
            voice,
            exec_cmd: settings.exec_cmd.clone(),
            prefix: settings.voice_prefix.clone(),
            critical: settings.critical,
            children: Mutex::new(Vec::new()),
        }
    }

    /// An announcer that never runs anything.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.voice.is_some() || self.exec_cmd.is_some()
    }

    /// Announce a countdown second: exec command always, voice on milestones.
    pub fn countdown(&self, seconds: i64) {
        if !self.is_active() {
            return;
        }
        let phrase = countdown_phrase(seconds, self.critical, &self.prefix);
        if let Some(template) = &self.exec_cmd {
            self.run_shell(&format_command(template, seconds, phrase.as_deref().unwrap_or("")));
        }
        if let (Some(voice), Some(phrase)) = (&self.voice, phrase) {
            let mut cmd = Command::new(&voice.program);
            cmd.arg("-v").arg(&voice.name).arg(phrase);
            self.spawn(cmd);
        }
    }

    /// Announce a stopwatch second through the exec command.
    pub fn stopwatch(&self, seconds: i64) {
        if let Some(template) = &self.exec_cmd {
            let phrase = stopwatch_phrase(seconds, self.critical, &self.prefix);
            self.run_shell(&format_command(template, seconds, &phrase));
        }
    }

    fn run_shell(&self, command: &str) {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        self.spawn(cmd);
    }

    fn spawn(&self, mut cmd: Command) {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut children = self.children.lock().unwrap_or_else(|e| e.into_inner());
        children.retain_mut(|child| matches!(child.try_wait(), Ok(None)));

        match cmd.spawn() {
            Ok(child) => {
                log::debug!("Spawned announcement {:?} (pid {})", cmd, child.id());
                children.push(child);
            }
            Err(e) => log::warn!("Failed to run announcement {:?}: {}", cmd, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_phrase_critical_window() {
        assert_eq!(countdown_phrase(3, 3, "").as_deref(), Some("3"));
        assert_eq!(countdown_phrase(1, 3, "Tea").as_deref(), Some("1"));
    }

    #[test]
    fn test_countdown_phrase_milestones() {
        assert_eq!(countdown_phrase(10, 3, "").as_deref(), Some("10 seconds"));
        assert_eq!(countdown_phrase(300, 3, "").as_deref(), Some("5 minutes"));
        assert_eq!(countdown_phrase(1800, 3, "").as_deref(), Some("30 minutes"));
        assert_eq!(countdown_phrase(3600, 3, "").as_deref(), Some("one hour"));
    }

    #[test]
    fn test_countdown_phrase_prefix() {
        assert_eq!(
            countdown_phrase(60, 3, "Tea in").as_deref(),
            Some("Tea in 60 seconds")
        );
    }

    #[test]
    fn test_countdown_phrase_silent_seconds() {
        assert_eq!(countdown_phrase(4, 3, ""), None);
        assert_eq!(countdown_phrase(7200, 3, ""), None);
    }

    #[test]
    fn test_stopwatch_phrase() {
        assert_eq!(stopwatch_phrase(0, 3, ""), "");
        assert_eq!(stopwatch_phrase(2, 3, ""), "2");
        assert_eq!(stopwatch_phrase(40, 3, ""), "40 seconds");
        assert_eq!(stopwatch_phrase(180, 3, ""), "3 minutes");
        assert_eq!(stopwatch_phrase(3600, 3, ""), "one hour");
        assert_eq!(stopwatch_phrase(7200, 3, "up"), "up 2 hours");
        assert_eq!(stopwatch_phrase(61, 3, ""), "");
    }

    #[test]
    fn test_format_command() {
        assert_eq!(
            format_command("notify {0} '{1}' {0}", 5, "5 seconds"),
            "notify 5 '5 seconds' 5"
        );
    }

    #[test]
    fn test_silent_announcer_is_inactive() {
        let announcer = Announcer::silent();
        assert!(!announcer.is_active());
        announcer.countdown(5);
        announcer.stopwatch(5);
    }
}
