//! Configuration file handling and the merged runtime settings.
//!
//! Loads configuration from `~/.config/termdown/config.toml` or a custom path,
//! then merges it with the command line into immutable [`Settings`].

use chrono::{DateTime, Utc};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::{ConfigError, TimerError};
use crate::format::normalize_text;
use crate::mirror::MirrorFile;
use crate::timespec::{is_valid_format, TimeSpec};

pub const DEFAULT_CRITICAL: i64 = 3;
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
pub const DEFAULT_TIME_FORMAT_NO_SECONDS: &str = "%H:%M";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Configuration file structure for termdown.
/// Loaded from ~/.config/termdown/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub alt_format: bool,
    #[serde(default)]
    pub blink: bool,
    #[serde(default)]
    pub no_bell: bool,
    #[serde(default)]
    pub no_art: bool,
    #[serde(default)]
    pub no_window_title: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct VoiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_cmd: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct LogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                path: path.clone(),
                source: e,
            })?;
            let config: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(ConfigFile::default())
        }
    }

    /// A commented starting point for `termdown config init`.
    pub fn template() -> String {
        let defaults = ConfigFile {
            display: DisplayConfig {
                critical: Some(DEFAULT_CRITICAL),
                time_format: Some(DEFAULT_TIME_FORMAT.to_string()),
                date_format: Some(DEFAULT_DATE_FORMAT.to_string()),
                ..Default::default()
            },
            voice: VoiceConfig::default(),
            log: LogConfig {
                file: None,
                level: Some("info".to_string()),
            },
        };
        let body = toml::to_string_pretty(&defaults).unwrap_or_default();
        format!("# termdown configuration\n# Command-line options override these values.\n\n{}", body)
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("termdown").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/termdown/config.toml")
        })
}

/// What the timer shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Stopwatch,
    Countdown(TimeSpec),
    Clock,
}

/// Effective settings, read-only for the whole run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub alt_format: bool,
    pub no_seconds: bool,
    pub critical: i64,
    pub blink: bool,
    pub no_bell: bool,
    pub quit_after: Option<f64>,
    /// Shown when a countdown finishes (already ASCII-normalized)
    pub text: Option<String>,
    pub title: Option<String>,
    /// Start with the countdown end time visible
    pub show_end: bool,
    pub time_format: String,
    pub date_format: String,
    pub voice: Option<String>,
    pub exec_cmd: Option<String>,
    pub voice_prefix: String,
    pub outfile: Option<PathBuf>,
    pub no_window_title: bool,
    pub no_art: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mode: Mode::Stopwatch,
            alt_format: false,
            no_seconds: false,
            critical: DEFAULT_CRITICAL,
            blink: false,
            no_bell: false,
            quit_after: None,
            text: None,
            title: None,
            show_end: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            voice: None,
            exec_cmd: None,
            voice_prefix: String::new(),
            outfile: None,
            no_window_title: false,
            no_art: false,
            log_file: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl Settings {
    /// Merge command line and config file, validating everything that can be
    /// checked before the terminal is taken over.
    ///
    /// Command-line values win over the file; boolean flags are OR-ed.
    pub fn resolve(args: &Args, file: &ConfigFile, now: DateTime<Utc>) -> Result<Self, TimerError> {
        let mode = if args.clock {
            Mode::Clock
        } else if let Some(text) = &args.time {
            Mode::Countdown(TimeSpec::new(text.clone(), now)?)
        } else {
            Mode::Stopwatch
        };

        let voice = args.voice.clone().or_else(|| file.voice.name.clone());
        let exec_cmd = args.exec_cmd.clone().or_else(|| file.voice.exec_cmd.clone());
        if voice.is_some() && exec_cmd.is_some() {
            return Err(ConfigError::VoiceAndExec.into());
        }

        let no_seconds = args.no_seconds;
        let time_format = args
            .time_format
            .clone()
            .or_else(|| file.display.time_format.clone())
            .unwrap_or_else(|| {
                if no_seconds {
                    DEFAULT_TIME_FORMAT_NO_SECONDS.to_string()
                } else {
                    DEFAULT_TIME_FORMAT.to_string()
                }
            });
        let date_format = args
            .date_format
            .clone()
            .or_else(|| file.display.date_format.clone())
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
        for (kind, format) in [("time", &time_format), ("date", &date_format)] {
            if !is_valid_format(format) {
                return Err(ConfigError::InvalidFormat {
                    kind,
                    format: format.clone(),
                }
                .into());
            }
        }

        if let Some(path) = &args.outfile {
            MirrorFile::validate(path)?;
        }

        let text = args.text.as_ref().map(|t| {
            if args.no_text_magic {
                t.clone()
            } else {
                normalize_text(t)
            }
        });

        let log_level = match &file.log.level {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?,
            None => LevelFilter::Info,
        };

        Ok(Settings {
            mode,
            alt_format: args.alt_format || file.display.alt_format,
            no_seconds,
            critical: args
                .critical
                .or(file.display.critical)
                .unwrap_or(DEFAULT_CRITICAL),
            blink: args.blink || file.display.blink,
            no_bell: args.no_bell || file.display.no_bell,
            quit_after: args.quit_after,
            text,
            title: args.title.clone(),
            show_end: args.end,
            time_format,
            date_format,
            voice,
            exec_cmd,
            voice_prefix: args
                .voice_prefix
                .clone()
                .or_else(|| file.voice.prefix.clone())
                .unwrap_or_default(),
            outfile: args.outfile.clone(),
            no_window_title: args.no_window_title || file.display.no_window_title,
            no_art: args.no_art || file.display.no_art,
            log_file: args.log_file.clone().or_else(|| file.log.file.clone()),
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2027, 7, 15, 12, 0, 0).unwrap()
    }

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["termdown"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[display]\nblink = true\ncritical = 10\n\n[voice]\nprefix = \"Tea\"\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigFile::load(Some(&path)).unwrap();
        assert!(config.display.blink);
        assert_eq!(config.display.critical, Some(10));
        assert_eq!(config.voice.prefix.as_deref(), Some("Tea"));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\nblink = ").unwrap();
        assert!(matches!(
            ConfigFile::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_template_parses_back() {
        let parsed: ConfigFile = toml::from_str(&ConfigFile::template()).unwrap();
        assert_eq!(parsed.display.critical, Some(DEFAULT_CRITICAL));
        assert_eq!(parsed.display.time_format.as_deref(), Some(DEFAULT_TIME_FORMAT));
    }

    #[test]
    fn test_resolve_modes() {
        let file = ConfigFile::default();
        let s = Settings::resolve(&args(&[]), &file, now()).unwrap();
        assert_eq!(s.mode, Mode::Stopwatch);

        let s = Settings::resolve(&args(&["-z"]), &file, now()).unwrap();
        assert_eq!(s.mode, Mode::Clock);

        let s = Settings::resolve(&args(&["90"]), &file, now()).unwrap();
        match s.mode {
            Mode::Countdown(spec) => assert_eq!(spec.text(), "90"),
            other => panic!("expected countdown, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_rejects_bad_time() {
        let err = Settings::resolve(&args(&["soonish"]), &ConfigFile::default(), now()).unwrap_err();
        assert!(matches!(err, TimerError::Parse(_)));
    }

    #[test]
    fn test_resolve_command_line_wins() {
        let mut file = ConfigFile::default();
        file.display.critical = Some(10);
        file.display.time_format = Some("%H.%M".to_string());

        let s = Settings::resolve(&args(&["-c", "5"]), &file, now()).unwrap();
        assert_eq!(s.critical, 5);
        assert_eq!(s.time_format, "%H.%M");

        let s = Settings::resolve(&args(&["-Z", "%I:%M"]), &file, now()).unwrap();
        assert_eq!(s.critical, 10);
        assert_eq!(s.time_format, "%I:%M");
    }

    #[test]
    fn test_resolve_flags_are_ored() {
        let mut file = ConfigFile::default();
        file.display.blink = true;
        let s = Settings::resolve(&args(&["-B"]), &file, now()).unwrap();
        assert!(s.blink);
        assert!(s.no_bell);
    }

    #[test]
    fn test_resolve_no_seconds_time_format() {
        let s = Settings::resolve(&args(&["-s"]), &ConfigFile::default(), now()).unwrap();
        assert_eq!(s.time_format, DEFAULT_TIME_FORMAT_NO_SECONDS);
    }

    #[test]
    fn test_resolve_voice_from_file_conflicts_with_exec() {
        let mut file = ConfigFile::default();
        file.voice.name = Some("alex".to_string());
        let err = Settings::resolve(&args(&["--exec-cmd", "echo {0}"]), &file, now()).unwrap_err();
        assert!(matches!(err, TimerError::Config(ConfigError::VoiceAndExec)));
    }

    #[test]
    fn test_resolve_invalid_format() {
        let err = Settings::resolve(&args(&["-D", "%Q"]), &ConfigFile::default(), now()).unwrap_err();
        assert!(matches!(
            err,
            TimerError::Config(ConfigError::InvalidFormat { kind: "date", .. })
        ));
    }

    #[test]
    fn test_resolve_invalid_log_level() {
        let mut file = ConfigFile::default();
        file.log.level = Some("loud".to_string());
        let err = Settings::resolve(&args(&[]), &file, now()).unwrap_err();
        assert!(matches!(err, TimerError::Config(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_resolve_text_magic() {
        let file = ConfigFile::default();
        let s = Settings::resolve(&args(&["-t", "Tschüß", "10"]), &file, now()).unwrap();
        assert_eq!(s.text.as_deref(), Some("Tschuess"));

        let s = Settings::resolve(&args(&["--no-text-magic", "-t", "Tschüß", "10"]), &file, now())
            .unwrap();
        assert_eq!(s.text.as_deref(), Some("Tschüß"));
    }

    #[test]
    fn test_resolve_existing_outfile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "").unwrap();
        let path_str = path.to_str().unwrap();
        let err = Settings::resolve(&args(&["-o", path_str]), &ConfigFile::default(), now())
            .unwrap_err();
        assert!(matches!(err, TimerError::Config(ConfigError::OutfileExists(_))));
    }
}
