//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Countdown timer, stopwatch and clock for your terminal
#[derive(Parser, Debug)]
#[command(name = "termdown")]
#[command(version, about = "Countdown timer and stopwatch in your terminal", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Duration ("1h 5m", "90") or point in time ("14:30", "2027-01-01 9am");
    /// runs a stopwatch when omitted
    #[arg(value_name = "TIME")]
    pub time: Option<String>,

    /// Use colon-separated time format
    #[arg(short, long)]
    pub alt_format: bool,

    /// Flash terminal at end of countdown
    #[arg(short, long)]
    pub blink: bool,

    /// Don't ring terminal bell at end of countdown
    #[arg(short = 'B', long)]
    pub no_bell: bool,

    /// Draw final N seconds in red and announce them individually (default 3)
    #[arg(short, long, value_name = "N")]
    pub critical: Option<i64>,

    /// Display target datetime of unpaused countdown
    #[arg(short, long)]
    pub end: bool,

    /// Add TEXT to the beginning of voice and exec annunciations
    #[arg(short = 'p', long, value_name = "TEXT")]
    pub voice_prefix: Option<String>,

    /// Quit N seconds after countdown (use with -b or -t) or terminate
    /// stopwatch after N seconds
    #[arg(short, long, value_name = "N")]
    pub quit_after: Option<f64>,

    /// Don't show seconds (except for the last minute of a countdown and the
    /// first minute of a stopwatch)
    #[arg(short = 's', long)]
    pub no_seconds: bool,

    /// Text to display at end of countdown
    #[arg(short, long)]
    pub text: Option<String>,

    /// Text to display on top of countdown/stopwatch
    #[arg(short = 'T', long)]
    pub title: Option<String>,

    /// Don't update the terminal window title
    #[arg(short = 'W', long)]
    pub no_window_title: bool,

    /// Spoken countdown (requires `say` or `espeak`; VOICE as listed by them)
    #[arg(short, long, conflicts_with = "exec_cmd")]
    pub voice: Option<String>,

    /// File to write current remaining/elapsed time to
    #[arg(short, long, value_name = "PATH")]
    pub outfile: Option<PathBuf>,

    /// Shell command run every second; {0} is replaced by the number of seconds,
    /// {1} by the annunciation text
    #[arg(long, value_name = "CMD")]
    pub exec_cmd: Option<String>,

    /// Don't use big text art for display
    #[arg(long)]
    pub no_art: bool,

    /// Don't convert text to ASCII-friendly characters
    #[arg(long)]
    pub no_text_magic: bool,

    /// Show current time instead of countdown
    #[arg(short = 'z', long = "time")]
    pub clock: bool,

    /// Format for the current time and the countdown end time (strftime)
    #[arg(short = 'Z', long, value_name = "FORMAT")]
    pub time_format: Option<String>,

    /// Format for the date prefixed to end times on another day (strftime)
    #[arg(short = 'D', long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a debug log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create a default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["termdown"]);
        assert!(args.time.is_none());
        assert!(args.command.is_none());
        assert!(!args.alt_format);
        assert!(!args.blink);
        assert!(args.critical.is_none());
        assert!(args.quit_after.is_none());
        assert!(!args.clock);
        assert!(args.voice.is_none());
        assert!(args.exec_cmd.is_none());
    }

    #[test]
    fn test_args_countdown_with_flags() {
        let args = Args::parse_from([
            "termdown", "-b", "-c", "10", "-T", "Tea", "-t", "Done!", "-q", "2.5", "5m",
        ]);
        assert_eq!(args.time.as_deref(), Some("5m"));
        assert!(args.blink);
        assert_eq!(args.critical, Some(10));
        assert_eq!(args.title.as_deref(), Some("Tea"));
        assert_eq!(args.text.as_deref(), Some("Done!"));
        assert_eq!(args.quit_after, Some(2.5));
    }

    #[test]
    fn test_args_time_with_spaces() {
        let args = Args::parse_from(["termdown", "1h 30m"]);
        assert_eq!(args.time.as_deref(), Some("1h 30m"));
    }

    #[test]
    fn test_args_clock_mode() {
        let args = Args::parse_from(["termdown", "-z", "-Z", "%H:%M"]);
        assert!(args.clock);
        assert_eq!(args.time_format.as_deref(), Some("%H:%M"));
    }

    #[test]
    fn test_args_voice_conflicts_with_exec_cmd() {
        let result = Args::try_parse_from(["termdown", "-v", "alex", "--exec-cmd", "echo {0}", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_config_subcommand() {
        let args = Args::parse_from(["termdown", "config", "init"]);
        match args.command {
            Some(Command::Config { action }) => assert_eq!(action, ConfigAction::Init),
            None => panic!("expected config subcommand"),
        }
    }

    #[test]
    fn test_args_custom_config_path() {
        let args = Args::parse_from(["termdown", "--config", "/tmp/termdown.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/termdown.toml")));
    }
}
