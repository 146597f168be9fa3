use clap::Parser;
use std::path::Path;
use std::process;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use termdown::announce::Announcer;
use termdown::cli::{self, Args, Command};
use termdown::clock::{Clock, SystemClock};
use termdown::config::{self, ConfigFile, Settings};
use termdown::error::TimerError;
use termdown::events::{Event, EventQueue};
use termdown::input::InputReader;
use termdown::logging;
use termdown::mirror::MirrorFile;
use termdown::modes::{self, Outcome, Session, TickSource};
use termdown::terminal::{self, Display, RawModeGuard};

/// Exit status for bad arguments, unparseable TIME values and config problems.
const EXIT_STARTUP_ERROR: i32 = 2;

fn main() {
    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(config::default_path);

    if let Some(Command::Config { action }) = args.command {
        process::exit(cli::handle_config_action(action, &config_path));
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let settings = match load_settings(&args, &config_path, clock.now()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_STARTUP_ERROR);
        }
    };

    match run(&settings, clock) {
        Ok(outcome) => {
            if let Outcome::Stopwatch(report) = &outcome {
                eprint!("{}", cli::format_report(report));
            }
            process::exit(outcome.exit_code());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_STARTUP_ERROR);
        }
    }
}

fn load_settings(
    args: &Args,
    config_path: &Path,
    now: DateTime<Utc>,
) -> Result<Settings, TimerError> {
    let file = ConfigFile::load(Some(config_path))?;
    let settings = Settings::resolve(args, &file, now)?;
    logging::init(settings.log_file.as_deref(), settings.log_level)?;
    log::debug!("Settings: {:?}", settings);
    Ok(settings)
}

/// Take over the terminal, run the selected mode and clean up after it.
fn run(settings: &Settings, clock: Arc<dyn Clock>) -> Result<Outcome, TimerError> {
    let events = EventQueue::new();
    let interrupt = events.sender();
    ctrlc::set_handler(move || {
        interrupt.put(Event::Interrupt);
    })?;

    let mirror = settings
        .outfile
        .as_deref()
        .map(MirrorFile::validate)
        .transpose()?;
    let announcer = Announcer::new(settings);

    let terminal = terminal::shared_stdout();
    let mut guard = RawModeGuard::enter()?;
    let display = Display::new(terminal.clone(), settings);
    let mut input = InputReader::spawn(terminal, events.sender())?;

    let session = Session {
        settings,
        clock,
        events: &events,
        screen: &display,
        mirror: mirror.as_ref(),
        announcer: &announcer,
        ticks: TickSource::Metronome,
    };
    let result = modes::run(&session);

    input.stop();
    display.clear_title();
    if let Some(mirror) = &mirror {
        mirror.remove();
    }
    if let Err(e) = guard.exit() {
        log::warn!("Failed to restore terminal: {}", e);
    }
    result
}
