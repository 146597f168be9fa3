//! Handlers for the config subcommand.

use std::path::Path;

use super::args::ConfigAction;
use crate::config::ConfigFile;

/// Handle config subcommand actions, returning the process exit code.
pub fn handle_config_action(action: ConfigAction, config_path: &Path) -> i32 {
    match action {
        ConfigAction::Show => {
            let config = match ConfigFile::load(Some(config_path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return 2;
                }
            };

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found, using defaults)", config_path.display());
            }
            println!();
            match toml::to_string_pretty(&config) {
                Ok(text) => print!("{}", text),
                Err(e) => {
                    eprintln!("Error rendering configuration: {}", e);
                    return 1;
                }
            }
            0
        }
        ConfigAction::Init => match init_config(config_path) {
            Ok(()) => {
                println!("Created config file: {}", config_path.display());
                0
            }
            Err(message) => {
                eprintln!("{}", message);
                1
            }
        },
    }
}

fn init_config(config_path: &Path) -> Result<(), String> {
    if config_path.exists() {
        return Err(format!(
            "Config file already exists: {}\nUse 'termdown config show' to view current settings.",
            config_path.display()
        ));
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating config directory: {}", e))?;
    }
    std::fs::write(config_path, ConfigFile::template())
        .map_err(|e| format!("Error writing config file: {}", e))
}
