use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, success, warning};
use std::path::Path;
use std::process::Command;

/// `$EDITOR`, then `$VISUAL`, then the platform default.
fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn open_in(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    if *print_config {
        println!("📄 Configuration ({}):\n", Config::config_file().display());
        println!("{}", cfg.to_yaml()?);
    }

    if *edit_config {
        let path = Config::config_file();
        let fallback = default_editor();
        let chosen = editor.clone().unwrap_or_else(|| fallback.clone());

        if open_in(&chosen, &path) {
            success(format!("Configuration edited with '{chosen}'"));
        } else if chosen != fallback && open_in(&fallback, &path) {
            warning(format!("Editor '{chosen}' not available, used '{fallback}'"));
        } else {
            error(format!("Could not open {} in an editor", path.display()));
        }

        // an edit that no longer parses is reported right away
        Config::load()?;
    }

    Ok(())
}
