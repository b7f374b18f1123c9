use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

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

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}

impl ConfigLogic {
    /// The effective configuration (file values plus overrides) as YAML.
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("📄 Current configuration:\n");
        println!("{}", yaml);
        Ok(())
    }

    /// Report keys missing from the file. Returns how many are missing.
    pub fn check(path: &Path) -> AppResult<usize> {
        if !path.exists() {
            warning(format!("No configuration file at {}; defaults are in use.", path.display()));
            return Ok(0);
        }

        let missing = missing_keys(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!(
                "Missing keys: {} (run `config --migrate` to add them)",
                missing.join(", ")
            ));
        }
        Ok(missing.len())
    }

    pub fn migrate(path: &Path) -> AppResult<usize> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist, run `init` first",
                path.display()
            )));
        }
        let added = migrate_config_file(path)?;
        if added == 0 {
            info("Configuration already up to date.");
        }
        Ok(added)
    }

    /// Open the file in `editor`, falling back to $EDITOR / $VISUAL / nano.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let fallback = default_editor();
        let requested = editor.map(str::to_string).unwrap_or_else(|| fallback.clone());

        if run_editor(&requested, path) {
            success(format!("Configuration file edited using '{}'", requested));
            return Ok(());
        }

        warning(format!(
            "Editor '{}' not available, falling back to '{}'",
            requested, fallback
        ));
        if requested != fallback && run_editor(&fallback, path) {
            success(format!("Configuration file edited using '{}'", fallback));
            return Ok(());
        }

        Err(AppError::Config(format!("could not open {} in an editor", path.display())))
    }
}
