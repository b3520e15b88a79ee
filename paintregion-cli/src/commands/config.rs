//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for locating,
//! viewing and creating the brush configuration file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use paintregion::config::BrushConfig;

use super::common::{load_brush_config, require_config_path};
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show {
        /// Configuration file to read instead of the default
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show { config } => run_show(config.as_deref()),
        ConfigCommands::Init { force } => run_init(&require_config_path()?, force),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    let path = require_config_path()?;
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist, defaults are used)");
    }
    Ok(())
}

/// Show the effective configuration.
fn run_show(explicit: Option<&Path>) -> Result<(), CliError> {
    let config = load_brush_config(explicit)?;

    println!("Configuration Settings");
    println!("======================");
    for line in render(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// Write default configuration to `path`.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "Configuration file {} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    BrushConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Format the configuration section by section.
fn render(config: &BrushConfig) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "[brush]".to_string(),
        format!("  radius = {}", config.radius),
        format!("  min_radius = {}", config.min_radius),
        format!("  max_radius = {}", config.max_radius),
        format!("  steps = {}", config.steps),
    ];
    for (name, style) in [
        ("draw", &config.draw_style),
        ("erase", &config.erase_style),
        ("layer", &config.layer_style),
    ] {
        lines.push(String::new());
        lines.push(format!("[{}]", name));
        lines.push(format!("  color = {}", style.color));
        lines.push(format!("  weight = {}", style.weight));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_all_sections() {
        let lines = render(&BrushConfig::default());

        for section in ["[brush]", "[draw]", "[erase]", "[layer]"] {
            assert!(lines.iter().any(|l| l == section), "missing {}", section);
        }
        assert!(lines.contains(&"  radius = 30".to_string()));
        assert!(lines.contains(&"  color = #ff324a".to_string()));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        run_init(&path, false).unwrap();
        assert_eq!(BrushConfig::load(&path).unwrap(), BrushConfig::default());

        assert!(matches!(run_init(&path, false), Err(CliError::Config(_))));
        assert!(run_init(&path, true).is_ok());
    }
}
