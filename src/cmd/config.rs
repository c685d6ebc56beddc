//! Configuration view and validation commands — `aurora-clarify config`.

use anyhow::Result;

use super::super::{Cli, ConfigCommands};
use super::load_config;

pub fn cmd_config(
    cli: &Cli,
    project_dir: &std::path::Path,
    command: Option<ConfigCommands>,
) -> Result<()> {
    use aurora_clarify::config::{AuroraToml, CONFIG_FILE, get_aurora_dir};

    match command {
        None | Some(ConfigCommands::Show) => {
            let effective = load_config(cli, project_dir)?;
            let config_path = &effective.config_path;
            let toml = &effective.toml;

            println!();
            println!("Aurora Configuration");
            println!("====================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No aurora.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();

            println!("[gate]");
            println!("  endpoint = \"{}\"", toml.gate.endpoint);
            println!("  timeout_secs = {}", toml.gate.timeout_secs);
            println!();
            println!("[demo]");
            println!("  default_scenario = \"{}\"", toml.demo.default_scenario);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  endpoint = \"{}\"", effective.endpoint);
            match effective.timeout {
                Some(timeout) => println!("  timeout = {}s", timeout.as_secs()),
                None => println!("  timeout = none"),
            }
            println!("  default_scenario = \"{}\"", effective.default_scenario);
            println!();

            if !config_path.exists() {
                println!("Run 'aurora-clarify config init' to create an aurora.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            let effective = load_config(cli, project_dir)?;

            println!();
            println!("Validating configuration...");
            println!();

            if !effective.config_path.exists() {
                println!("No aurora.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = effective.toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            let aurora_dir = get_aurora_dir(project_dir);
            let config_path = aurora_dir.join(CONFIG_FILE);
            if config_path.exists() {
                println!("aurora.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !aurora_dir.exists() {
                std::fs::create_dir_all(&aurora_dir)?;
            }

            AuroraToml::default().save(&config_path)?;

            println!("Created aurora.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [gate] endpoint, timeout_secs");
            println!("  - [demo] default_scenario");
            println!();
        }
    }

    Ok(())
}
