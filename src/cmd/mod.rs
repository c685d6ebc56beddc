//! CLI command implementations.
//!
//! | Module      | Commands handled        |
//! |-------------|-------------------------|
//! | `scenarios` | `Scenarios`, `Show`     |
//! | `run`       | `Run`, `Demo`           |
//! | `config`    | `Config`                |

pub mod config;
pub mod run;
pub mod scenarios;

pub use config::cmd_config;
pub use run::{cmd_demo, cmd_run};
pub use scenarios::{cmd_scenarios, cmd_show};

use anyhow::Result;
use std::path::Path;

use super::Cli;

/// Resolve the effective client configuration for a command.
pub(crate) fn load_config(
    cli: &Cli,
    project_dir: &Path,
) -> Result<aurora_clarify::config::ClientConfig> {
    use aurora_clarify::config::{ClientConfig, CliOverrides};

    let overrides = CliOverrides {
        endpoint: cli.endpoint.clone(),
        timeout_secs: cli.timeout_secs,
    };
    ClientConfig::load(project_dir, &overrides)
}
