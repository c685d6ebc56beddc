//! Layered configuration for the gate client.
//!
//! Settings come from `.aurora/aurora.toml`, then environment variables, then
//! CLI flags, each layer overriding the previous one.
//!
//! # Configuration File Format
//!
//! ```toml
//! [gate]
//! endpoint = "https://aurora-clarify.milamba.workers.dev"
//! timeout_secs = 30
//!
//! [demo]
//! default_scenario = "bird_missing_v1"
//! ```
//!
//! | Setting | Environment | CLI |
//! |---------|-------------|-----|
//! | `gate.endpoint` | `AURORA_GATE_URL` | `--endpoint` |
//! | `gate.timeout_secs` | `AURORA_GATE_TIMEOUT_SECS` | `--timeout-secs` |
//!
//! A `timeout_secs` of 0 disables the client-side timeout.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scenario;

pub const DEFAULT_ENDPOINT: &str = "https://aurora-clarify.milamba.workers.dev";
pub const ENDPOINT_ENV: &str = "AURORA_GATE_URL";
pub const TIMEOUT_ENV: &str = "AURORA_GATE_TIMEOUT_SECS";
pub const CONFIG_FILE: &str = "aurora.toml";

/// `[gate]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[demo]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSection {
    #[serde(default = "default_scenario")]
    pub default_scenario: String,
}

fn default_scenario() -> String {
    scenario::DEFAULT_SCENARIO_ID.to_string()
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            default_scenario: default_scenario(),
        }
    }
}

/// Contents of `aurora.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuroraToml {
    #[serde(default)]
    pub gate: GateSection,
    #[serde(default)]
    pub demo: DemoSection,
}

impl AuroraToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse aurora.toml")
    }

    /// Load `aurora.toml` from `aurora_dir`, or defaults when it does not exist.
    pub fn load_or_default(aurora_dir: &Path) -> Result<Self> {
        let config_path = aurora_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize aurora.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Human-readable warnings; empty when the file is sound.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let endpoint = self.gate.endpoint.as_str();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            warnings.push(format!(
                "gate.endpoint '{}' is not an http(s) URL",
                self.gate.endpoint
            ));
        }
        if self.gate.timeout_secs == 0 {
            warnings.push("gate.timeout_secs is 0; calls will never time out".to_string());
        }
        if !scenario::is_registered(&self.demo.default_scenario) {
            warnings.push(format!(
                "demo.default_scenario '{}' is not registered; '{}' will be used",
                self.demo.default_scenario,
                scenario::DEFAULT_SCENARIO_ID
            ));
        }
        warnings
    }
}

pub fn get_aurora_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(".aurora")
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Effective client configuration after all layers are applied.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub config_path: PathBuf,
    pub toml: AuroraToml,
    pub endpoint: String,
    pub timeout: Option<Duration>,
    pub default_scenario: String,
}

impl ClientConfig {
    /// Resolve configuration for `project_dir` against the process environment.
    pub fn load(project_dir: &Path, overrides: &CliOverrides) -> Result<Self> {
        let aurora_dir = get_aurora_dir(project_dir);
        let toml = AuroraToml::load_or_default(&aurora_dir)?;
        let mut config = Self::resolve(toml, |key| std::env::var(key).ok(), overrides)?;
        config.config_path = aurora_dir.join(CONFIG_FILE);
        Ok(config)
    }

    /// Apply environment (via `env`) and CLI overrides on top of `toml`.
    pub fn resolve(
        toml: AuroraToml,
        env: impl Fn(&str) -> Option<String>,
        overrides: &CliOverrides,
    ) -> Result<Self> {
        let endpoint = overrides
            .endpoint
            .clone()
            .or_else(|| env(ENDPOINT_ENV).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| toml.gate.endpoint.clone());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"))?,
                None => toml.gate.timeout_secs,
            },
        };
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let default_scenario = scenario::lookup(&toml.demo.default_scenario).id.to_string();

        Ok(Self {
            config_path: PathBuf::from(CONFIG_FILE),
            toml,
            endpoint,
            timeout,
            default_scenario,
        })
    }
}
