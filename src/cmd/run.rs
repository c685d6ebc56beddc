//! Gate turns — `aurora-clarify run` and `aurora-clarify demo`.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use aurora_clarify::config::ClientConfig;
use aurora_clarify::ui::TerminalShell;
use aurora_clarify::{Driver, HttpGateClient, Phase, Turn};

use super::super::Cli;
use super::load_config;

fn build_driver(
    cli: &Cli,
    config: &ClientConfig,
    scenario_id: &str,
) -> Result<Driver<TerminalShell>> {
    let client = HttpGateClient::new(config.endpoint.clone(), config.timeout)?;
    if cli.verbose {
        println!(
            "{}",
            console::style(format!("Gate endpoint: {}", client.endpoint())).dim()
        );
    }
    Ok(Driver::new(Arc::new(client), TerminalShell::new(), scenario_id).with_spinner(cli.verbose))
}

pub async fn cmd_run(
    cli: &Cli,
    project_dir: &Path,
    scenario: Option<&str>,
    binding: Option<&str>,
) -> Result<()> {
    use aurora_clarify::scenario::is_registered;

    let config = load_config(cli, project_dir)?;
    let scenario_id = scenario.unwrap_or(&config.default_scenario);
    if !is_registered(scenario_id) {
        tracing::warn!(scenario = scenario_id, "unknown scenario, using default");
    }

    let mut driver = build_driver(cli, &config, scenario_id)?;
    let mut phase = driver.start().await;

    if phase == Phase::AwaitingClarification {
        let Some(binding) = binding else {
            let ids: Vec<&str> = driver
                .turn()
                .options()
                .iter()
                .map(|o| o.id.as_str())
                .collect();
            anyhow::bail!(
                "Clarification required. Rerun with --binding <{}>",
                ids.join("|")
            );
        };
        phase = driver.choose(binding).await?;
    } else if binding.is_some() && cli.verbose {
        println!(
            "{}",
            console::style("Gate did not ask for clarification; --binding ignored").dim()
        );
    }

    match (phase, driver.turn().failure()) {
        (Phase::TerminalError, Some(err)) => {
            anyhow::bail!("Gate turn ended in error ({})", err.kind())
        }
        (Phase::TerminalError, None) => anyhow::bail!("Gate turn ended in error"),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DemoAction {
    Start,
    Choose { id: String, label: String },
    Reset,
    ChangeScenario,
    Quit,
}

impl DemoAction {
    fn label(&self) -> String {
        match self {
            DemoAction::Start => "Start".to_string(),
            DemoAction::Choose { label, .. } => format!("Choose: {}", label),
            DemoAction::Reset => "Reset".to_string(),
            DemoAction::ChangeScenario => "Change scenario".to_string(),
            DemoAction::Quit => "Quit".to_string(),
        }
    }
}

/// Menu entries for the turn's current phase.
fn available_actions(turn: &Turn) -> Vec<DemoAction> {
    let phase = turn.phase();
    let mut actions = Vec::new();
    if phase == Phase::AwaitingClarification {
        actions.extend(turn.options().iter().map(|o| DemoAction::Choose {
            id: o.id.clone(),
            label: o.label.clone(),
        }));
        actions.push(DemoAction::Reset);
    } else {
        actions.push(DemoAction::Start);
        if phase.is_terminal() {
            actions.push(DemoAction::Reset);
        }
    }
    actions.push(DemoAction::ChangeScenario);
    actions.push(DemoAction::Quit);
    actions
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub async fn cmd_demo(cli: &Cli, project_dir: &Path) -> Result<()> {
    use aurora_clarify::scenario;
    use dialoguer::{Select, theme::ColorfulTheme};

    if !console::Term::stdout().is_term() {
        anyhow::bail!("The demo needs an interactive terminal. Use `aurora-clarify run` instead.");
    }

    let config = load_config(cli, project_dir)?;
    let mut driver = build_driver(cli, &config, &config.default_scenario)?;
    driver.show_scenario();

    let theme = ColorfulTheme::default();
    loop {
        let actions = available_actions(driver.turn());
        let labels: Vec<String> = actions.iter().map(DemoAction::label).collect();
        let prompt = match driver.turn().phase() {
            Phase::AwaitingClarification => "Pick a binding".to_string(),
            phase => format!("{} [{}]", driver.turn().scenario().id, phase),
        };

        let selection = Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact()?;

        match &actions[selection] {
            DemoAction::Start => {
                driver.start_until(ctrl_c()).await;
            }
            DemoAction::Choose { id, .. } => {
                driver.choose_until(id, ctrl_c()).await?;
            }
            DemoAction::Reset => driver.reset(),
            DemoAction::ChangeScenario => {
                let scenarios = scenario::all();
                let items: Vec<String> = scenarios
                    .iter()
                    .map(|s| format!("{} ({})", s.id, s.class))
                    .collect();
                let current = scenarios
                    .iter()
                    .position(|s| s.id == driver.turn().scenario().id)
                    .unwrap_or(0);
                let picked = Select::with_theme(&theme)
                    .with_prompt("Scenario")
                    .items(&items)
                    .default(current)
                    .interact()?;
                driver.change_scenario(scenarios[picked].id);
            }
            DemoAction::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_clarify::gate::GateResponse;
    use serde_json::json;

    fn finish(turn: &mut Turn, body: serde_json::Value) {
        let ticket = turn.start().call.unwrap();
        turn.complete(&ticket, Ok(GateResponse::from_value(body).unwrap()));
    }

    #[test]
    fn test_idle_turn_offers_start_without_reset() {
        let turn = Turn::new("bird_missing_v1");
        assert_eq!(
            available_actions(&turn),
            vec![DemoAction::Start, DemoAction::ChangeScenario, DemoAction::Quit]
        );
    }

    #[test]
    fn test_awaiting_turn_offers_bindings_in_order() {
        let mut turn = Turn::new("bird_missing_v1");
        finish(
            &mut turn,
            json!({
                "status": "STOP",
                "question": "Which bird?",
                "options": ["james", {"id": "jenny", "label": "Jenny's bird"}]
            }),
        );
        let actions = available_actions(&turn);
        assert_eq!(
            actions[..3],
            [
                DemoAction::Choose {
                    id: "james".into(),
                    label: "james".into()
                },
                DemoAction::Choose {
                    id: "jenny".into(),
                    label: "Jenny's bird".into()
                },
                DemoAction::Reset,
            ]
        );
        assert!(!actions.contains(&DemoAction::Start));
    }

    #[test]
    fn test_finished_turn_offers_restart_and_reset() {
        let mut turn = Turn::new("trophy_v1");
        finish(&mut turn, json!({"status": "NOPE"}));
        assert!(turn.phase().is_terminal());
        assert_eq!(
            available_actions(&turn),
            vec![
                DemoAction::Start,
                DemoAction::Reset,
                DemoAction::ChangeScenario,
                DemoAction::Quit
            ]
        );
    }
}
