//! Scenario listing — `aurora-clarify scenarios` and `aurora-clarify show`.

use anyhow::Result;
use console::style;
use std::path::Path;

pub fn cmd_scenarios() {
    use aurora_clarify::scenario;

    println!();
    println!("{:<18} {:<20} Prompt", "Scenario", "Ambiguity");
    println!("{:<18} {:<20} ------", "--------", "---------");
    for s in scenario::all() {
        let first_line = s.prompt.lines().next().unwrap_or_default();
        let marker = if s.id == scenario::DEFAULT_SCENARIO_ID {
            style(" (default)").dim().to_string()
        } else {
            String::new()
        };
        println!(
            "{:<18} {:<20} {}{}",
            s.id,
            s.class.to_string(),
            first_line,
            marker
        );
    }
    println!();
}

pub fn cmd_show(project_dir: &Path, id: Option<&str>) -> Result<()> {
    use aurora_clarify::config::{AuroraToml, get_aurora_dir};
    use aurora_clarify::scenario;

    let requested = match id {
        Some(id) => id.to_string(),
        None => {
            AuroraToml::load_or_default(&get_aurora_dir(project_dir))?
                .demo
                .default_scenario
        }
    };
    let s = scenario::lookup(&requested);
    if s.id != requested {
        println!(
            "{}",
            style(format!(
                "Unknown scenario '{}'; showing '{}'",
                requested, s.id
            ))
            .yellow()
        );
    }

    println!();
    println!("{} {}", style(s.id).bold(), style(format!("[{}]", s.class)).dim());
    println!();
    println!("Prompt:");
    for line in s.prompt.lines() {
        println!("  {}", line);
    }
    println!();
    println!("Context sent to the gate:");
    for (i, statement) in s.context.iter().enumerate() {
        println!("  {}. {}", i + 1, statement);
    }
    println!();
    Ok(())
}
