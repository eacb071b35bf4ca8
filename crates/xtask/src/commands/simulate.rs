//! Run a scripted combat scenario
//!
//! Loads the enemy table, config and a scenario from the content directory,
//! executes the scenario script through the runtime and saves the session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;

use combat_content::{ContentFactory, Scenario, ScenarioLoader};
use combat_core::CombatEvent;
use combat_runtime::{CombatRuntime, SessionManifest, new_session_id};

/// Run a scripted combat scenario
#[derive(Parser, Debug)]
pub struct Simulate {
    /// Scenario name (from `<content>/scenarios/`) or path to a `.ron` file
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Content directory (defaults to CONTENT_DATA_DIR or the bundled data)
    #[arg(long, value_name = "DIR")]
    content_dir: Option<PathBuf>,

    /// Save directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Session ID to save under (defaults to session_<millis>)
    #[arg(short, long, value_name = "SESSION")]
    session: Option<String>,

    /// Do not write anything to disk
    #[arg(long)]
    no_save: bool,

    /// Print every domain event as it happens
    #[arg(short, long)]
    narrate: bool,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let factory = match &self.content_dir {
            Some(dir) => ContentFactory::new(dir),
            None => ContentFactory::from_env(),
        };
        let table = factory.load_enemies()?;
        let config = factory.load_config()?;
        let scenario = self.load_scenario(&factory)?;

        let session = scenario.build_session(&table, &config)?;
        let session_id = self.session.clone().unwrap_or_else(new_session_id);

        let mut builder = CombatRuntime::builder()
            .session_id(&session_id)
            .scenario(&scenario.name);
        if !self.no_save {
            builder = builder.persist_to(crate::utils::catalog(self.data_dir.clone()));
        }
        let mut runtime = builder.build(session)?;

        println!(
            "{} {} ({} enemies, table v{})",
            style("Scenario:").bold().cyan(),
            scenario.name,
            scenario.enemies.len(),
            runtime.session().state().table_version
        );
        println!();

        let commands = scenario.commands();
        let mut printed = runtime.session().state().events.len();
        for (step, command) in commands.iter().enumerate() {
            let result = runtime.execute(command);
            if self.narrate {
                for event in runtime.session().state().events.since(printed) {
                    print_event(event);
                }
                printed = runtime.session().state().events.len();
            }
            if let Err(err) = result {
                println!(
                    "{} step {} ({}): {}",
                    style("✗").red().bold(),
                    step,
                    command.kind(),
                    err
                );
                let manifest = runtime.close()?;
                bail!(
                    "scenario '{}' stopped after {} commands",
                    scenario.name,
                    manifest.commands
                );
            }
        }

        let manifest = runtime.close()?;
        print_summary(&manifest);

        if !self.no_save {
            let catalog = crate::utils::catalog(self.data_dir);
            println!(
                "{} {}",
                style("Saved:").bold().cyan(),
                catalog.session(&session_id).dir().display()
            );
        }

        if let Some(expected) = scenario.expect
            && manifest.outcome != Some(expected)
        {
            bail!(
                "expected outcome {}, got {}",
                expected,
                manifest
                    .outcome
                    .map_or_else(|| "none".to_owned(), |outcome| outcome.to_string())
            );
        }
        Ok(())
    }

    fn load_scenario(&self, factory: &ContentFactory) -> Result<Scenario> {
        let path = Path::new(&self.scenario);
        if path.extension().is_some_and(|ext| ext == "ron") {
            return ScenarioLoader::load(path)
                .with_context(|| format!("Failed to load scenario {}", path.display()));
        }
        factory.load_scenario(&self.scenario)
    }
}

fn print_event(event: &CombatEvent) {
    println!("  {} {}", style("•").dim(), event);
}

fn print_summary(manifest: &SessionManifest) {
    println!();
    let outcome = manifest
        .outcome
        .map_or_else(|| "unresolved".to_owned(), |outcome| outcome.to_string());
    println!("{} {}", style("Outcome:").bold().cyan(), style(outcome).bold());
    println!("{} {}", style("Fame:").bold().cyan(), manifest.fame);
    println!("{} {}", style("Commands:").bold().cyan(), manifest.commands);
    if let Some(root) = &manifest.final_root {
        println!("{} {}", style("State root:").bold().cyan(), root);
    }
}
