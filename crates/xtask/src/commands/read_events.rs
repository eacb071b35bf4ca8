//! Read and inspect saved event logs
//!
//! Deserializes `events.log` of a session and displays its contents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;

use combat_runtime::{CommandEvent, Event, SessionEvent, Topic};

use crate::utils;

/// Read and inspect saved event logs
#[derive(Parser)]
pub struct ReadEvents {
    /// Session ID to read events from (e.g., session_1762685005123)
    /// If not provided, uses the most recent session
    #[arg(short, long, value_name = "SESSION")]
    session: Option<String>,

    /// Custom save directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Only show events of this topic
    #[arg(short, long, value_enum)]
    topic: Option<TopicArg>,

    /// Limit number of events to display (0 = unlimited)
    #[arg(short, long, default_value = "0")]
    limit: usize,

    /// Skip first N events
    #[arg(long, default_value = "0")]
    skip: usize,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Counts per event kind
    Summary,
    /// One line per event
    List,
    /// Full JSON output
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TopicArg {
    Combat,
    Command,
    Session,
}

impl From<TopicArg> for Topic {
    fn from(topic: TopicArg) -> Self {
        match topic {
            TopicArg::Combat => Topic::Combat,
            TopicArg::Command => Topic::Command,
            TopicArg::Session => Topic::Session,
        }
    }
}

impl ReadEvents {
    pub fn execute(self) -> Result<()> {
        let catalog = utils::catalog(self.data_dir);
        let files = utils::resolve_session(&catalog, self.session)?;
        let events = files.read_events()?;
        let total = events.len();

        let topic = self.topic.map(Topic::from);
        let limit = if self.limit == 0 {
            usize::MAX
        } else {
            self.limit
        };
        let events: Vec<Event> = events
            .into_iter()
            .filter(|event| topic.is_none_or(|topic| event.topic() == topic))
            .skip(self.skip)
            .take(limit)
            .collect();

        if matches!(self.format, OutputFormat::Json) {
            println!("{}", serde_json::to_string_pretty(&events)?);
            return Ok(());
        }

        println!("{} {}", style("Session:").bold().cyan(), files.session_id());
        println!("{} {}", style("Total Events:").bold().cyan(), total);
        if events.len() != total {
            println!("{} {}", style("Showing:").bold().cyan(), events.len());
        }
        println!();

        match self.format {
            OutputFormat::Summary => print_summary(&events),
            OutputFormat::List => print_list(&events),
            OutputFormat::Json => {}
        }
        Ok(())
    }
}

fn label(event: &Event) -> String {
    match event {
        Event::Combat(record) => record.event.name().to_owned(),
        Event::Command(CommandEvent::Executed { kind, .. }) => format!("{kind} executed"),
        Event::Command(CommandEvent::Rejected { kind, .. }) => format!("{kind} rejected"),
        Event::Session(SessionEvent::Opened { .. }) => "session_opened".to_owned(),
        Event::Session(SessionEvent::Closed { .. }) => "session_closed".to_owned(),
    }
}

fn print_summary(events: &[Event]) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(label(event)).or_default() += 1;
    }

    println!("{}", style("Event Counts:").bold());
    for (label, count) in counts {
        println!("  {:<28} {}", label, style(count).green());
    }

    let rejected = events
        .iter()
        .filter(|event| matches!(event, Event::Command(command) if command.is_rejected()))
        .count();
    if rejected > 0 {
        println!();
        println!(
            "{} {} rejected command(s)",
            style("!").yellow().bold(),
            rejected
        );
    }
}

fn print_list(events: &[Event]) {
    for event in events {
        match event {
            Event::Combat(record) => {
                println!("{:>4}  {}", style(record.nonce).dim(), record.event);
            }
            Event::Command(CommandEvent::Executed { nonce, kind, events }) => {
                println!(
                    "{:>4}  {} {} ({} events)",
                    style(nonce).dim(),
                    style("✓").green(),
                    kind,
                    events
                );
            }
            Event::Command(CommandEvent::Rejected {
                nonce,
                kind,
                code,
                message,
                ..
            }) => {
                println!(
                    "{:>4}  {} {} [{}] {}",
                    style(nonce).dim(),
                    style("✗").red(),
                    kind,
                    style(code).yellow(),
                    message
                );
            }
            Event::Session(SessionEvent::Opened {
                session_id,
                trigger,
                table_version,
                enemies,
            }) => {
                let enemies: Vec<_> = enemies.iter().map(|id| id.as_str()).collect();
                println!(
                    "      {} {} opened ({}, table v{}): {}",
                    style("▶").cyan(),
                    session_id,
                    trigger,
                    table_version,
                    enemies.join(", ")
                );
            }
            Event::Session(SessionEvent::Closed {
                session_id,
                outcome,
                fame,
                state_root,
                ..
            }) => {
                let outcome = outcome.map_or_else(|| "unresolved".to_owned(), |o| o.to_string());
                println!(
                    "      {} {} closed: {} ({} fame) root {}",
                    style("■").cyan(),
                    session_id,
                    outcome,
                    fame,
                    &hex::encode(state_root)[..16]
                );
            }
        }
    }
}
