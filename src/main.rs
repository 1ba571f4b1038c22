//! goalmatch CLI: infer action-goal relationships from catalog snapshots.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use goalmatch::catalog::Catalog;
use goalmatch::config::MatchConfig;
use goalmatch::id::{ActionId, GoalId};
use goalmatch::inference::{infer_all, infer_for_goal, infer_for_new_action, infer_for_period};

#[derive(Parser)]
#[command(name = "goalmatch", version, about = "Action-to-goal matching engine")]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Snapshot {
    /// JSON array of actions.
    #[arg(long)]
    actions: PathBuf,

    /// JSON array of goals.
    #[arg(long)]
    goals: PathBuf,
}

impl Snapshot {
    fn load(&self) -> Result<Catalog> {
        Ok(Catalog::load(&self.actions, &self.goals)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Infer relationships for the whole snapshot and triage them.
    Infer {
        #[command(flatten)]
        snapshot: Snapshot,

        /// Only consider actions logged at or after this instant (RFC 3339).
        #[arg(long, requires = "to")]
        from: Option<DateTime<Utc>>,

        /// Only consider actions logged at or before this instant (RFC 3339).
        #[arg(long, requires = "from")]
        to: Option<DateTime<Utc>>,

        /// Override the configured confidence threshold.
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Suggest goals for one action, most confident first.
    Suggest {
        #[command(flatten)]
        snapshot: Snapshot,

        /// Action id.
        #[arg(long)]
        action: ActionId,
    },

    /// List every action that contributes to one goal.
    Goal {
        #[command(flatten)]
        snapshot: Snapshot,

        /// Goal id.
        #[arg(long)]
        goal: GoalId,
    },

    /// Show each matcher's verdict for one action-goal pair.
    Explain {
        #[command(flatten)]
        snapshot: Snapshot,

        #[arg(long)]
        action: ActionId,

        #[arg(long)]
        goal: GoalId,
    },

    /// Print session statistics for the whole snapshot.
    Summary {
        #[command(flatten)]
        snapshot: Snapshot,
    },

    /// Write a config file with every field at its default.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MatchConfig::load_or_default(cli.config.as_deref())?;
    let engine = config.engine();

    match cli.command {
        Commands::Infer {
            snapshot,
            from,
            to,
            threshold,
        } => {
            let catalog = snapshot.load()?;
            let threshold = threshold.unwrap_or(config.confidence_threshold);
            if !(0.0..=1.0).contains(&threshold) {
                miette::bail!("threshold {threshold} is outside [0.0, 1.0]");
            }

            let session = match (from, to) {
                (Some(start), Some(end)) => {
                    if start > end {
                        miette::bail!("--from {start} is after --to {end}");
                    }
                    infer_for_period(
                        &engine,
                        &catalog.actions,
                        &catalog.goals,
                        start,
                        end,
                        threshold,
                    )
                }
                _ => infer_all(
                    &engine,
                    &catalog.actions,
                    &catalog.goals,
                    config.require_period_match,
                    threshold,
                ),
            };
            print_json(&session)?;
        }

        Commands::Suggest { snapshot, action } => {
            let catalog = snapshot.load()?;
            let action = catalog.action(action)?;
            let matches = infer_for_new_action(&engine, action, &catalog.goals, Utc::now());
            print_json(&matches)?;
        }

        Commands::Goal { snapshot, goal } => {
            let catalog = snapshot.load()?;
            let goal = catalog.goal(goal)?;
            let matches = infer_for_goal(&engine, goal, &catalog.actions, None);
            let total: f64 = matches.iter().map(|m| m.contribution).sum();
            tracing::info!(goal = %goal.id, matches = matches.len(), total, "goal report");
            print_json(&matches)?;
        }

        Commands::Explain {
            snapshot,
            action,
            goal,
        } => {
            let catalog = snapshot.load()?;
            let action = catalog.action(action)?;
            let goal = catalog.goal(goal)?;
            print_json(&engine.evaluate(action, goal))?;
        }

        Commands::Summary { snapshot } => {
            let catalog = snapshot.load()?;
            let session = infer_all(
                &engine,
                &catalog.actions,
                &catalog.goals,
                config.require_period_match,
                config.confidence_threshold,
            );
            println!("{}", session.summary());
        }

        Commands::InitConfig { path } => {
            write_default_config(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        miette::bail!("{} already exists; refusing to overwrite", path.display());
    }
    MatchConfig::default().save(path)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
