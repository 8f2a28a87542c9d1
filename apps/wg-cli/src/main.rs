use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod case;
mod error;
mod report;
mod vfp;

use case::Case;
use error::CliResult;

#[derive(Parser)]
#[command(name = "wg-cli")]
#[command(about = "Well/group control harness - group targets, constraint checks and network pressures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate deck syntax and group tree structure
    Validate {
        /// Path to the deck YAML file
        deck_path: PathBuf,
    },
    /// Refresh group controls, reductions and rates for a case
    Update {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check every open well against its group controls
    Check {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compute extended network node pressures
    Network {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { deck_path } => cmd_validate(&deck_path),
        Commands::Update { case_path, json } => cmd_update(&case_path, json),
        Commands::Check { case_path, json } => cmd_check(&case_path, json),
        Commands::Network { case_path, json } => cmd_network(&case_path, json),
    }
}

fn load_updated(case_path: &Path) -> CliResult<Case> {
    let mut case = Case::load(case_path)?;
    case.update()?;
    Ok(case)
}

fn cmd_validate(deck_path: &Path) -> CliResult<()> {
    println!("Validating deck: {}", deck_path.display());
    let schedule = wg_schedule::load_yaml(deck_path)?;
    for index in 0..schedule.len() {
        let step = schedule.step(index)?;
        println!(
            "  step {}: {} groups, {} wells, network {}",
            index,
            step.groups().count(),
            step.wells().count(),
            if step.network().active() { "active" } else { "inactive" }
        );
    }
    println!("✓ Deck is valid ({} report steps)", schedule.len());
    Ok(())
}

fn cmd_update(case_path: &Path, json: bool) -> CliResult<()> {
    let case = load_updated(case_path)?;
    let reports = report::group_reports(&case)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    println!("Groups at report step {}:", case.report_step);
    for r in reports {
        println!("  {}", r.name);
        println!("    production control: {:?}", r.production_control);
        for (phase, cmode) in &r.injection_controls {
            println!("    injection control ({}): {:?}", phase, cmode);
        }
        println!("    production reduction: {:?}", r.production_reduction);
        println!("    injection reduction:  {:?}", r.injection_reduction);
        println!("    production rates:     {:?}", r.production_rates);
        println!("    REIN: {:?}  VREP: {:.3}", r.rein, r.vrep);
    }
    Ok(())
}

fn cmd_check(case_path: &Path, json: bool) -> CliResult<()> {
    let case = load_updated(case_path)?;
    let checks = report::well_checks(&case)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
        return Ok(());
    }
    if checks.is_empty() {
        println!("No wells to check");
    }
    for c in checks {
        let phase = c.phase.map(|p| format!(" ({})", p)).unwrap_or_default();
        match &c.check.binding {
            Some(b) => println!(
                "  {}{}: group {} target {:.3} current {:.3} scale {:.4}{}",
                c.well,
                phase,
                b.group,
                b.target_rate,
                b.current_rate,
                c.check.scale,
                if c.check.violated { "  VIOLATED" } else { "" }
            ),
            None => println!("  {}{}: no group control", c.well, phase),
        }
    }
    Ok(())
}

fn cmd_network(case_path: &Path, json: bool) -> CliResult<()> {
    let case = load_updated(case_path)?;
    let pressures = report::network_pressures(&case)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pressures)?);
        return Ok(());
    }
    if pressures.is_empty() {
        println!("Network is inactive at report step {}", case.report_step);
    }
    for (node, p) in pressures {
        println!("  {:<12} {:>10.3} bar", node, p);
    }
    Ok(())
}
