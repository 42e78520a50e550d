//! Command-line interface for the `upskill` planning engine.
//!
//! Every subcommand reads its inputs from JSON files (a catalogue fixture
//! plus skill profiles) and prints its result as JSON on stdout, so the
//! binary doubles as a test harness for the engine crates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use upskill_catalog::InMemoryCatalog;
use upskill_jobfit::{
    DistanceConfig, Employee, JobDistanceModel, TargetRole, WorkforcePlanner,
};
use upskill_model::{ConstraintPatch, Constraints, SkillProfile};
use upskill_pathway::{normalize_datetime, PathwayPlanner, PlannerConfig};

/// Command-line interface for the `upskill` planning engine.
#[derive(Debug, Parser)]
#[command(
    name = "upskill",
    version,
    about = "Learning pathway planning and job-fit analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available `upskill` commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Plans a learning pathway and prints the weekly schedule.
    Plan {
        /// Catalogue fixture (resources, scores, skills, embeddings).
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        /// Current skill profile.
        #[arg(long, value_name = "FILE")]
        current: PathBuf,
        /// Target skill profile.
        #[arg(long, value_name = "FILE")]
        target: PathBuf,
        /// Constraint overrides, merged over the defaults.
        #[arg(long, value_name = "FILE")]
        constraints: Option<PathBuf>,
        /// Schedule anchor as an ISO-8601 datetime; naive values assume
        /// UTC. Defaults to now.
        #[arg(long, value_name = "DATETIME")]
        start: Option<String>,
        /// RNG seed for reproducible plans.
        #[arg(long, env = "UPSKILL_SEED")]
        seed: Option<u64>,
        /// Monte-Carlo trials per planning call.
        #[arg(long, default_value_t = 500)]
        population: usize,
    },
    /// Lists top courses for the given skills, interleaved per skill.
    Courses {
        /// Catalogue fixture.
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        /// Skill ids to list courses for.
        #[arg(required = true)]
        skills: Vec<String>,
        /// Constraint overrides, merged over the defaults.
        #[arg(long, value_name = "FILE")]
        constraints: Option<PathBuf>,
        /// Maximum courses to return overall.
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Maximum courses per skill.
        #[arg(long, default_value_t = 3)]
        per_skill: usize,
    },
    /// Computes the embedding-based distance between two skill profiles.
    Distance {
        /// Catalogue fixture.
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        /// Source skill profile.
        #[arg(long, value_name = "FILE")]
        source: PathBuf,
        /// Target skill profile.
        #[arg(long, value_name = "FILE")]
        target: PathBuf,
        /// Ignore skill transfer and report raw level differences.
        #[arg(long, default_value_t = false)]
        simple: bool,
    },
    /// Reports the median weeks of study needed to close the gap.
    Duration {
        /// Catalogue fixture.
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        /// Source skill profile.
        #[arg(long, value_name = "FILE")]
        source: PathBuf,
        /// Target skill profile.
        #[arg(long, value_name = "FILE")]
        target: PathBuf,
        /// Include per-trial schedule lengths in the output.
        #[arg(long, default_value_t = false)]
        details: bool,
        /// RNG seed for reproducible results.
        #[arg(long, env = "UPSKILL_SEED")]
        seed: Option<u64>,
        /// Scheduling trials to sample.
        #[arg(long, default_value_t = 1000)]
        population: usize,
    },
    /// Matches employees to target roles under capacity constraints.
    Workforce {
        /// Catalogue fixture.
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        /// Roster file with `employees` and `targets` sections.
        #[arg(long, value_name = "FILE")]
        roster: PathBuf,
        /// Maximum roles recommended per employee.
        #[arg(long, default_value_t = 1)]
        targets_per_employee: usize,
    },
}

/// Workforce planning input document.
#[derive(Debug, Deserialize)]
struct Roster {
    employees: Vec<Employee>,
    targets: Vec<TargetRole>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    match Cli::parse().command {
        Commands::Plan {
            catalog,
            current,
            target,
            constraints,
            start,
            seed,
            population,
        } => {
            let catalog: InMemoryCatalog = load_json(&catalog, "catalogue")?;
            let current: SkillProfile = load_json(&current, "current profile")?;
            let target: SkillProfile = load_json(&target, "target profile")?;
            let constraints = load_constraints(constraints.as_deref())?;
            let config = PlannerConfig {
                population,
                seed,
                ..PlannerConfig::default()
            };
            let planner = PathwayPlanner::new(&catalog, constraints).with_config(config);
            let start = parse_start(start.as_deref())?;
            print_json(&planner.plan(&current, &target, start)?)
        }
        Commands::Courses {
            catalog,
            skills,
            constraints,
            count,
            per_skill,
        } => {
            let catalog: InMemoryCatalog = load_json(&catalog, "catalogue")?;
            let constraints = load_constraints(constraints.as_deref())?;
            let planner = PathwayPlanner::new(&catalog, constraints);
            print_json(&planner.courses_for_skill(&skills, count, per_skill))
        }
        Commands::Distance {
            catalog,
            source,
            target,
            simple,
        } => {
            let catalog: InMemoryCatalog = load_json(&catalog, "catalogue")?;
            let source: SkillProfile = load_json(&source, "source profile")?;
            let target: SkillProfile = load_json(&target, "target profile")?;
            let model = JobDistanceModel::new(&catalog);
            let report = if simple {
                model.simple_distance(&source, &target)
            } else {
                model.distance(&source, &target)
            };
            print_json(&report)
        }
        Commands::Duration {
            catalog,
            source,
            target,
            details,
            seed,
            population,
        } => {
            let catalog: InMemoryCatalog = load_json(&catalog, "catalogue")?;
            let source: SkillProfile = load_json(&source, "source profile")?;
            let target: SkillProfile = load_json(&target, "target profile")?;
            let model = JobDistanceModel::new(&catalog).with_config(DistanceConfig {
                duration_population: population,
                seed,
                ..DistanceConfig::default()
            });
            print_json(&model.duration(&source, &target, details)?)
        }
        Commands::Workforce {
            catalog,
            roster,
            targets_per_employee,
        } => {
            let catalog: InMemoryCatalog = load_json(&catalog, "catalogue")?;
            let roster: Roster = load_json(&roster, "roster")?;
            let planner =
                WorkforcePlanner::new(JobDistanceModel::new(&catalog), targets_per_employee);
            print_json(&planner.plan(&roster.employees, &roster.targets))
        }
    }
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing {what} from {}", path.display()))
}

fn load_constraints(path: Option<&Path>) -> Result<Constraints> {
    match path {
        Some(path) => {
            let patch: ConstraintPatch = load_json(path, "constraints")?;
            Ok(Constraints::from_patch(patch))
        }
        None => Ok(Constraints::default()),
    }
}

fn parse_start(start: Option<&str>) -> Result<OffsetDateTime> {
    match start {
        Some(value) => Ok(normalize_datetime(value)?),
        None => Ok(OffsetDateTime::now_utc()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
