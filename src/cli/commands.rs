//! CLI command definitions for muster.
//!
//! `validate` runs the consistency pipeline and reports a verdict;
//! `build` validates and then generates the dist tree. Any failure
//! propagates out of `main` as a non-zero exit.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{PipelineConfig, DEFAULT_MAX_VIOLATIONS};
use crate::export::{ExportConfig, SiteBuilder};
use crate::validation::Validator;

/// Default root for content record directories.
const DEFAULT_DATA_DIR: &str = "data";

/// Default directory holding the kind schemas.
const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// Default static site assets copied into the dist root.
const DEFAULT_SITE_DIR: &str = "site";

/// Default output directory for `build`.
const DEFAULT_DIST_DIR: &str = "dist";

/// Static content pipeline for warband/unit game data.
#[derive(Parser)]
#[command(name = "muster")]
#[command(about = "Validate warband/unit content and build the static JSON API tree")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Validate all content records without writing anything.
    #[command(alias = "check")]
    Validate(ValidateArgs),

    /// Validate, then generate the dist tree (site assets + JSON API).
    Build(BuildArgs),
}

/// Arguments shared by validation-backed commands.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Root directory holding warbands/ and units/.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory holding warband.schema.json and unit.schema.json.
    #[arg(long, default_value = DEFAULT_SCHEMA_DIR)]
    pub schema_dir: PathBuf,

    /// Maximum schema violations reported per record.
    #[arg(long, default_value_t = DEFAULT_MAX_VIOLATIONS)]
    pub max_violations: usize,
}

/// Arguments for `muster build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub validate: ValidateArgs,

    /// Static site assets copied into the dist root.
    #[arg(long, default_value = DEFAULT_SITE_DIR)]
    pub site_dir: PathBuf,

    /// Skip copying site assets; write only the API tree.
    #[arg(long)]
    pub no_site: bool,

    /// Output directory for the generated tree.
    #[arg(short = 'o', long, default_value = DEFAULT_DIST_DIR)]
    pub out: PathBuf,
}

/// Parse CLI arguments from the process environment.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Execute a parsed CLI invocation.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Build(args) => run_build(args),
    }
}

fn pipeline_config(args: &ValidateArgs) -> PipelineConfig {
    let mut config = PipelineConfig::new(&args.data_dir, &args.schema_dir);
    config.max_violations = args.max_violations;
    config
}

fn run_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let validator = Validator::new(pipeline_config(&args))?;
    let dataset = validator.run()?;
    println!(
        "OK: validation passed ({} warbands, {} units)",
        dataset.warbands.len(),
        dataset.units.len()
    );
    Ok(())
}

fn run_build(args: BuildArgs) -> anyhow::Result<()> {
    let validator = Validator::new(pipeline_config(&args.validate))?;
    let dataset = validator.run()?;

    let site_dir = if args.no_site { None } else { Some(args.site_dir) };
    let builder = SiteBuilder::new(ExportConfig {
        dist_dir: args.out,
        site_dir,
    });
    let summary = builder.build(&dataset)?;
    println!(
        "OK: {} generated ({} warbands, {} units)",
        summary.dist_dir.display(),
        summary.warbands,
        summary.units
    );
    Ok(())
}
