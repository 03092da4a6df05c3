//! skin-transform - CPU linear blend skinning tool
//!
//! Deforms an OBJ mesh with JSON bone weights, inverse bind pose and new
//! pose documents, writes the skinned OBJ and a JSON timing report.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use skin_transform::{JobFile, config};

#[derive(Parser)]
#[command(name = "skin-transform")]
#[command(about = "Skin an OBJ mesh with JSON bone weights and poses")]
#[command(version)]
struct Cli {
    /// Source mesh (OBJ, triangulated)
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Per-vertex bone weights (JSON)
    #[arg(long)]
    bones_weights: Option<PathBuf>,

    /// Inverse bind pose matrices (JSON)
    #[arg(long)]
    inverse_bind_pose: Option<PathBuf>,

    /// New pose matrices (JSON)
    #[arg(long)]
    new_pose: Option<PathBuf>,

    /// Skinned mesh output (OBJ)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Timing report output (JSON)
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Run skinning N times and add a summary to the report
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    bench: Option<u64>,

    /// Use the SIMD skinning path when the target supports it
    #[arg(long)]
    accelerated: bool,

    /// TOML job file; flags override its values
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Usage errors exit 1 like runtime failures; --help/--version exit 0
        Err(err) if err.use_stderr() => {
            eprint!("{}", err);
            return ExitCode::FAILURE;
        }
        Err(err) => {
            print!("{}", err);
            return ExitCode::SUCCESS;
        }
    };

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match execute(cli) {
        Ok(()) => {
            println!("Success");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let overrides = JobFile {
        mesh: cli.mesh,
        bones_weights: cli.bones_weights,
        inverse_bind_pose: cli.inverse_bind_pose,
        new_pose: cli.new_pose,
        output: cli.output,
        stats: cli.stats,
        bench: cli.bench.map(|n| n as usize),
        accelerated: cli.accelerated,
    };
    let input = config::resolve(cli.config.as_deref(), overrides)?;
    tracing::debug!("Resolved job: {:?}", input);

    skin_transform::run(&input)?;
    Ok(())
}
