//! pitch-export - convert Praat Pitch text files to fixed-width semitone contours
//!
//! `convert` handles one file, `jobs` lists the Pitch files of a project
//! directory and whether their export is current, `sync` converts the ones
//! that are out of date.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// Praat Pitch to fixed-width text converter
#[derive(Parser)]
#[command(name = "pitch-export")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single Pitch file
    Convert {
        /// Path to the Praat Pitch text file
        source: PathBuf,

        /// Output file (default: derived from --project, or <source stem>_<ext>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Project file whose name determines the output file
        #[arg(short, long)]
        project: Option<PathBuf>,

        #[command(flatten)]
        band: BandArgs,

        /// Output a machine-readable JSON summary
        #[arg(long)]
        json: bool,
    },

    /// List source files in a project directory and whether their export is current
    Jobs {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert every out-of-date source file in a project directory
    Sync {
        #[command(flatten)]
        project: ProjectArgs,

        /// Convert up-to-date files as well
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        band: BandArgs,

        /// Output machine-readable JSON summaries
        #[arg(long)]
        json: bool,
    },
}

/// Voicing band options
#[derive(Args)]
pub(crate) struct BandArgs {
    /// Lowest frequency counted as voiced, exclusive (Hz)
    #[arg(long, default_value_t = 100.0)]
    pub freq_min: f64,

    /// Highest frequency counted as voiced, exclusive (Hz)
    #[arg(long, default_value_t = 1000.0)]
    pub freq_max: f64,
}

/// Project directory options
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Directory to scan for source files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Project file (default: the single .svp file in --dir)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Extension of the source files
    #[arg(long, default_value = "Pitch")]
    pub ext: String,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            source,
            output,
            project,
            band,
            json,
        } => commands::convert(&source, output.as_deref(), project.as_deref(), &band, json),
        Commands::Jobs { project, json } => commands::jobs(&project, json),
        Commands::Sync {
            project,
            all,
            band,
            json,
        } => commands::sync(&project, all, &band, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
