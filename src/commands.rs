//! Subcommand implementations
//!
//! Each command returns an exit code; errors that stop a command early are
//! reported by `main`.

use anyhow::{Context, Result};
use colored::Colorize;
use praatfan_pitch_export::{
    check_distinct_destinations, convert as convert_file, destination_for, find_project,
    list_jobs, ConversionSummary, Job, VoicingBand,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::{BandArgs, ProjectArgs};

/// Extension assumed for a source file that has none
const DEFAULT_EXTENSION: &str = "Pitch";

impl BandArgs {
    fn band(&self) -> Result<VoicingBand> {
        Ok(VoicingBand::new(self.freq_min, self.freq_max)?)
    }
}

#[derive(Serialize)]
struct FailedJob {
    source: PathBuf,
    error: String,
}

#[derive(Serialize)]
struct SyncReport {
    converted: Vec<ConversionSummary>,
    failed: Vec<FailedJob>,
}

/// Run the convert command
pub fn convert(
    source: &Path,
    output: Option<&Path>,
    project: Option<&Path>,
    band: &BandArgs,
    json: bool,
) -> Result<ExitCode> {
    let band = band.band()?;
    let destination = match output {
        Some(path) => path.to_path_buf(),
        None => default_output(source, project),
    };

    let result = convert_file(source, &destination, &band)
        .with_context(|| format!("failed to convert {}", source.display()))?;
    let summary = result.summary(source, &destination);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the jobs command
pub fn jobs(args: &ProjectArgs, json: bool) -> Result<ExitCode> {
    let (project, jobs) = collect_jobs(args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Project:".cyan().bold(), project.display());
    if jobs.is_empty() {
        println!("No *.{} files in {}", args.ext, args.dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    let width = jobs.iter().map(|job| file_name(&job.source).len()).max().unwrap_or(0);
    for (i, job) in jobs.iter().enumerate() {
        let marker = if job.is_stale() { "*".yellow().bold() } else { " ".normal() };
        println!(
            " {} {}) {:<width$} -> {}",
            marker,
            i + 1,
            file_name(&job.source),
            file_name(&job.destination),
            width = width
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the sync command
pub fn sync(args: &ProjectArgs, all: bool, band: &BandArgs, json: bool) -> Result<ExitCode> {
    let band = band.band()?;
    let (_, jobs) = collect_jobs(args)?;
    let selected: Vec<&Job> = jobs.iter().filter(|job| all || job.is_stale()).collect();
    check_distinct_destinations(selected.iter().copied())?;

    let mut report = SyncReport {
        converted: Vec::new(),
        failed: Vec::new(),
    };
    for job in &selected {
        match convert_file(&job.source, &job.destination, &band) {
            Ok(result) => {
                let summary = result.summary(&job.source, &job.destination);
                if !json {
                    print_summary(&summary);
                }
                report.converted.push(summary);
            }
            Err(e) => {
                if !json {
                    eprintln!("{} {}: {}", "FAILED".red().bold(), job.source.display(), e);
                }
                report.failed.push(FailedJob {
                    source: job.source.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if selected.is_empty() {
        println!("{}", "Everything is up to date.".green());
    } else {
        println!(
            "{} {} converted, {} failed",
            "Done:".cyan().bold(),
            report.converted.len(),
            report.failed.len()
        );
    }

    Ok(if report.failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn collect_jobs(args: &ProjectArgs) -> Result<(PathBuf, Vec<Job>)> {
    let project = match &args.project {
        Some(project) => project.clone(),
        None => find_project(&args.dir)?,
    };
    let jobs = list_jobs(&args.dir, &args.ext, &project)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;
    Ok((project, jobs))
}

/// Output path when none is given: named after the project if there is one, else after the source
fn default_output(source: &Path, project: Option<&Path>) -> PathBuf {
    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    destination_for(project.unwrap_or(source), &extension)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(summary: &ConversionSummary) {
    println!(
        "{} {} -> {} ({} frames, {} voiced)",
        "Converted:".green().bold(),
        summary.source.display(),
        summary.destination.display(),
        summary.frame_count,
        summary.voiced_count
    );
}
