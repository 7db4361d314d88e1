//! Conversion jobs in a project directory
//!
//! A project is anchored by one `.svp` file. Every source file with a given
//! extension in the same directory converts to `<project stem>_<ext>.txt`
//! next to the project file. A job is up to date when that destination
//! exists and is newer than its source.

use crate::{PitchExportError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Extension of the project file that names the destination
pub const PROJECT_EXTENSION: &str = "svp";

/// One source file and the destination it converts to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Job {
    /// Destination exists and is newer than the source
    pub up_to_date: bool,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Job {
    pub fn is_stale(&self) -> bool {
        !self.up_to_date
    }
}

/// Destination path for sources with `extension` in the project of `project`
pub fn destination_for(project: &Path, extension: &str) -> PathBuf {
    let stem = project
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    project.with_file_name(format!("{}_{}.txt", stem, extension))
}

/// List the files with `extension` directly inside `directory`.
///
/// Jobs are sorted stale first, then by source path. Dot files count like any
/// other file.
pub fn list_jobs(directory: &Path, extension: &str, project: &Path) -> Result<Vec<Job>> {
    let destination = destination_for(project, extension);
    let destination_time = modified(&destination);

    let mut jobs = Vec::new();
    for entry in files_with_extension(directory, extension)? {
        let up_to_date = match (modified(&entry), destination_time) {
            (Some(source_time), Some(destination_time)) => source_time < destination_time,
            _ => false,
        };
        jobs.push(Job {
            up_to_date,
            source: entry,
            destination: destination.clone(),
        });
    }
    jobs.sort();

    log::debug!(
        "{} *.{} files in {}, {} stale",
        jobs.len(),
        extension,
        directory.display(),
        jobs.iter().filter(|job| job.is_stale()).count()
    );
    Ok(jobs)
}

/// Refuse a batch in which two sources would write the same destination.
///
/// Converting them in turn would leave only the last one's output.
pub fn check_distinct_destinations<'a, I>(jobs: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Job>,
{
    let mut by_destination: BTreeMap<&Path, Vec<&Path>> = BTreeMap::new();
    for job in jobs {
        by_destination
            .entry(job.destination.as_path())
            .or_default()
            .push(job.source.as_path());
    }

    for (destination, sources) in by_destination {
        if sources.len() > 1 {
            let names: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
            return Err(PitchExportError::InvalidParameter(format!(
                "{} sources would all be written to {}: {}; convert one with `convert <SOURCE>`",
                sources.len(),
                destination.display(),
                names.join(", ")
            )));
        }
    }
    Ok(())
}

/// Find the single project file in `directory`
pub fn find_project(directory: &Path) -> Result<PathBuf> {
    let mut found = files_with_extension(directory, PROJECT_EXTENSION)?;
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(PitchExportError::InvalidParameter(format!(
            "no .{} file found in {}",
            PROJECT_EXTENSION,
            directory.display()
        ))),
        _ => {
            let names: Vec<String> = found.iter().map(|p| p.display().to_string()).collect();
            Err(PitchExportError::InvalidParameter(format!(
                "several .{} files in {}, choose one: {}",
                PROJECT_EXTENSION,
                directory.display(),
                names.join(", ")
            )))
        }
    }
}

fn files_with_extension(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension() == Some(OsStr::new(extension)) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Modification time, or `None` if the file is missing or unreadable
fn modified(path: &Path) -> Option<SystemTime> {
    match path.metadata().and_then(|m| m.modified()) {
        Ok(time) => Some(time),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            log::warn!("Cannot read modification time of {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    fn touch(path: &Path, age_secs: u64) {
        fs::write(path, "x").unwrap();
        let time = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_destination_for() {
        assert_eq!(
            destination_for(Path::new("/songs/demo.svp"), "Pitch"),
            PathBuf::from("/songs/demo_Pitch.txt")
        );
    }

    #[test]
    fn test_list_jobs_staleness() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("song.svp");
        touch(&project, 1000);
        touch(&dir.path().join("old.Pitch"), 500);
        touch(&dir.path().join("song_Pitch.txt"), 100);
        touch(&dir.path().join("new.Pitch"), 10);
        touch(&dir.path().join("notes.txt"), 10);
        touch(&dir.path().join(".hidden.Pitch"), 10);

        let jobs = list_jobs(dir.path(), "Pitch", &project).unwrap();
        let names: Vec<(bool, String)> = jobs
            .iter()
            .map(|j| (j.up_to_date, j.source.file_name().unwrap().to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            names,
            vec![
                (false, ".hidden.Pitch".to_string()),
                (false, "new.Pitch".to_string()),
                (true, "old.Pitch".to_string())
            ]
        );
        assert!(jobs.iter().all(|j| j.destination == dir.path().join("song_Pitch.txt")));
    }

    #[test]
    fn test_missing_destination_means_stale() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("song.svp");
        touch(&project, 0);
        touch(&dir.path().join("a.Pitch"), 0);

        let jobs = list_jobs(dir.path(), "Pitch", &project).unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].is_stale());
    }

    #[test]
    fn test_shared_destination_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("song.svp");
        touch(&project, 0);
        touch(&dir.path().join("a.Pitch"), 0);
        touch(&dir.path().join("b.Pitch"), 0);

        let jobs = list_jobs(dir.path(), "Pitch", &project).unwrap();
        assert!(jobs.iter().all(Job::is_stale));
        match check_distinct_destinations(&jobs) {
            Err(PitchExportError::InvalidParameter(message)) => {
                assert!(message.contains("a.Pitch"), "{}", message);
                assert!(message.contains("b.Pitch"), "{}", message);
                assert!(message.contains("song_Pitch.txt"), "{}", message);
            }
            other => panic!("expected invalid parameter, got {:?}", other),
        }

        assert!(check_distinct_destinations(&jobs[..1]).is_ok());
        assert!(check_distinct_destinations(&jobs[..0]).is_ok());
    }

    #[test]
    fn test_find_project() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_project(dir.path()).is_err());

        touch(&dir.path().join("one.svp"), 0);
        assert_eq!(find_project(dir.path()).unwrap(), dir.path().join("one.svp"));

        touch(&dir.path().join("two.svp"), 0);
        let err = find_project(dir.path()).unwrap_err();
        assert!(err.to_string().contains("two.svp"), "{}", err);
    }
}
