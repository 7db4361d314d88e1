//! Frame records of a Praat Pitch text file
//!
//! Each frame is stored as its intensity, a candidate count, and that many
//! (frequency, strength) pairs. The first candidate is the one chosen by
//! Praat's path finder; the rest are alternatives this crate never uses.

use crate::text_file::TextReader;
use crate::{PitchExportError, Result};
use std::io::BufRead;

/// A pitch candidate for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCandidate {
    /// Frequency in Hz (0.0 for unvoiced)
    pub frequency: f64,
    /// Strength (autocorrelation value)
    pub strength: f64,
}

/// A single frame as read from the file
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Intensity of this frame (normalized local peak)
    pub intensity: f64,
    /// Number of candidates stored for this frame
    pub candidate_count: usize,
    /// First candidate, if the frame stores any
    pub first: Option<PitchCandidate>,
}

impl FrameRecord {
    /// Read one frame, keeping only its first candidate
    pub fn read<R: BufRead>(reader: &mut TextReader<R>) -> Result<Self> {
        let intensity = reader.read_f64("intensity")?;
        let count = reader.read_int("nCandidates")?;
        let candidate_count = usize::try_from(count).map_err(|_| PitchExportError::Parse {
            line: reader.line_number(),
            reason: format!("negative candidate count {}", count),
        })?;

        let first = if candidate_count > 0 {
            Some(read_candidate(reader)?)
        } else {
            None
        };
        for _ in 1..candidate_count {
            read_candidate(reader)?;
        }

        Ok(Self {
            intensity,
            candidate_count,
            first,
        })
    }

    /// Frequency of the first candidate
    pub fn frequency(&self) -> Option<f64> {
        self.first.map(|c| c.frequency)
    }
}

fn read_candidate<R: BufRead>(reader: &mut TextReader<R>) -> Result<PitchCandidate> {
    Ok(PitchCandidate {
        frequency: reader.read_f64("frequency")?,
        strength: reader.read_f64("strength")?,
    })
}
