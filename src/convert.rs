//! Pitch file conversion
//!
//! Runs the whole pipeline for one file: header, forward voicing pass over
//! the frames, backward interpolation pass, then fixed-width encoding.
//! Everything is computed in memory before the destination is opened, so a
//! source that fails to parse never creates or truncates the destination.

use crate::encoder::write_result;
use crate::frames::FrameRecord;
use crate::header::SourceHeader;
use crate::interpolation::fill_unvoiced;
use crate::text_file::TextReader;
use crate::voicing::{VoicingBand, VoicingTrack};
use crate::{PitchExportError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Upper bound on frames reserved up front; a damaged `nx` should not trigger a huge allocation
const MAX_RESERVED_FRAMES: usize = 1 << 20;

/// Final pitch contour of one conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// Time step between frames (`dx`)
    pub frame_step: f64,
    /// Time of the first frame centre (`x1`)
    pub first_frame_time: f64,
    /// Pitch in semitones for every frame, unvoiced frames interpolated
    pub pitch: Vec<f64>,
    pub voiced: Vec<bool>,
}

/// Short report of a finished conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub frame_count: usize,
    pub voiced_count: usize,
    pub frame_step: f64,
    pub first_frame_time: f64,
}

impl ConversionResult {
    pub fn frame_count(&self) -> usize {
        self.pitch.len()
    }

    pub fn voiced_count(&self) -> usize {
        self.voiced.iter().filter(|&&v| v).count()
    }

    pub fn summary(&self, source: &Path, destination: &Path) -> ConversionSummary {
        ConversionSummary {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            frame_count: self.frame_count(),
            voiced_count: self.voiced_count(),
            frame_step: self.frame_step,
            first_frame_time: self.first_frame_time,
        }
    }
}

/// Convert a Pitch text file read from `reader`
pub fn convert_reader<R: BufRead>(reader: R, band: &VoicingBand) -> Result<ConversionResult> {
    let mut reader = TextReader::new(reader);
    let header = SourceHeader::read(&mut reader)?;

    let frame_count = match usize::try_from(header.frame_count) {
        Ok(n) if n > 0 => n,
        _ => return Err(PitchExportError::EmptyFile),
    };

    let mut track = VoicingTrack::with_capacity(frame_count.min(MAX_RESERVED_FRAMES));
    for _ in 0..frame_count {
        let frame = FrameRecord::read(&mut reader)?;
        track.push(&frame, band);
    }
    log::debug!(
        "Scanned {} frames, {} voiced in ({}, {}) Hz",
        track.len(),
        track.count_voiced(),
        band.min,
        band.max
    );

    if !track.has_voiced() {
        return Err(PitchExportError::NoVoicedFrame);
    }
    fill_unvoiced(&mut track);

    Ok(ConversionResult {
        frame_step: header.frame_step,
        first_frame_time: header.first_frame_time,
        pitch: track.pitch,
        voiced: track.voiced,
    })
}

/// Convert `source` and write the fixed-width contour to `destination`.
///
/// The destination is created or overwritten only after the source has been
/// fully parsed. A failing write may leave it truncated.
pub fn convert(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    band: &VoicingBand,
) -> Result<ConversionResult> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let result = {
        let file = File::open(source)?;
        convert_reader(BufReader::new(file), band)?
    };

    let mut writer = BufWriter::new(File::create(destination)?);
    write_result(&result, &mut writer)?;
    writer.flush()?;

    log::info!(
        "{} -> {} ({} frames, {} voiced)",
        source.display(),
        destination.display(),
        result.frame_count(),
        result.voiced_count()
    );
    Ok(result)
}
