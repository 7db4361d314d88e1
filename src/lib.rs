//! praatfan-pitch-export: compact fixed-width export of Praat Pitch objects
//!
//! Reads a Praat short-text `Pitch 1` file, classifies every frame as voiced
//! or unvoiced with a frequency band, converts voiced frequencies to
//! semitones (440 Hz = 69) and fills unvoiced gaps by linear interpolation
//! between the surrounding voiced frames. The result is written as a text
//! file whose pitch lines all have the same width, so a reader can seek to a
//! frame by byte offset.
//!
//! # Core Types
//!
//! - [`SourceHeader`] - Header fields of a Praat Pitch text file
//! - [`FrameRecord`] - One analysis frame as stored in the source
//! - [`VoicingBand`] - Exclusive frequency band deciding voicing
//! - [`VoicingTrack`] - Per-frame voicing and semitone values
//! - [`ConversionResult`] - Final contour ready to be encoded
//! - [`Job`] - A source/destination pair found in a project directory

pub mod text_file;
pub mod header;
pub mod frames;
pub mod voicing;
pub mod interpolation;
pub mod encoder;
pub mod convert;
pub mod jobs;

// Re-export main types at crate root
pub use convert::{convert, convert_reader, ConversionResult, ConversionSummary};
pub use encoder::{format_pitch_value, write_result};
pub use frames::{FrameRecord, PitchCandidate};
pub use header::{SourceHeader, SUPPORTED_OBJECT_CLASS};
pub use interpolation::fill_unvoiced;
pub use jobs::{check_distinct_destinations, destination_for, find_project, list_jobs, Job};
pub use voicing::{hz_to_semitones, VoicingBand, VoicingTrack};

use thiserror::Error;

/// Errors that can occur while converting a Pitch file
#[derive(Error, Debug)]
pub enum PitchExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Magic line or object class line is not what a Praat text file declares
    #[error("Format error: {0}")]
    Format(String),

    #[error("Unsupported object class: {0}")]
    UnsupportedClass(String),

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Pitch file is empty")]
    EmptyFile,

    #[error("No voiced pitch in Pitch file")]
    NoVoicedFrame,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, PitchExportError>;
