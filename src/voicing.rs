//! Voicing decision and semitone conversion
//!
//! A frame counts as voiced when the frequency of its first candidate lies
//! strictly inside a band (100–1000 Hz unless configured otherwise). Voiced
//! frequencies are converted to semitones on the MIDI scale, where
//! 440 Hz is note 69.

use crate::frames::FrameRecord;
use crate::{PitchExportError, Result};

/// Reference frequency for the semitone scale (A4)
const REFERENCE_HZ: f64 = 440.0;
/// Semitone value of the reference frequency
const REFERENCE_SEMITONES: f64 = 69.0;

/// Exclusive frequency band deciding whether a frame is voiced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoicingBand {
    /// Lower bound in Hz (exclusive)
    pub min: f64,
    /// Upper bound in Hz (exclusive)
    pub max: f64,
}

impl Default for VoicingBand {
    fn default() -> Self {
        Self {
            min: 100.0,
            max: 1000.0,
        }
    }
}

impl VoicingBand {
    /// Create a band, rejecting bounds that could never classify a frame as voiced
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PitchExportError::InvalidParameter(format!(
                "frequency band bounds must be finite (got {} and {})",
                min, max
            )));
        }
        if min >= max {
            return Err(PitchExportError::InvalidParameter(format!(
                "minimum frequency {} must be below maximum frequency {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// True iff `min < frequency < max`
    pub fn contains(&self, frequency: f64) -> bool {
        self.min < frequency && frequency < self.max
    }
}

/// Convert Hz to semitones, 440 Hz = 69
pub fn hz_to_semitones(hz: f64) -> f64 {
    12.0 * (hz / REFERENCE_HZ).log2() + REFERENCE_SEMITONES
}

/// Per-frame voicing and pitch, built by one forward pass over the frames
#[derive(Debug, Clone, Default)]
pub struct VoicingTrack {
    /// Pitch in semitones; 0.0 for unvoiced frames until interpolated
    pub pitch: Vec<f64>,
    pub voiced: Vec<bool>,
    /// Most recent voiced frame strictly before each frame
    pub prev_voiced: Vec<Option<usize>>,
    /// Most recent voiced frame seen so far
    last_voiced: Option<usize>,
}

impl VoicingTrack {
    pub fn with_capacity(frame_count: usize) -> Self {
        Self {
            pitch: Vec::with_capacity(frame_count),
            voiced: Vec::with_capacity(frame_count),
            prev_voiced: Vec::with_capacity(frame_count),
            last_voiced: None,
        }
    }

    /// Classify frames in order
    #[cfg(test)]
    pub(crate) fn from_frames<'a, I>(frames: I, band: &VoicingBand) -> Self
    where
        I: IntoIterator<Item = &'a FrameRecord>,
    {
        let frames = frames.into_iter();
        let mut track = Self::with_capacity(frames.size_hint().0);
        for frame in frames {
            track.push(frame, band);
        }
        track
    }

    /// Classify the next frame and append it to the track
    pub fn push(&mut self, frame: &FrameRecord, band: &VoicingBand) {
        let index = self.pitch.len();
        let frequency = frame.frequency().filter(|&f| band.contains(f));

        self.prev_voiced.push(self.last_voiced);
        match frequency {
            Some(f) => {
                self.voiced.push(true);
                self.pitch.push(hz_to_semitones(f));
                self.last_voiced = Some(index);
            }
            None => {
                self.voiced.push(false);
                self.pitch.push(0.0);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pitch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitch.is_empty()
    }

    /// Whether any frame classified so far is voiced
    pub fn has_voiced(&self) -> bool {
        self.last_voiced.is_some()
    }

    pub fn count_voiced(&self) -> usize {
        self.voiced.iter().filter(|&&v| v).count()
    }
}
