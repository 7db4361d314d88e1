//! Filling unvoiced frames
//!
//! Unvoiced frames get a pitch by linear interpolation in frame index between
//! the nearest voiced frame before and after them. Before the first voiced
//! frame and after the last one, the nearest voiced value is held constant.

use crate::voicing::VoicingTrack;

/// Overwrite the pitch of every unvoiced frame, walking backwards.
///
/// # Panics
///
/// Panics if the track is non-empty and has no voiced frame.
pub fn fill_unvoiced(track: &mut VoicingTrack) {
    let mut next: Option<usize> = None;
    for i in (0..track.len()).rev() {
        if track.voiced[i] {
            next = Some(i);
            continue;
        }
        track.pitch[i] = match (track.prev_voiced[i], next) {
            (None, Some(next)) => track.pitch[next],
            (Some(prev), None) => track.pitch[prev],
            (Some(prev), Some(next)) => weighted(
                track.pitch[prev],
                track.pitch[next],
                next - i,
                i - prev,
            ),
            (None, None) => unreachable!("unvoiced frame {} has no voiced frame on either side", i),
        };
    }
}

/// `(a * wa + b * wb) / (wa + wb)`, each neighbour weighted by the distance to the opposite one
fn weighted(a: f64, b: f64, weight_a: usize, weight_b: usize) -> f64 {
    (a * weight_a as f64 + b * weight_b as f64) / (weight_a + weight_b) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{FrameRecord, PitchCandidate};
    use crate::voicing::VoicingBand;
    use approx::assert_relative_eq;

    fn track(frequencies: &[f64]) -> VoicingTrack {
        let frames: Vec<FrameRecord> = frequencies
            .iter()
            .map(|&frequency| FrameRecord {
                intensity: 0.5,
                candidate_count: 1,
                first: Some(PitchCandidate {
                    frequency,
                    strength: 0.9,
                }),
            })
            .collect();
        VoicingTrack::from_frames(&frames, &VoicingBand::default())
    }

    #[test]
    fn test_single_gap() {
        let mut t = track(&[440.0, 50.0, 880.0]);
        fill_unvoiced(&mut t);
        assert_relative_eq!(t.pitch[0], 69.0, epsilon = 1e-12);
        assert_relative_eq!(t.pitch[1], 75.0, epsilon = 1e-12);
        assert_relative_eq!(t.pitch[2], 81.0, epsilon = 1e-12);
    }

    #[test]
    fn test_long_gap_is_linear() {
        let mut t = track(&[440.0, 0.0, 0.0, 0.0, 880.0]);
        fill_unvoiced(&mut t);
        for (i, expected) in [69.0, 72.0, 75.0, 78.0, 81.0].iter().enumerate() {
            assert_relative_eq!(t.pitch[i], *expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_edges_hold_nearest_value() {
        let mut t = track(&[0.0, 0.0, 440.0, 0.0, 220.0, 0.0, 0.0]);
        fill_unvoiced(&mut t);
        assert_relative_eq!(t.pitch[0], 69.0, epsilon = 1e-12);
        assert_relative_eq!(t.pitch[1], 69.0, epsilon = 1e-12);
        assert_relative_eq!(t.pitch[3], 63.0, epsilon = 1e-12);
        assert_relative_eq!(t.pitch[5], 57.0, epsilon = 1e-12);
        assert_relative_eq!(t.pitch[6], 57.0, epsilon = 1e-12);
    }

    #[test]
    fn test_only_last_frame_voiced() {
        let mut t = track(&[0.0, 20.0, 5000.0, 330.0]);
        fill_unvoiced(&mut t);
        let last = t.pitch[3];
        assert!(t.pitch.iter().all(|&p| p == last));
    }

    #[test]
    fn test_gap_values_stay_between_neighbours() {
        let mut t = track(&[700.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 150.0]);
        fill_unvoiced(&mut t);
        let (lo, hi) = (t.pitch[7], t.pitch[0]);
        for i in 1..7 {
            assert!(t.pitch[i] >= lo && t.pitch[i] <= hi, "frame {}: {}", i, t.pitch[i]);
            assert!(t.pitch[i] < t.pitch[i - 1]);
        }
    }

    #[test]
    fn test_voiced_frames_untouched() {
        let mut t = track(&[150.0, 0.0, 300.0]);
        let before = (t.pitch[0], t.pitch[2]);
        fill_unvoiced(&mut t);
        assert_eq!((t.pitch[0], t.pitch[2]), before);
    }

    #[test]
    fn test_empty_track_is_left_alone() {
        let mut t = track(&[]);
        fill_unvoiced(&mut t);
        assert!(t.is_empty());
    }

    #[test]
    #[should_panic(expected = "no voiced frame on either side")]
    fn test_track_without_voiced_frame_panics() {
        let mut t = track(&[0.0, 50.0, 1200.0]);
        fill_unvoiced(&mut t);
    }
}
