// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Geometric normalization stages.
//!
//! Each stage is a pure pass over a [`FrameSequence`]: reference-relative
//! anchoring, vertical reflection with optional pixel scaling, centroid
//! centering, temporal smoothing, and synthetic-midpoint insertion. Stage
//! order is caller-determined; only smoothing depends on frame order, and
//! midpoint insertion requires its endpoints to already exist in the
//! topology.

use ndarray::{Axis, s};

use crate::error::{PoseError, Result};
use crate::frames::{FrameSequence, Point};
use crate::topology::Topology;

/// Target canvas width in pixels.
pub const CANVAS_WIDTH: f64 = 720.0;

/// Target canvas height in pixels.
pub const CANVAS_HEIGHT: f64 = 1280.0;

/// Default trailing window size for [`smooth`].
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Re-anchor every frame to a reference joint.
///
/// Per frame, every point shifts rigidly so the reference joint lands at
/// `(0.5, 0.5)` in normalized unit space. Compensates for the performer
/// drifting across the capture.
///
/// # Errors
///
/// Returns [`PoseError::TopologyLookupError`] if the reference name is
/// absent from the topology.
pub fn anchor_to_reference(
    seq: &mut FrameSequence,
    topology: &Topology,
    reference: &str,
) -> Result<()> {
    let index = topology.index_of(reference)?;
    seq.check_point_index(index)?;
    for mut frame in seq.data_mut().axis_iter_mut(Axis(0)) {
        let dx = frame[[index, 0]] - 0.5;
        let dy = frame[[index, 1]] - 0.5;
        for mut point in frame.rows_mut() {
            point[0] -= dx;
            point[1] -= dy;
        }
    }
    Ok(())
}

/// Reflect vertically and optionally scale to pixel space.
///
/// Per point, `y` becomes `1 - y` (source coordinates are upside-down). If
/// `scale_to_pixels` is set, coordinates are scaled to the 720x1280 canvas
/// and truncated toward zero (a deliberate floor, not rounding). Without
/// scaling the reflection is an involution.
pub fn reflect(seq: &mut FrameSequence, scale_to_pixels: bool) {
    for mut point in seq.data_mut().lanes_mut(Axis(2)) {
        point[1] = 1.0 - point[1];
        if scale_to_pixels {
            point[0] = (point[0] * CANVAS_WIDTH).trunc();
            point[1] = (point[1] * CANVAS_HEIGHT).trunc();
        }
    }
}

/// Center each frame's centroid at `(0.5, 0.5)`.
///
/// Uses the arithmetic mean over all points in the frame rather than a
/// single named joint, so it is idempotent.
pub fn center_skeleton(seq: &mut FrameSequence) {
    for mut frame in seq.data_mut().axis_iter_mut(Axis(0)) {
        let Some(centroid) = frame.mean_axis(Axis(0)) else {
            continue;
        };
        let dx = centroid[0] - 0.5;
        let dy = centroid[1] - 0.5;
        for mut point in frame.rows_mut() {
            point[0] -= dx;
            point[1] -= dy;
        }
    }
}

/// Smooth jitter with a trailing moving average.
///
/// Frames before `window_size` pass through unchanged: there is no
/// look-back history yet, and the resulting seam at the window boundary is
/// preserved as specified behavior. From `window_size` on, each point
/// becomes the mean of its own coordinates over frames
/// `i - window_size ..= i`. The output has the same frame count as the
/// input; smoothing of integer pixel input still produces fractional
/// output, so run this before any stage that expects integrality.
#[must_use]
pub fn smooth(seq: &FrameSequence, window_size: usize) -> FrameSequence {
    let mut out = seq.clone();
    let data = seq.data();
    let mut out_data = out.data_mut();
    for i in 0..seq.len() {
        if i < window_size {
            continue;
        }
        let window = data.slice(s![i - window_size..=i, .., ..]);
        if let Some(mean) = window.mean_axis(Axis(0)) {
            out_data.index_axis_mut(Axis(0), i).assign(&mean);
        }
    }
    drop(out_data);
    out
}

/// Append the midpoint of two named joints to every frame as a new point,
/// then register `name` in the topology at the new index.
///
/// Runs identically across every frame: frame length and topology size each
/// grow by exactly 1, keeping the length invariant intact. Nothing is
/// mutated on error.
///
/// # Errors
///
/// Returns [`PoseError::TopologyLookupError`] if either endpoint name is
/// absent, or [`PoseError::DuplicatePartError`] if `name` already exists.
pub fn insert_midpoint(
    seq: &mut FrameSequence,
    topology: &mut Topology,
    a: &str,
    b: &str,
    name: &str,
) -> Result<()> {
    let index_a = topology.index_of(a)?;
    let index_b = topology.index_of(b)?;
    seq.check_point_index(index_a)?;
    seq.check_point_index(index_b)?;
    if topology.contains(name) {
        return Err(PoseError::DuplicatePartError(name.to_string()));
    }
    let midpoints: Vec<Point> = (0..seq.len())
        .map(|i| seq.point(i, index_a).midpoint(seq.point(i, index_b)))
        .collect();
    seq.push_point_column(&midpoints)?;
    topology.register(name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_topology() -> Topology {
        Topology::from_metadata(&serde_json::json!({
            "used_nodes": [
                {"name": "A", "index": 0},
                {"name": "B", "index": 1},
            ]
        }))
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_anchor_to_reference() {
        let mut seq = FrameSequence::from_frames(&[
            vec![Point::new(0.9, 0.1), Point::new(0.7, 0.3)],
            vec![Point::new(0.2, 0.8), Point::new(0.4, 0.6)],
        ])
        .unwrap();
        let topology = two_point_topology();
        anchor_to_reference(&mut seq, &topology, "A").unwrap();

        // The reference joint lands at exactly (0.5, 0.5) in every frame.
        for i in 0..seq.len() {
            assert!(close(seq.point(i, 0).x, 0.5));
            assert!(close(seq.point(i, 0).y, 0.5));
        }
        // Other points carried along rigidly.
        assert!(close(seq.point(0, 1).x, 0.3));
        assert!(close(seq.point(0, 1).y, 0.7));
    }

    #[test]
    fn test_anchor_unknown_reference() {
        let mut seq = FrameSequence::from_frames(&[vec![Point::new(0.5, 0.5)]]).unwrap();
        let topology = Topology::default();
        assert!(anchor_to_reference(&mut seq, &topology, "MISSING").is_err());
    }

    #[test]
    fn test_reflect_is_involution_without_scaling() {
        let original = FrameSequence::from_frames(&[
            vec![Point::new(0.25, 0.75), Point::new(0.1, 0.9)],
        ])
        .unwrap();
        let mut seq = original.clone();
        reflect(&mut seq, false);
        assert!(close(seq.point(0, 0).y, 0.25));
        assert!(close(seq.point(0, 0).x, 0.25));
        reflect(&mut seq, false);
        for i in 0..2 {
            assert!(close(seq.point(0, i).x, original.point(0, i).x));
            assert!(close(seq.point(0, i).y, original.point(0, i).y));
        }
    }

    #[test]
    fn test_reflect_scales_and_truncates() {
        let mut seq = FrameSequence::from_frames(&[vec![Point::new(0.5015, 0.25)]]).unwrap();
        reflect(&mut seq, true);
        // x: 0.5015 * 720 = 361.08 truncated to 361.
        assert!(close(seq.point(0, 0).x, 361.0));
        // y: (1 - 0.25) * 1280 = 960.
        assert!(close(seq.point(0, 0).y, 960.0));
    }

    #[test]
    fn test_center_skeleton_is_idempotent() {
        let mut seq = FrameSequence::from_frames(&[
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.5)],
        ])
        .unwrap();
        center_skeleton(&mut seq);
        // Centroid was (0.5, 0.25); frame shifts by (0, +0.25).
        assert!(close(seq.point(0, 0).x, 0.0));
        assert!(close(seq.point(0, 0).y, 0.25));
        assert!(close(seq.point(0, 1).y, 0.75));

        let once = seq.clone();
        center_skeleton(&mut seq);
        assert_eq!(seq, once);
    }

    #[test]
    fn test_smooth_warm_up_and_window() {
        // 7 frames of a single point walking right: x = 0, 1, .., 6.
        let frames: Vec<Vec<Point>> = (0..7).map(|i| vec![Point::new(f64::from(i), 0.0)]).collect();
        let seq = FrameSequence::from_frames(&frames).unwrap();
        let smoothed = smooth(&seq, 5);

        assert_eq!(smoothed.len(), seq.len());
        // Frames 0..=4 pass through unchanged.
        for i in 0..5 {
            assert!(close(smoothed.point(i, 0).x, f64::from(i as u32)));
        }
        // Frame 5 is the mean of frames 0..=5: (0+1+2+3+4+5)/6 = 2.5.
        assert!(close(smoothed.point(5, 0).x, 2.5));
        // Frame 6 is the mean of frames 1..=6: 3.5.
        assert!(close(smoothed.point(6, 0).x, 3.5));
    }

    #[test]
    fn test_smooth_short_sequence_unchanged() {
        let frames: Vec<Vec<Point>> = (0..3).map(|i| vec![Point::new(f64::from(i), 0.0)]).collect();
        let seq = FrameSequence::from_frames(&frames).unwrap();
        assert_eq!(smooth(&seq, 5), seq);
    }

    #[test]
    fn test_insert_midpoint() {
        let mut seq = FrameSequence::from_frames(&[
            vec![Point::new(0.0, 0.0), Point::new(2.0, 2.0)],
            vec![Point::new(1.0, 0.0), Point::new(3.0, 4.0)],
        ])
        .unwrap();
        let mut topology = two_point_topology();
        insert_midpoint(&mut seq, &mut topology, "A", "B", "MID").unwrap();

        assert_eq!(seq.points_per_frame(), 3);
        assert_eq!(topology.len(), 3);
        assert_eq!(topology.index_of("MID").unwrap(), 2);
        assert_eq!(seq.point(0, 2), Point::new(1.0, 1.0));
        assert_eq!(seq.point(1, 2), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_insert_midpoint_duplicate_name() {
        let mut seq = FrameSequence::from_frames(&[
            vec![Point::new(0.0, 0.0), Point::new(2.0, 2.0)],
        ])
        .unwrap();
        let mut topology = two_point_topology();
        let err = insert_midpoint(&mut seq, &mut topology, "A", "B", "A").unwrap_err();
        assert!(matches!(err, PoseError::DuplicatePartError(_)));
        // Nothing mutated.
        assert_eq!(seq.points_per_frame(), 2);
        assert_eq!(topology.len(), 2);
    }

    #[test]
    fn test_stages_flow_through_empty_sequence() {
        let mut seq = FrameSequence::empty();
        let mut topology = Topology::default();
        anchor_to_reference(&mut seq, &topology, "NOSE").unwrap();
        reflect(&mut seq, true);
        center_skeleton(&mut seq);
        let mut seq = smooth(&seq, 5);
        insert_midpoint(&mut seq, &mut topology, "LEFT_HIP", "RIGHT_HIP", "PELVIS").unwrap();
        assert!(seq.is_empty());
        assert_eq!(topology.len(), 18);
    }
}
