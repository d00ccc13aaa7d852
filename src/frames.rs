// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! The canonical frame-sequence representation.
//!
//! A [`FrameSequence`] stores every frame of a recording as rows of an
//! `ndarray` array with shape `(frames, points, 2)`, so uniform frame length
//! holds by construction and per-frame transforms are slice operations.

use ndarray::{Array3, ArrayView2, ArrayView3, ArrayViewMut3, Axis, s};

use crate::error::{PoseError, Result};

/// A single 2D joint coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get the arithmetic midpoint between this point and another.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: f64::midpoint(self.x, other.x),
            y: f64::midpoint(self.y, other.y),
        }
    }
}

/// An ordered sequence of frames, each frame an ordered sequence of 2D
/// points indexed to match a [`Topology`](crate::Topology).
///
/// Backed by an array of shape `(num_frames, points_per_frame, 2)`, matching
/// how keypoint data is laid out throughout the library.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    data: Array3<f64>,
}

impl FrameSequence {
    /// Create an empty sequence (no frames, no points).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data: Array3::zeros((0, 0, 2)),
        }
    }

    /// Build a sequence from per-frame point lists.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] if frames have inconsistent
    /// lengths. Ragged input indicates a resolver or normalizer defect, not
    /// a user input error.
    pub fn from_frames(frames: &[Vec<Point>]) -> Result<Self> {
        let num_frames = frames.len();
        let points_per_frame = frames.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(num_frames * points_per_frame * 2);
        for (i, frame) in frames.iter().enumerate() {
            if frame.len() != points_per_frame {
                return Err(PoseError::ShapeMismatch(format!(
                    "frame {i} has {} points, expected {points_per_frame}",
                    frame.len()
                )));
            }
            for point in frame {
                flat.push(point.x);
                flat.push(point.y);
            }
        }
        let data = Array3::from_shape_vec((num_frames, points_per_frame, 2), flat)
            .map_err(|e| PoseError::ShapeMismatch(e.to_string()))?;
        Ok(Self { data })
    }

    /// Get the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.shape()[0]
    }

    /// Check if the sequence has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of points per frame.
    #[must_use]
    pub fn points_per_frame(&self) -> usize {
        self.data.shape()[1]
    }

    /// Get one point from one frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame` or `index` is out of range.
    #[must_use]
    pub fn point(&self, frame: usize, index: usize) -> Point {
        Point::new(self.data[[frame, index, 0]], self.data[[frame, index, 1]])
    }

    /// Set one point in one frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame` or `index` is out of range.
    pub fn set_point(&mut self, frame: usize, index: usize, point: Point) {
        self.data[[frame, index, 0]] = point.x;
        self.data[[frame, index, 1]] = point.y;
    }

    /// Get a `(points, 2)` view of one frame.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn frame(&self, index: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), index)
    }

    /// Get a read-only view of the underlying `(frames, points, 2)` array.
    #[must_use]
    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Get a mutable view of the underlying `(frames, points, 2)` array.
    pub fn data_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.data.view_mut()
    }

    /// Append one point to every frame, uniformly, as the new highest index.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeMismatch`] if `points` does not supply
    /// exactly one point per frame.
    pub(crate) fn push_point_column(&mut self, points: &[Point]) -> Result<()> {
        if points.len() != self.len() {
            return Err(PoseError::ShapeMismatch(format!(
                "{} new points for {} frames",
                points.len(),
                self.len()
            )));
        }
        let (num_frames, points_per_frame, _) = self.data.dim();
        let mut data = Array3::zeros((num_frames, points_per_frame + 1, 2));
        data.slice_mut(s![.., ..points_per_frame, ..])
            .assign(&self.data);
        for (i, point) in points.iter().enumerate() {
            data[[i, points_per_frame, 0]] = point.x;
            data[[i, points_per_frame, 1]] = point.y;
        }
        self.data = data;
        Ok(())
    }

    /// Check that a point index is addressable in every frame.
    ///
    /// Vacuously true for an empty sequence, which flows through every
    /// pipeline stage untouched.
    pub(crate) fn check_point_index(&self, index: usize) -> Result<()> {
        if self.is_empty() || index < self.points_per_frame() {
            Ok(())
        } else {
            Err(PoseError::ShapeMismatch(format!(
                "point index {index} out of range for frames with {} points",
                self.points_per_frame()
            )))
        }
    }
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence() {
        let seq = FrameSequence::empty();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.points_per_frame(), 0);
    }

    #[test]
    fn test_from_frames() {
        let seq = FrameSequence::from_frames(&[
            vec![Point::new(0.1, 0.2), Point::new(0.3, 0.4)],
            vec![Point::new(0.5, 0.6), Point::new(0.7, 0.8)],
        ])
        .unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.points_per_frame(), 2);
        assert_eq!(seq.point(1, 0), Point::new(0.5, 0.6));
    }

    #[test]
    fn test_ragged_frames_rejected() {
        let result = FrameSequence::from_frames(&[
            vec![Point::new(0.0, 0.0)],
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        ]);
        assert!(matches!(result, Err(PoseError::ShapeMismatch(_))));
    }

    #[test]
    fn test_midpoint() {
        let mid = Point::new(0.0, 0.0).midpoint(Point::new(2.0, 2.0));
        assert_eq!(mid, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_push_point_column() {
        let mut seq = FrameSequence::from_frames(&[
            vec![Point::new(1.0, 1.0)],
            vec![Point::new(2.0, 2.0)],
        ])
        .unwrap();
        seq.push_point_column(&[Point::new(9.0, 9.0), Point::new(8.0, 8.0)])
            .unwrap();
        assert_eq!(seq.points_per_frame(), 2);
        assert_eq!(seq.point(0, 0), Point::new(1.0, 1.0));
        assert_eq!(seq.point(0, 1), Point::new(9.0, 9.0));
        assert_eq!(seq.point(1, 1), Point::new(8.0, 8.0));
    }

    #[test]
    fn test_push_point_column_wrong_count() {
        let mut seq = FrameSequence::from_frames(&[vec![Point::new(1.0, 1.0)]]).unwrap();
        assert!(seq.push_point_column(&[]).is_err());
    }

    #[test]
    fn test_check_point_index() {
        let seq = FrameSequence::from_frames(&[vec![Point::new(0.0, 0.0)]]).unwrap();
        assert!(seq.check_point_index(0).is_ok());
        assert!(seq.check_point_index(1).is_err());
        assert!(FrameSequence::empty().check_point_index(5).is_ok());
    }
}
