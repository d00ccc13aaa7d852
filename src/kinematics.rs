// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Kinematic feature extraction from a normalized frame sequence.
//!
//! Derives per-frame time series: positional traces for a named joint,
//! velocity via discrete differentiation, and joint angles via three-point
//! vector geometry. All outputs are index-aligned with the source sequence.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::Result;
use crate::frames::{FrameSequence, Point};
use crate::topology::Topology;

/// The time series of one body part's position across all frames.
///
/// Stores the positions as a `(frames, 2)` array with x/y column accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    data: Array2<f64>,
}

impl Trace {
    /// Get the number of samples (one per source frame).
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Check if the trace has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Get the x-coordinate series.
    #[must_use]
    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    /// Get the y-coordinate series.
    #[must_use]
    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.data.column(1)
    }

    /// Get the position at one frame.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn point(&self, index: usize) -> Point {
        Point::new(self.data[[index, 0]], self.data[[index, 1]])
    }
}

/// Extract the positional trace of a named body part.
///
/// # Errors
///
/// Returns [`PoseError::TopologyLookupError`](crate::PoseError) if the name
/// is absent from the topology at call time.
pub fn trace(seq: &FrameSequence, topology: &Topology, name: &str) -> Result<Trace> {
    let index = topology.index_of(name)?;
    seq.check_point_index(index)?;
    let mut data = Array2::zeros((seq.len(), 2));
    for i in 0..seq.len() {
        let point = seq.point(i, index);
        data[[i, 0]] = point.x;
        data[[i, 1]] = point.y;
    }
    Ok(Trace { data })
}

/// Differentiate a trace into per-axis velocity series.
///
/// Standard discrete-gradient semantics: forward difference at the first
/// sample, backward difference at the last, central difference in the
/// interior. An empty trace yields empty series; a single-sample trace
/// yields a single zero (no displacement is observable).
///
/// # Returns
///
/// * `(x_velocity, y_velocity)`, each the same length as the trace.
#[must_use]
pub fn velocity(trace: &Trace) -> (Array1<f64>, Array1<f64>) {
    (gradient(&trace.x()), gradient(&trace.y()))
}

fn gradient(values: &ArrayView1<'_, f64>) -> Array1<f64> {
    let n = values.len();
    if n < 2 {
        return Array1::zeros(n);
    }
    let mut out = Array1::zeros(n);
    out[0] = values[1] - values[0];
    out[n - 1] = values[n - 1] - values[n - 2];
    for i in 1..n - 1 {
        out[i] = (values[i + 1] - values[i - 1]) / 2.0;
    }
    out
}

/// Compute the per-frame angle at joint `b` formed with joints `a` and `c`.
///
/// Per frame, the angle between vectors `BA` and `BC` in degrees, in
/// `[0, 180]`. The cosine argument is clamped to `[-1, 1]` before the
/// inverse cosine, so floating-point drift cannot cause a domain error.
/// Coincident points (a zero-length vector) yield `NaN` for that frame; the
/// series stays frame-aligned rather than aborting.
///
/// # Errors
///
/// Returns [`PoseError::TopologyLookupError`](crate::PoseError) if any of
/// the three names is absent from the topology.
pub fn joint_angles(
    seq: &FrameSequence,
    topology: &Topology,
    a: &str,
    b: &str,
    c: &str,
) -> Result<Array1<f64>> {
    let index_a = topology.index_of(a)?;
    let index_b = topology.index_of(b)?;
    let index_c = topology.index_of(c)?;
    seq.check_point_index(index_a)?;
    seq.check_point_index(index_b)?;
    seq.check_point_index(index_c)?;
    let mut angles = Array1::zeros(seq.len());
    for i in 0..seq.len() {
        angles[i] = vertex_angle(
            seq.point(i, index_a),
            seq.point(i, index_b),
            seq.point(i, index_c),
        );
    }
    Ok(angles)
}

fn vertex_angle(a: Point, b: Point, c: Point) -> f64 {
    let (ba_x, ba_y) = (a.x - b.x, a.y - b.y);
    let (bc_x, bc_y) = (c.x - b.x, c.y - b.y);
    let magnitude_ba = ba_x.hypot(ba_y);
    let magnitude_bc = bc_x.hypot(bc_y);
    if magnitude_ba == 0.0 || magnitude_bc == 0.0 {
        return f64::NAN;
    }
    let cos = (ba_x * bc_x + ba_y * bc_y) / (magnitude_ba * magnitude_bc);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}
