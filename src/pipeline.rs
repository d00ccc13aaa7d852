// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! One-shot normalization pipeline.
//!
//! Packages the individual stages into the natural order for this domain:
//! resolve topology, extract frames, anchor to a reference joint, reflect
//! and scale, then optionally center, smooth, and insert synthetic
//! midpoints. Callers needing a different stage order compose the
//! [`normalize`](crate::normalize) functions directly.

use serde_json::Value;

use crate::error::Result;
use crate::frames::FrameSequence;
use crate::normalize;
use crate::schema::extract_frames;
use crate::topology::Topology;

/// Configuration for the normalization pipeline.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_normalize::NormalizeConfig;
///
/// let config = NormalizeConfig::new()
///     .with_reference("LEFT_HIP")
///     .with_scale_to_pixels(false)
///     .with_centering(true)
///     .with_smoothing(5)
///     .with_midpoint("LEFT_HIP", "RIGHT_HIP", "PELVIS");
/// ```
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Reference joint for per-frame anchoring. `None` skips the stage.
    pub reference: Option<String>,
    /// Whether the reflect stage also scales to the 720x1280 pixel canvas.
    pub scale_to_pixels: bool,
    /// Whether to center each frame's centroid at `(0.5, 0.5)`.
    pub center: bool,
    /// Trailing smoothing window size. `None` skips the stage.
    pub smoothing_window: Option<usize>,
    /// Synthetic midpoints to insert, in order, as `(a, b, new_name)`.
    pub midpoints: Vec<(String, String, String)>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            reference: None,
            // Source recordings target the pixel canvas by default.
            scale_to_pixels: true,
            center: false,
            smoothing_window: None,
            midpoints: Vec::new(),
        }
    }
}

impl NormalizeConfig {
    /// Create a new configuration with default values: pixel scaling on, no
    /// reference anchoring, centering, smoothing, or midpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor every frame to a reference joint before other stages.
    #[must_use]
    pub fn with_reference(mut self, name: &str) -> Self {
        self.reference = Some(name.to_string());
        self
    }

    /// Scale coordinates to the pixel canvas during reflection.
    #[must_use]
    pub const fn with_scale_to_pixels(mut self, scale: bool) -> Self {
        self.scale_to_pixels = scale;
        self
    }

    /// Center each frame's centroid at `(0.5, 0.5)`.
    #[must_use]
    pub const fn with_centering(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Smooth with a trailing moving average of the given window size.
    #[must_use]
    pub const fn with_smoothing(mut self, window_size: usize) -> Self {
        self.smoothing_window = Some(window_size);
        self
    }

    /// Insert the midpoint of `a` and `b` as a new named point. May be
    /// called repeatedly; midpoints are inserted in call order, so a later
    /// midpoint may use an earlier one as an endpoint.
    #[must_use]
    pub fn with_midpoint(mut self, a: &str, b: &str, name: &str) -> Self {
        self.midpoints
            .push((a.to_string(), b.to_string(), name.to_string()));
        self
    }
}

/// Output of the normalization pipeline: everything a renderer needs to
/// draw each frame as points connected by
/// [`Topology::skeleton_edges`].
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The normalized frame sequence.
    pub frames: FrameSequence,
    /// The topology the sequence is indexed by, including any synthetic
    /// points registered during normalization.
    pub topology: Topology,
}

/// Run the full pipeline on a raw record.
///
/// Resolves the topology from the record's metadata (or the built-in
/// default), extracts frames via schema resolution, and applies the
/// configured stages in the natural order: reference anchor, reflect/scale,
/// centering, smoothing, midpoints. An unsupported record normalizes to an
/// empty sequence, not an error.
///
/// # Errors
///
/// Returns an error if the record's data is structurally malformed under a
/// resolved schema, or if a configured stage names a body part the topology
/// does not contain.
pub fn normalize_record(record: &Value, config: &NormalizeConfig) -> Result<Normalized> {
    let mut topology = Topology::from_metadata(record)?;
    let mut frames = extract_frames(record)?;

    if let Some(reference) = &config.reference {
        normalize::anchor_to_reference(&mut frames, &topology, reference)?;
    }
    normalize::reflect(&mut frames, config.scale_to_pixels);
    if config.center {
        normalize::center_skeleton(&mut frames);
    }
    if let Some(window_size) = config.smoothing_window {
        frames = normalize::smooth(&frames, window_size);
    }
    for (a, b, name) in &config.midpoints {
        normalize::insert_midpoint(&mut frames, &mut topology, a, b, name)?;
    }

    Ok(Normalized { frames, topology })
}
