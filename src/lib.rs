// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Pose Normalize
//!
//! Library for normalizing heterogeneous 2D human-pose recordings into a
//! single canonical representation suitable for visualization and kinematic
//! analysis.
//!
//! Pose-estimation backends and export pipelines disagree about how to
//! persist the same conceptual data: a sequence of per-frame joint
//! coordinates. This crate reconciles the known record shapes into one
//! [`FrameSequence`], normalizes its geometry (reference anchoring,
//! reflection and pixel scaling, centroid centering, temporal smoothing,
//! synthetic midpoints), and derives kinematic features (positional traces,
//! velocities, joint angles).
//!
//! ## Features
//!
//! - **Schema Reconciliation** - Five known record shapes resolved in
//!   priority order; unsupported input degrades to an empty sequence
//! - **Geometric Normalization** - Pure, composable transforms with a
//!   caller-determined stage order
//! - **Kinematic Analysis** - Traces, discrete-gradient velocity, and
//!   three-point joint angles in degrees
//! - **Topology Aware** - Name-to-index body-part table with a built-in
//!   17-part default and a fixed skeleton edge catalogue for rendering
//!
//! ## Quick Start
//!
//! ```rust
//! use pose_normalize::{NormalizeConfig, normalize_record};
//! use pose_normalize::kinematics::{joint_angles, trace, velocity};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A record as handed over by the loading collaborator.
//!     let pose: Vec<f64> = (0..34).map(|i| f64::from(i) / 34.0).collect();
//!     let record = json!({
//!         "user_poses": [
//!             {"pose": pose.clone()},
//!             {"pose": pose},
//!         ]
//!     });
//!
//!     let config = NormalizeConfig::new()
//!         .with_scale_to_pixels(false)
//!         .with_smoothing(5)
//!         .with_midpoint("LEFT_HIP", "RIGHT_HIP", "PELVIS");
//!     let normalized = normalize_record(&record, &config)?;
//!
//!     // Everything a renderer needs: points plus skeleton edges.
//!     for (a, b) in normalized.topology.skeleton_edges() {
//!         println!("connect point {a} to point {b}");
//!     }
//!
//!     // Kinematic features for analysis.
//!     let wrist = trace(&normalized.frames, &normalized.topology, "LEFT_WRIST")?;
//!     let (vx, vy) = velocity(&wrist);
//!     let elbow = joint_angles(
//!         &normalized.frames,
//!         &normalized.topology,
//!         "LEFT_SHOULDER",
//!         "LEFT_ELBOW",
//!         "LEFT_WRIST",
//!     )?;
//!     println!("{} frames, elbow angle {:.1} deg", vx.len(), elbow[0]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`topology`] | Body-part name-to-index table and skeleton edge catalogue |
//! | [`schema`] | Schema resolution for heterogeneous raw records |
//! | [`frames`] | Canonical [`FrameSequence`] representation |
//! | [`normalize`] | Geometric normalization stages |
//! | [`kinematics`] | Traces, velocity, and joint angles |
//! | [`pipeline`] | [`NormalizeConfig`] and the one-shot pipeline |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |
//!
//! ## Scope
//!
//! The crate consumes already-estimated joint coordinates as in-memory
//! records; it is not a pose-estimation model, owns no file format, and
//! leaves rendering to its consumers.

// Modules
pub mod error;
pub mod frames;
pub mod kinematics;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod topology;

// Re-export main types for convenience
pub use error::{PoseError, Result};
pub use frames::{FrameSequence, Point};
pub use kinematics::Trace;
pub use pipeline::{NormalizeConfig, Normalized, normalize_record};
pub use schema::extract_frames;
pub use topology::{SKELETON, Topology};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
