// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Schema resolution for heterogeneous pose records.
//!
//! Several incompatible record shapes encode the same conceptual data: a
//! sequence of per-frame 2D joint coordinates. This module locates the pose
//! data by trying a fixed, ordered list of schema candidates; the first
//! candidate whose full key path resolves wins, with no merging across
//! candidates. Adding a new schema means adding a `Schema` variant and a
//! slot in the candidate list.

use serde_json::Value;

use crate::error::{PoseError, Result};
use crate::frames::{FrameSequence, Point};

/// Interleaved coordinate count per frame: 17 points, x/y pairs.
const INTERLEAVED_LEN: usize = 34;

/// A known record shape carrying per-frame pose data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schema {
    /// `golden_rep_poses`: items carry an interleaved coordinate list under
    /// `pose`.
    GoldenRepPoses,
    /// `golden_video_metadata.pose`: items are flat lists whose first
    /// element is a timestamp, followed by the interleaved coordinates.
    GoldenVideoMetadata,
    /// `user_poses`: items carry the interleaved list under `pose`.
    UserPoses,
    /// `record.results`: items carry the interleaved list under
    /// `input_pose.pose`.
    RecordResults,
    /// `results`: items carry joint objects with nested `position.x` /
    /// `position.y` under `input_pose.pose`; coordinates rounded to 3
    /// decimal places.
    Results,
}

/// Candidates in priority order. First full path match wins.
const CANDIDATES: [Schema; 5] = [
    Schema::GoldenRepPoses,
    Schema::GoldenVideoMetadata,
    Schema::UserPoses,
    Schema::RecordResults,
    Schema::Results,
];

impl Schema {
    /// Nested-key path from the record root to the item list.
    const fn path(self) -> &'static [&'static str] {
        match self {
            Self::GoldenRepPoses => &["golden_rep_poses"],
            Self::GoldenVideoMetadata => &["golden_video_metadata", "pose"],
            Self::UserPoses => &["user_poses"],
            Self::RecordResults => &["record", "results"],
            Self::Results => &["results"],
        }
    }

    /// Turn one path-selected item into a frame.
    fn frame(self, item: &Value) -> Result<Vec<Point>> {
        match self {
            Self::GoldenRepPoses | Self::UserPoses => {
                split_interleaved(as_array(item.get("pose"), "pose")?)
            }
            Self::GoldenVideoMetadata => {
                let values = as_array(Some(item), "pose item")?;
                if values.is_empty() {
                    return Err(PoseError::SchemaError(
                        "pose item missing leading timestamp".to_string(),
                    ));
                }
                // First element is a timestamp, not a coordinate.
                split_interleaved(&values[1..])
            }
            Self::RecordResults => {
                let pose = item.get("input_pose").and_then(|p| p.get("pose"));
                split_interleaved(as_array(pose, "input_pose.pose")?)
            }
            Self::Results => {
                let pose = item.get("input_pose").and_then(|p| p.get("pose"));
                as_array(pose, "input_pose.pose")?
                    .iter()
                    .map(joint_position)
                    .collect()
            }
        }
    }
}

/// Extract the per-frame joint-coordinate sequence from a raw record.
///
/// Candidates are tried strictly in priority order; a candidate is skipped
/// only when a key on its path is absent. Once a path fully resolves, that
/// candidate is used exclusively, and malformed items under it are surfaced
/// as errors rather than falling through to the next candidate.
///
/// # Errors
///
/// Returns [`PoseError::SchemaError`] if a resolved candidate's data is
/// structurally malformed.
///
/// # Returns
///
/// * The extracted sequence, or an empty sequence if no candidate resolves.
///   Callers must treat "no frames" as a valid outcome for unsupported
///   input.
pub fn extract_frames(record: &Value) -> Result<FrameSequence> {
    for schema in CANDIDATES {
        let Some(items) = lookup(record, schema.path()) else {
            continue;
        };
        let items = items.as_array().ok_or_else(|| {
            PoseError::SchemaError(format!("{} is not a list", schema.path().join(".")))
        })?;
        let mut frames = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let frame = schema.frame(item).map_err(|e| match e {
                PoseError::SchemaError(msg) => PoseError::SchemaError(format!(
                    "{} item {i}: {msg}",
                    schema.path().join(".")
                )),
                other => other,
            })?;
            frames.push(frame);
        }
        return FrameSequence::from_frames(&frames);
    }
    Ok(FrameSequence::empty())
}

/// Navigate a nested-key path; `None` as soon as any key is absent.
fn lookup<'a>(record: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(record, |value, key| value.get(key))
}

fn as_array<'a>(value: Option<&'a Value>, what: &str) -> Result<&'a [Value]> {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| PoseError::SchemaError(format!("{what} is not a list")))
}

/// Split an interleaved `[x0, y0, x1, y1, ..]` list into 17 points, in
/// original numeric order, unrounded.
fn split_interleaved(values: &[Value]) -> Result<Vec<Point>> {
    if values.len() < INTERLEAVED_LEN {
        return Err(PoseError::SchemaError(format!(
            "expected {INTERLEAVED_LEN} interleaved coordinates, got {}",
            values.len()
        )));
    }
    values[..INTERLEAVED_LEN]
        .chunks_exact(2)
        .map(|pair| {
            let x = as_number(&pair[0])?;
            let y = as_number(&pair[1])?;
            Ok(Point::new(x, y))
        })
        .collect()
}

/// Extract `(position.x, position.y)` from a joint object, each coordinate
/// rounded to 3 decimal places.
fn joint_position(joint: &Value) -> Result<Point> {
    let position = joint
        .get("position")
        .ok_or_else(|| PoseError::SchemaError("joint missing position".to_string()))?;
    let x = as_number(
        position
            .get("x")
            .ok_or_else(|| PoseError::SchemaError("position missing x".to_string()))?,
    )?;
    let y = as_number(
        position
            .get("y")
            .ok_or_else(|| PoseError::SchemaError("position missing y".to_string()))?,
    )?;
    Ok(Point::new(round3(x), round3(y)))
}

fn as_number(value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| PoseError::SchemaError(format!("expected a number, got {value}")))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
