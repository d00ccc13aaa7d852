// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Body-part topology: the name-to-index table and the skeleton edge catalogue.
//!
//! A [`Topology`] maps body-part names to dense point indices and is the
//! single source of truth for how a [`FrameSequence`](crate::FrameSequence)
//! is laid out. It is built once per recording, either from the recording's
//! own metadata or from the built-in 17-part default, and only ever grows
//! (synthetic points append at the next unused index).

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{PoseError, Result};

/// Fixed catalogue of connective edges (skeletal segments) between body
/// parts, independent of any one recording's topology. An edge is drawable
/// only if both endpoint names exist in the current [`Topology`].
pub const SKELETON: [(&str, &str); 10] = [
    ("LEFT_SHOULDER", "LEFT_ELBOW"),
    ("LEFT_ELBOW", "LEFT_WRIST"),
    ("RIGHT_SHOULDER", "RIGHT_ELBOW"),
    ("RIGHT_ELBOW", "RIGHT_WRIST"),
    ("RIGHT_SHOULDER", "LEFT_SHOULDER"),
    ("RIGHT_HIP", "LEFT_HIP"),
    ("LEFT_HIP", "LEFT_KNEE"),
    ("LEFT_KNEE", "LEFT_FOOT"),
    ("RIGHT_HIP", "RIGHT_KNEE"),
    ("RIGHT_KNEE", "RIGHT_FOOT"),
];

/// The default 17-part table, used whenever a recording's metadata does not
/// carry its own node list.
const DEFAULT_PARTS: [&str; 17] = [
    "NOSE",
    "LEFT_EYE",
    "RIGHT_EYE",
    "LEFT_EAR",
    "RIGHT_EAR",
    "LEFT_SHOULDER",
    "RIGHT_SHOULDER",
    "LEFT_ELBOW",
    "RIGHT_ELBOW",
    "LEFT_WRIST",
    "RIGHT_WRIST",
    "LEFT_HIP",
    "RIGHT_HIP",
    "LEFT_KNEE",
    "RIGHT_KNEE",
    "LEFT_FOOT",
    "RIGHT_FOOT",
];

/// Body-part name to point-index registry.
///
/// Indices are dense from 0 and unique per name. The table is append-only:
/// [`Topology::register`] assigns the next unused index and nothing ever
/// removes or reorders entries, so point indices handed out earlier stay
/// valid for the life of the pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl Topology {
    /// Build a topology from a recording's metadata.
    ///
    /// If the record exposes a `used_nodes` list of `{name, index}` objects,
    /// the table is built directly from it. A missing or partially-shaped
    /// `used_nodes` key is not an error: many recording variants omit it
    /// entirely, so absence always falls back to the built-in default.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::DuplicatePartError`] if the node list names the
    /// same part twice, or [`PoseError::SchemaError`] if its indices are not
    /// dense from 0.
    pub fn from_metadata(metadata: &Value) -> Result<Self> {
        let Some(nodes) = metadata.get("used_nodes").and_then(Value::as_array) else {
            return Ok(Self::default());
        };

        let mut pairs = Vec::with_capacity(nodes.len());
        for node in nodes {
            let name = node.get("name").and_then(Value::as_str);
            let index = node.get("index").and_then(Value::as_u64);
            match (name, index) {
                (Some(name), Some(index)) => pairs.push((name.to_string(), index as usize)),
                // Partially-shaped node list: treat like a missing key.
                _ => return Ok(Self::default()),
            }
        }

        let mut names: Vec<Option<String>> = vec![None; pairs.len()];
        for (name, index) in pairs {
            let Some(slot) = names.get_mut(index) else {
                return Err(PoseError::SchemaError(format!(
                    "used_nodes index {index} out of range for {} nodes",
                    names.len()
                )));
            };
            if slot.is_some() {
                return Err(PoseError::SchemaError(format!(
                    "used_nodes assigns index {index} twice"
                )));
            }
            *slot = Some(name);
        }

        let mut topology = Self {
            names: Vec::with_capacity(names.len()),
            indices: HashMap::with_capacity(names.len()),
        };
        for name in names.into_iter().flatten() {
            topology.register(&name)?;
        }
        Ok(topology)
    }

    /// Get the point index for a body-part name.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::TopologyLookupError`] if the name is absent.
    /// Lookups are never silently defaulted: substituting a wrong joint
    /// would corrupt downstream geometry invisibly.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| PoseError::TopologyLookupError(name.to_string()))
    }

    /// Check whether a body-part name exists in the table.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Get the number of body parts in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get the body-part names in index order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Register a new body-part name at the next unused index.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::DuplicatePartError`] if the name already exists.
    pub fn register(&mut self, name: &str) -> Result<usize> {
        if self.indices.contains_key(name) {
            return Err(PoseError::DuplicatePartError(name.to_string()));
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), index);
        Ok(index)
    }

    /// Resolve the [`SKELETON`] catalogue against this table.
    ///
    /// # Returns
    ///
    /// * Index pairs for every catalogue edge whose both endpoints exist in
    ///   the table, ready for a renderer to connect.
    #[must_use]
    pub fn skeleton_edges(&self) -> Vec<(usize, usize)> {
        SKELETON
            .iter()
            .filter_map(|(a, b)| {
                let a = self.indices.get(*a)?;
                let b = self.indices.get(*b)?;
                Some((*a, *b))
            })
            .collect()
    }
}

impl Default for Topology {
    fn default() -> Self {
        let mut topology = Self {
            names: Vec::with_capacity(DEFAULT_PARTS.len()),
            indices: HashMap::with_capacity(DEFAULT_PARTS.len()),
        };
        for name in DEFAULT_PARTS {
            // Names in the built-in table are unique.
            let index = topology.names.len();
            topology.names.push(name.to_string());
            topology.indices.insert(name.to_string(), index);
        }
        topology
    }
}
