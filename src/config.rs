use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::SCCAlgorithm;
use crate::error::SCCResult;

/// Buffer size used when reading graph files.
pub const READ_BUFFER_SIZE: usize = 1 << 20;

/// Upper bound on the records pre-allocated from a graph file header.
pub const HEADER_RESERVE_LIMIT: usize = 1 << 20;

/// Configuration for Strongly Connected Components (SCC) computation.
///
/// Every field has a default, so a YAML file only needs to name the values it
/// overrides:
///
/// ```yaml
/// thread_num: 3
/// algorithm: cheriyan-mehlhorn-gabow
/// validate: true
/// ```
///
/// # Fields
///
/// * `thread_num` - Number of threads used when several engines run side by side
/// * `algorithm` - Engine used for single-engine runs
/// * `validate` - Whether to check the returned partition against the graph
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SCCConfig {
    pub thread_num: usize,
    pub algorithm: SCCAlgorithm,
    pub validate: bool,
}

impl Default for SCCConfig {
    fn default() -> Self {
        Self {
            thread_num: 3,
            algorithm: SCCAlgorithm::Tarjan,
            validate: false,
        }
    }
}

impl SCCConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> SCCResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> SCCResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
