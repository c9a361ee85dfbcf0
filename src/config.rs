use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::accelerators::{LEAF_THRESHOLD, MAX_DEPTH};
use crate::error::{IndexError, Result};

/// Order in which the children of a branch are visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    /// Left then right, every child whose box the ray crosses.
    #[default]
    Unordered,
    /// Nearer child first; a child is skipped once its entry distance is
    /// beyond the closest hit found so far.
    NearFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub leaf_threshold: usize,
    pub max_depth: usize,
    pub traversal: TraversalOrder,
    /// Reject index lists that repeat or omit a primitive of the store.
    pub strict_coverage: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            leaf_threshold: LEAF_THRESHOLD,
            max_depth: MAX_DEPTH,
            traversal: TraversalOrder::Unordered,
            strict_coverage: false,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.leaf_threshold == 0 {
            return Err(IndexError::InvalidConfig(
                "leaf_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        debug!("loading index config from {}", path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }
}
