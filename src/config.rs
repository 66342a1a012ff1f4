//! # World Configuration
//!
//! Tunable parameters for terrain generation, streaming and editing. Every
//! field has a default matching the stock world, so a JSON document only
//! needs to name the values it changes:
//!
//! ```json
//! { "seed": 7, "view_radius": 2 }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Parameters for one world instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed of the terrain noise field.
    pub seed: u32,
    /// Surface height where the terrain noise is zero.
    pub base_level: i32,
    /// Maximum surface deviation from `base_level`.
    pub amplitude: f64,
    /// Divisor applied to world X/Z before sampling terrain noise.
    pub terrain_scale: f64,
    /// Divisor applied to world X/Z before sampling vegetation noise.
    pub vegetation_scale: f64,
    /// Vegetation noise value above which a column grows a tree.
    pub tree_threshold: f64,
    /// Half-width of the square around an existing tree in which no other
    /// tree may be planted.
    pub tree_spacing: i32,
    /// Draw trunk heights from a generator seeded by the world seed and the
    /// column instead of an unseeded one, making chunks fully reproducible.
    pub deterministic_trees: bool,
    /// Streaming radius in chunks, applied on all three axes.
    pub view_radius: i32,
    /// Minimum wall-clock time between two streaming passes.
    pub streaming_interval_ms: u64,
    /// Maximum distance between observer and hit point for edits.
    pub interaction_range: f32,
    /// Upper bound on resident chunk data. `None` keeps every generated chunk
    /// for the whole session.
    pub max_resident_chunks: Option<usize>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 26539245,
            base_level: 32,
            amplitude: 8.0,
            terrain_scale: 50.0,
            vegetation_scale: 100.0,
            tree_threshold: 0.35,
            tree_spacing: 4,
            deterministic_trees: false,
            view_radius: 4,
            streaming_interval_ms: 100,
            interaction_range: 6.0,
            max_resident_chunks: None,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks values that would make generation or streaming meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.terrain_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "terrain_scale",
                reason: "must be positive",
            });
        }
        if !(self.vegetation_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "vegetation_scale",
                reason: "must be positive",
            });
        }
        if self.tree_spacing < 0 {
            return Err(ConfigError::Invalid {
                field: "tree_spacing",
                reason: "must not be negative",
            });
        }
        if self.view_radius < 0 {
            return Err(ConfigError::Invalid {
                field: "view_radius",
                reason: "must not be negative",
            });
        }
        if self.streaming_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "streaming_interval_ms",
                reason: "must be at least one millisecond",
            });
        }
        if !(self.interaction_range > 0.0) {
            return Err(ConfigError::Invalid {
                field: "interaction_range",
                reason: "must be positive",
            });
        }
        if self.max_resident_chunks == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_resident_chunks",
                reason: "must be at least one chunk",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "seed": 7, "view_radius": 2 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.view_radius, 2);
        assert_eq!(config.base_level, 32);
        assert_eq!(config.streaming_interval_ms, 100);
        assert_eq!(config.max_resident_chunks, None);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = WorldConfig::from_json_str("{ seed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = WorldConfig::from_json_str(r#"{ "terrain_scale": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "terrain_scale",
                ..
            }
        ));
        let err = WorldConfig::from_json_str(r#"{ "max_resident_chunks": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = WorldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
