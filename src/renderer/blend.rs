use crate::error::LfError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How contributing shots are composited into an output pixel.
///
/// Both policies are deterministic for a fixed shot order: `NearestCamera`
/// breaks distance ties in favor of the earliest shot in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Arithmetic mean over all contributing shots.
    #[default]
    Average,
    /// Only the contributing shot whose camera is closest to the virtual
    /// camera.
    NearestCamera,
}

impl FromStr for BlendMode {
    type Err = LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" | "avg" => Ok(BlendMode::Average),
            "nearest" | "nearest_camera" => Ok(BlendMode::NearestCamera),
            other => Err(LfError::invalid_parameter(format!(
                "unknown blend mode '{other}' (expected 'average' or 'nearest')"
            ))),
        }
    }
}
