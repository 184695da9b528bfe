use crate::CONFY_APP_NAME;
use crate::renderer::BlendMode;
use serde::{Deserialize, Serialize};

/// Persisted viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSettings {
    pub resolution: [u32; 2],
    pub blend_mode: BlendMode,
    pub background_color: [u8; 3],
    pub default_fovy: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            resolution: [512, 512],
            blend_mode: BlendMode::Average,
            background_color: [0, 0, 0],
            default_fovy: 60.0,
        }
    }
}

impl ViewerSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "viewer").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "viewer", self);
    }
}
