//! Editor settings

use serde::{Deserialize, Serialize};

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Maximum pick distance for vertex selection (world units)
    pub pick_radius: f32,
    /// Extrusion depth used when a shape has no explicit height
    pub default_depth: f64,
    /// Edge length of the drag-box marker
    pub marker_size: f32,
    /// Half-size of the square drawing surface
    pub ground_extent: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            pick_radius: 1.5,
            default_depth: 1.0,
            marker_size: 0.15,
            ground_extent: 5.0,
        }
    }
}

impl EditorSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "shapex", "shapex") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    return settings;
                }
            }
        }
        Self::default()
    }

    /// Save settings to file (best effort)
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "shapex", "shapex") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}
