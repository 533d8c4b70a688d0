//! Editor preferences consumed by the map renderer

use serde::{Deserialize, Serialize};

use super::Config;
use crate::foundation::math::Color;

/// Colors and alphas used to style render batches
///
/// Missing keys in a preference file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Fill color of unselected brush faces
    pub face_color: Color,
    /// Edge color of unselected brushes
    pub edge_color: Color,
    /// Edge color of selected objects
    pub selected_edge_color: Color,
    /// Edge color of selected objects hidden behind other geometry
    pub occluded_selected_edge_color: Color,
    /// Tint applied to selected faces
    pub selected_face_color: Color,
    /// Bounds color of entities without a definition
    pub undefined_entity_color: Color,
    /// Color of entity angle indicators
    pub angle_indicator_color: Color,
    /// Info overlay text color
    pub info_overlay_text_color: Color,
    /// Info overlay background color
    pub info_overlay_background_color: Color,
    /// Info overlay text color for selected objects
    pub selected_info_overlay_text_color: Color,
    /// Info overlay background color for selected objects
    pub selected_info_overlay_background_color: Color,
    /// Alpha used for transparent faces
    pub transparent_face_alpha: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            face_color: Color::rgb(0.2, 0.2, 0.2),
            edge_color: Color::rgb(0.7, 0.7, 0.7),
            selected_edge_color: Color::rgb(1.0, 0.0, 0.0),
            occluded_selected_edge_color: Color::new(1.0, 0.0, 0.0, 0.4),
            selected_face_color: Color::rgb(1.0, 0.85, 0.85),
            undefined_entity_color: Color::rgb(0.5, 0.5, 0.5),
            angle_indicator_color: Color::rgb(1.0, 1.0, 1.0),
            info_overlay_text_color: Color::rgb(1.0, 1.0, 1.0),
            info_overlay_background_color: Color::new(0.0, 0.0, 0.0, 0.6),
            selected_info_overlay_text_color: Color::rgb(1.0, 1.0, 1.0),
            selected_info_overlay_background_color: Color::new(1.0, 0.0, 0.0, 0.6),
            transparent_face_alpha: 0.4,
        }
    }
}

impl Config for Preferences {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigFormat};

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = "transparent_face_alpha = 0.25\n\n[edge_color]\nr = 0.0\ng = 1.0\nb = 0.0\na = 1.0\n";
        let prefs = Preferences::from_str_as(text, ConfigFormat::Toml).unwrap();

        assert_eq!(prefs.transparent_face_alpha, 0.25);
        assert_eq!(prefs.edge_color, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(prefs.face_color, Preferences::default().face_color);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = std::env::temp_dir().join(format!("map_engine_prefs_{}.ron", std::process::id()));
        let mut prefs = Preferences::default();
        prefs.selected_edge_color = Color::rgb(0.0, 0.5, 1.0);

        prefs.save_to_file(&path).unwrap();
        let loaded = Preferences::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Preferences::load_from_file("preferences.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
