//! Per-batch color and overlay configuration

use crate::config::Preferences;
use crate::foundation::math::Color;

/// How a render batch colors what it draws
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchStyle {
    /// Info overlay text
    pub overlay_text_color: Color,
    /// Info overlay background
    pub overlay_background_color: Color,
    /// Whether faces are tinted
    pub tint: bool,
    /// Tint applied to faces when `tint` is set
    pub tint_color: Color,
    /// Alpha of transparent faces
    pub transparency_alpha: f32,
    /// Draw objects hidden behind other geometry
    pub show_occluded_objects: bool,
    /// Edge color of occluded objects
    pub occluded_edge_color: Color,
    /// Use `entity_bounds_color` for every entity instead of its class color
    pub override_entity_bounds_color: bool,
    /// Entity bounding box color
    pub entity_bounds_color: Color,
    /// Draw entity angle indicators
    pub show_entity_angles: bool,
    /// Entity angle indicator color
    pub entity_angle_color: Color,
    /// Brush face color
    pub brush_face_color: Color,
    /// Brush edge color
    pub brush_edge_color: Color,
}

impl BatchStyle {
    /// Muted style of a layer batch
    pub fn layer(prefs: &Preferences) -> Self {
        Self {
            overlay_text_color: prefs.info_overlay_text_color,
            overlay_background_color: prefs.info_overlay_background_color,
            tint: false,
            transparency_alpha: prefs.transparent_face_alpha,
            entity_bounds_color: prefs.undefined_entity_color,
            brush_face_color: prefs.face_color,
            brush_edge_color: prefs.edge_color,
            ..Self::default()
        }
    }

    /// Highlighted style of the selection batch
    pub fn selection(prefs: &Preferences) -> Self {
        Self {
            overlay_text_color: prefs.selected_info_overlay_text_color,
            overlay_background_color: prefs.selected_info_overlay_background_color,
            show_occluded_objects: true,
            occluded_edge_color: prefs.occluded_selected_edge_color,
            tint: true,
            tint_color: prefs.selected_face_color,
            transparency_alpha: prefs.transparent_face_alpha,
            override_entity_bounds_color: true,
            entity_bounds_color: prefs.selected_edge_color,
            show_entity_angles: true,
            entity_angle_color: prefs.angle_indicator_color,
            brush_face_color: prefs.face_color,
            brush_edge_color: prefs.selected_edge_color,
        }
    }

    /// Tint the selection colors toward `color`
    ///
    /// The occluded edge color is derived from the selected face color, like
    /// the tint.
    pub fn override_selection_colors(&mut self, prefs: &Preferences, color: Color, mix: f32) {
        let edge_color = prefs.selected_edge_color.mixed(&color, mix);
        let face_color = prefs.selected_face_color.mixed(&color, mix);

        self.entity_bounds_color = edge_color;
        self.brush_edge_color = edge_color;
        self.occluded_edge_color = face_color;
        self.tint_color = face_color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layer_and_selection_profiles_differ() {
        let prefs = Preferences::default();
        let layer = BatchStyle::layer(&prefs);
        let selection = BatchStyle::selection(&prefs);

        assert!(!layer.tint);
        assert!(!layer.show_occluded_objects);
        assert!(selection.tint);
        assert!(selection.show_occluded_objects);
        assert_eq!(layer.brush_edge_color, prefs.edge_color);
        assert_eq!(selection.brush_edge_color, prefs.selected_edge_color);
        assert_eq!(selection.tint_color, prefs.selected_face_color);
    }

    #[test]
    fn test_override_mixes_toward_color() {
        let prefs = Preferences::default();
        let mut style = BatchStyle::selection(&prefs);
        let red = Color::rgb(1.0, 0.0, 0.0);

        style.override_selection_colors(&prefs, red, 1.0);
        assert_eq!(style.brush_edge_color, red);
        assert_relative_eq!(style.tint_color.r, 1.0);
        assert_relative_eq!(style.tint_color.g, 0.0);

        style.override_selection_colors(&prefs, red, 0.0);
        assert_eq!(style.brush_edge_color, prefs.selected_edge_color);
        assert_eq!(style, {
            let mut expected = BatchStyle::selection(&prefs);
            expected.occluded_edge_color = prefs.selected_face_color;
            expected
        });
    }
}
