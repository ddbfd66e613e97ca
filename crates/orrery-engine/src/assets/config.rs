use serde::{Deserialize, Serialize};

use crate::extensions::easing::Easing;

/// Tunables for the simulation core. Every field has a default, so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Scene units per astronomical unit.
    pub world_scale: f64,
    /// Rotation about X applied to every ephemeris vector (degrees).
    pub ecliptic_tilt_deg: f64,
    /// Sample count per orbit line (the closing point is added on top).
    pub orbit_segments: usize,
    /// Moon orbit lines are only rebuilt within this camera distance.
    pub orbit_line_max_distance: f64,
    /// Moon labels are hidden beyond this camera distance.
    pub moon_label_max_distance: f64,
    /// Label scale per unit of camera distance.
    pub label_scale: f64,
    /// Label height above the body, in body radii.
    pub label_offset_factor: f64,
    /// Tracking min-distance, in body radii.
    pub min_distance_factor: f64,
    /// Reselect zoom target distance, in body radii.
    pub zoom_distance_factor: f64,
    pub zoom_steps: u32,
    /// Delay between zoom interpolation steps (real seconds).
    pub zoom_step_seconds: f32,
    pub zoom_easing: Easing,
    /// Speed restored by play/pause toggling.
    pub default_speed: f64,
    /// RFC 3339 start date. `None` starts at the wall-clock time.
    pub start_date: Option<String>,
    /// Radius multiplier for non-star bodies in relative size mode.
    pub relative_size_scale: f64,
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub initial_camera_position: [f64; 3],
    pub max_distance: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Pointer travel (pixels) before a press becomes a drag.
    pub drag_threshold_px: f32,
    /// Orbit gesture sensitivity (radians per pixel).
    pub rotate_speed: f64,
    /// Dolly factor per wheel unit.
    pub zoom_speed: f64,
    pub show_moons: bool,
    pub show_labels: bool,
    pub show_orbit_lines: bool,
    pub relative_size: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_scale: 1000.0,
            ecliptic_tilt_deg: -110.0,
            orbit_segments: 200,
            orbit_line_max_distance: 2000.0,
            moon_label_max_distance: 300.0,
            label_scale: 0.03,
            label_offset_factor: 1.5,
            min_distance_factor: 1.1,
            zoom_distance_factor: 3.0,
            zoom_steps: 30,
            zoom_step_seconds: 0.01,
            zoom_easing: Easing::Linear,
            default_speed: 1.0,
            start_date: None,
            relative_size_scale: 2.5,
            fov_y_deg: 45.0,
            near: 1e-4,
            far: 1e6,
            initial_camera_position: [0.0, 3000.0, 6000.0],
            max_distance: 200_000.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            drag_threshold_px: 5.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            show_moons: true,
            show_labels: true,
            show_orbit_lines: true,
            relative_size: false,
        }
    }
}

impl SimConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SimConfig::from_json("{}").unwrap();
        assert_eq!(config.orbit_segments, 200);
        assert_eq!(config.ecliptic_tilt_deg, -110.0);
        assert_eq!(config.zoom_steps, 30);
        assert!(config.start_date.is_none());
    }

    #[test]
    fn overrides_named_fields_only() {
        let json = r#"{ "world_scale": 50.0, "zoom_easing": "QuadOut", "show_moons": false }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.world_scale, 50.0);
        assert_eq!(config.zoom_easing, Easing::QuadOut);
        assert!(!config.show_moons);
        assert_eq!(config.min_distance_factor, 1.1);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(SimConfig::from_json(r#"{ "orbit_segments": "many" }"#).is_err());
    }
}
