use crate::api::types::BodyId;
use crate::assets::config::SimConfig;
use crate::components::body::SizeMode;

/// Display switches owned by the simulation. Setters apply immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityToggles {
    pub moons: bool,
    pub labels: bool,
    pub orbit_lines: bool,
    pub size_mode: SizeMode,
}

impl Default for VisibilityToggles {
    fn default() -> Self {
        Self {
            moons: true,
            labels: true,
            orbit_lines: true,
            size_mode: SizeMode::Real,
        }
    }
}

impl VisibilityToggles {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            moons: config.show_moons,
            labels: config.show_labels,
            orbit_lines: config.show_orbit_lines,
            size_mode: if config.relative_size { SizeMode::Relative } else { SizeMode::Real },
        }
    }
}

/// Selection and toggles, passed explicitly into every per-frame pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationState {
    /// At most one selected body.
    pub selection: Option<BodyId>,
    pub toggles: VisibilityToggles,
}

impl SimulationState {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            selection: None,
            toggles: VisibilityToggles::from_config(config),
        }
    }

    pub fn is_selected(&self, id: BodyId) -> bool {
        self.selection == Some(id)
    }
}
