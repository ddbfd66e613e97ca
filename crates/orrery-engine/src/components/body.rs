use glam::DVec3;

use crate::api::types::BodyId;
use crate::assets::catalog::{BodyClass, BodyDesc};
use crate::assets::config::SimConfig;
use crate::components::label::Label;
use crate::components::orbit_line::OrbitLine;

/// Kilometres per astronomical unit.
pub const AU_KM: f64 = 149_597_870.7;

/// How body radii map into scene units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// True scale relative to orbital distances.
    #[default]
    Real,
    /// Planets and moons exaggerated so they stay visible from afar.
    Relative,
}

/// Per-kind data. Moons hold a non-owning handle to their host planet.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    Star,
    Planet { orbit: OrbitLine },
    Moon { parent: BodyId, orbit: OrbitLine },
}

/// One orbiting/rotating entity. Created once at startup and never destroyed.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub id: BodyId,
    /// Unique. Also the key passed to the ephemeris provider.
    pub name: String,
    pub kind: BodyKind,
    pub radius_km: f64,
    /// Display radius in scene units for the current size mode.
    pub radius: f64,
    pub mass_kg: f64,
    pub temperature_k: f64,
    pub rotation_period_hours: f64,
    pub orbital_period_days: f64,
    /// Scene-space position, rewritten every frame.
    pub position: DVec3,
    /// Spin about the scene Y axis (radians, in [0, 2π)).
    pub rotation_y: f64,
    pub is_selected: bool,
    /// Rounded distance to the Sun (planets) or host planet (moons).
    /// Only maintained while selected.
    pub distance_to_parent_km: Option<f64>,
    pub label: Label,
    /// Set once the body has logged a degraded-fidelity warning.
    pub(crate) degraded: bool,
}

impl CelestialBody {
    /// Build a body from its catalog entry. `parent` must be resolved by the
    /// caller for moons.
    pub fn from_desc(id: BodyId, desc: &BodyDesc, parent: Option<BodyId>, config: &SimConfig) -> Self {
        let orbit = OrbitLine::new(id, config.orbit_segments);
        let kind = match (desc.class, parent) {
            (BodyClass::Star, _) => BodyKind::Star,
            (BodyClass::Planet, _) => BodyKind::Planet { orbit },
            (BodyClass::Moon, Some(parent)) => BodyKind::Moon { parent, orbit },
            // Catalog validation guarantees moons have a parent.
            (BodyClass::Moon, None) => BodyKind::Planet { orbit },
        };
        let size_mode = if config.relative_size { SizeMode::Relative } else { SizeMode::Real };

        let mut body = Self {
            id,
            name: desc.name.clone(),
            kind,
            radius_km: desc.radius_km,
            radius: 0.0,
            mass_kg: desc.mass_kg,
            temperature_k: desc.temperature_k,
            rotation_period_hours: desc.rotation_period_hours,
            orbital_period_days: desc.orbital_period_days,
            position: DVec3::ZERO,
            rotation_y: 0.0,
            is_selected: false,
            distance_to_parent_km: None,
            label: Label::new(desc.name.clone()),
            degraded: false,
        };
        body.apply_size_mode(size_mode, config);
        body
    }

    pub fn is_star(&self) -> bool {
        matches!(self.kind, BodyKind::Star)
    }

    pub fn is_moon(&self) -> bool {
        matches!(self.kind, BodyKind::Moon { .. })
    }

    /// Host planet, for moons.
    pub fn parent(&self) -> Option<BodyId> {
        match self.kind {
            BodyKind::Moon { parent, .. } => Some(parent),
            _ => None,
        }
    }

    pub fn orbit(&self) -> Option<&OrbitLine> {
        match &self.kind {
            BodyKind::Star => None,
            BodyKind::Planet { orbit } | BodyKind::Moon { orbit, .. } => Some(orbit),
        }
    }

    pub fn orbit_mut(&mut self) -> Option<&mut OrbitLine> {
        match &mut self.kind {
            BodyKind::Star => None,
            BodyKind::Planet { orbit } | BodyKind::Moon { orbit, .. } => Some(orbit),
        }
    }

    /// Display radius for `mode`. Stars keep their real size in both modes.
    pub fn display_radius(&self, mode: SizeMode, config: &SimConfig) -> f64 {
        let real = self.radius_km / AU_KM * config.world_scale;
        match mode {
            SizeMode::Relative if !self.is_star() => real * config.relative_size_scale,
            _ => real,
        }
    }

    pub fn apply_size_mode(&mut self, mode: SizeMode, config: &SimConfig) {
        self.radius = self.display_radius(mode, config);
    }
}
