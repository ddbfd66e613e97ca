//! Static body definitions, loaded once at startup.
//!
//! Orbital elements from Standish (1992) / JPL approximate planetary positions.
//! Moon orbits are simplified circles about the host planet; moons listed
//! without one are shown but have no motion model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::error::SimError;
use crate::ephemeris::kepler::{KeplerElements, MoonOrbit};

/// Body kind as written in catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyClass {
    Star,
    Planet,
    Moon,
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    pub name: String,
    pub class: BodyClass,
    /// Host planet name (moons only).
    #[serde(default)]
    pub parent: Option<String>,
    pub radius_km: f64,
    #[serde(default)]
    pub mass_kg: f64,
    #[serde(default)]
    pub temperature_k: f64,
    /// Sidereal rotation period. Negative for retrograde spin.
    pub rotation_period_hours: f64,
    /// Sidereal orbital period. Zero for the star.
    #[serde(default)]
    pub orbital_period_days: f64,
    /// Prime meridian angle at J2000 (degrees).
    #[serde(default)]
    pub spin_epoch_deg: f64,
    #[serde(default)]
    pub elements: Option<KeplerElements>,
    #[serde(default)]
    pub moon_orbit: Option<MoonOrbit>,
}

/// Ordered list of bodies. Order is preserved into the registry, so
/// parents always precede their moons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyCatalog {
    pub bodies: Vec<BodyDesc>,
}

impl BodyCatalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let catalog: BodyCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn find(&self, name: &str) -> Option<&BodyDesc> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut planets: HashSet<&str> = HashSet::new();
        let mut stars = 0;

        for body in &self.bodies {
            if !seen.insert(body.name.as_str()) {
                return Err(SimError::InvalidCatalog(format!("duplicate body `{}`", body.name)));
            }
            if !(body.radius_km > 0.0) {
                return Err(SimError::InvalidCatalog(format!("`{}` needs a positive radius", body.name)));
            }
            match body.class {
                BodyClass::Star => stars += 1,
                BodyClass::Planet => {
                    planets.insert(body.name.as_str());
                }
                BodyClass::Moon => {
                    let parent = body.parent.as_deref().ok_or_else(|| {
                        SimError::InvalidCatalog(format!("moon `{}` has no parent", body.name))
                    })?;
                    if !planets.contains(parent) {
                        return Err(SimError::InvalidCatalog(format!(
                            "moon `{}` must follow its planet `{}`",
                            body.name, parent
                        )));
                    }
                }
            }
        }

        if stars != 1 {
            return Err(SimError::InvalidCatalog(format!("expected exactly one star, found {stars}")));
        }
        Ok(())
    }

    /// The built-in solar system: the Sun, nine planets and a handful of moons.
    pub fn builtin() -> Self {
        let mut bodies = vec![BodyDesc {
            name: "Sun".into(),
            class: BodyClass::Star,
            parent: None,
            radius_km: 695_700.0,
            mass_kg: 1.989e30,
            temperature_k: 5772.0,
            rotation_period_hours: 609.12,
            orbital_period_days: 0.0,
            spin_epoch_deg: 84.176,
            elements: None,
            moon_orbit: None,
        }];

        for p in PLANETS {
            bodies.push(BodyDesc {
                name: p.name.into(),
                class: BodyClass::Planet,
                parent: None,
                radius_km: p.radius_km,
                mass_kg: p.mass_kg,
                temperature_k: p.temperature_k,
                rotation_period_hours: p.rotation_hours,
                orbital_period_days: p.period_days,
                spin_epoch_deg: p.spin_epoch_deg,
                elements: Some(p.elements),
                moon_orbit: None,
            });
        }

        for m in MOONS {
            bodies.push(BodyDesc {
                name: m.name.into(),
                class: BodyClass::Moon,
                parent: Some(m.parent.into()),
                radius_km: m.radius_km,
                mass_kg: m.mass_kg,
                temperature_k: m.temperature_k,
                rotation_period_hours: m.rotation_hours,
                orbital_period_days: m.period_days,
                spin_epoch_deg: m.spin_epoch_deg,
                elements: None,
                moon_orbit: m.orbit,
            });
        }

        Self { bodies }
    }
}

// ── Built-in data ────────────────────────────────────────────────────

struct PlanetRow {
    name: &'static str,
    radius_km: f64,
    mass_kg: f64,
    temperature_k: f64,
    rotation_hours: f64,
    period_days: f64,
    spin_epoch_deg: f64,
    elements: KeplerElements,
}

struct MoonRow {
    name: &'static str,
    parent: &'static str,
    radius_km: f64,
    mass_kg: f64,
    temperature_k: f64,
    rotation_hours: f64,
    period_days: f64,
    spin_epoch_deg: f64,
    orbit: Option<MoonOrbit>,
}

#[allow(clippy::too_many_arguments)]
const fn elements(a0: f64, e0: f64, i0: f64, l0: f64, l_dot: f64, w0: f64, w_dot: f64, node0: f64) -> KeplerElements {
    KeplerElements { a0, e0, i0, l0, l_dot, w0, w_dot, node0 }
}

const fn circle(distance_au: f64, inclination_deg: f64, phase_deg: f64) -> Option<MoonOrbit> {
    Some(MoonOrbit { distance_au, inclination_deg, phase_deg })
}

#[rustfmt::skip]
const PLANETS: [PlanetRow; 9] = [
    PlanetRow { name: "Mercury", radius_km: 2439.7, mass_kg: 3.301e23, temperature_k: 440.0, rotation_hours: 1407.6, period_days: 87.969, spin_epoch_deg: 329.5469,
        elements: elements(0.38709927, 0.20563593, 7.00497902, 252.25032350, 149472.67411175, 77.45779628, 0.16047689, 48.33076593) },
    PlanetRow { name: "Venus", radius_km: 6051.8, mass_kg: 4.867e24, temperature_k: 737.0, rotation_hours: -5832.5, period_days: 224.701, spin_epoch_deg: 160.20,
        elements: elements(0.72333566, 0.00677672, 3.39467605, 181.97909950, 58517.81538729, 131.60246718, 0.00268329, 76.67984255) },
    PlanetRow { name: "Earth", radius_km: 6371.0, mass_kg: 5.972e24, temperature_k: 288.0, rotation_hours: 23.9345, period_days: 365.256, spin_epoch_deg: 190.147,
        elements: elements(1.00000261, 0.01671123, -0.00001531, 100.46457166, 35999.37244981, 102.93768193, 0.32327364, 0.0) },
    PlanetRow { name: "Mars", radius_km: 3389.5, mass_kg: 6.417e23, temperature_k: 210.0, rotation_hours: 24.6229, period_days: 686.980, spin_epoch_deg: 176.630,
        elements: elements(1.52371034, 0.09339410, 1.84969142, -4.55343205, 19140.30268499, -23.94362959, 0.44441088, 49.55953891) },
    PlanetRow { name: "Jupiter", radius_km: 69911.0, mass_kg: 1.898e27, temperature_k: 165.0, rotation_hours: 9.925, period_days: 4332.589, spin_epoch_deg: 284.95,
        elements: elements(5.20288700, 0.04838624, 1.30439695, 34.39644051, 3034.74612775, 14.72847983, 0.21252668, 100.47390909) },
    PlanetRow { name: "Saturn", radius_km: 58232.0, mass_kg: 5.683e26, temperature_k: 134.0, rotation_hours: 10.656, period_days: 10759.22, spin_epoch_deg: 38.90,
        elements: elements(9.53667594, 0.05386179, 2.48599187, 49.95424423, 1222.49362201, 92.59887831, -0.41897216, 113.66242448) },
    PlanetRow { name: "Uranus", radius_km: 25362.0, mass_kg: 8.681e25, temperature_k: 76.0, rotation_hours: -17.24, period_days: 30685.4, spin_epoch_deg: 203.81,
        elements: elements(19.18916464, 0.04725744, 0.77263783, 313.23810451, 428.48202785, 170.95427630, 0.40805281, 74.01692503) },
    PlanetRow { name: "Neptune", radius_km: 24622.0, mass_kg: 1.024e26, temperature_k: 72.0, rotation_hours: 16.11, period_days: 60189.0, spin_epoch_deg: 249.978,
        elements: elements(30.06992276, 0.00859048, 1.77004347, -55.12002969, 218.45945325, 44.96476227, -0.32241464, 131.78422574) },
    PlanetRow { name: "Pluto", radius_km: 1188.3, mass_kg: 1.303e22, temperature_k: 44.0, rotation_hours: -153.29, period_days: 90560.0, spin_epoch_deg: 302.695,
        elements: elements(39.48211675, 0.24882730, 17.14001206, 238.92903833, 145.20780515, 224.06891629, -0.04062942, 110.30393684) },
];

#[rustfmt::skip]
const MOONS: [MoonRow; 12] = [
    MoonRow { name: "Moon", parent: "Earth", radius_km: 1737.4, mass_kg: 7.342e22, temperature_k: 250.0, rotation_hours: 655.72, period_days: 27.3217, spin_epoch_deg: 38.3213, orbit: circle(0.00257, 5.145, 125.0) },
    MoonRow { name: "Phobos", parent: "Mars", radius_km: 11.27, mass_kg: 1.0659e16, temperature_k: 233.0, rotation_hours: 7.66, period_days: 0.31891, spin_epoch_deg: 0.0, orbit: circle(0.0000627, 1.08, 35.0) },
    MoonRow { name: "Deimos", parent: "Mars", radius_km: 6.2, mass_kg: 1.4762e15, temperature_k: 233.0, rotation_hours: 30.35, period_days: 1.26244, spin_epoch_deg: 0.0, orbit: circle(0.000157, 1.79, 210.0) },
    MoonRow { name: "Io", parent: "Jupiter", radius_km: 1821.6, mass_kg: 8.932e22, temperature_k: 110.0, rotation_hours: 42.46, period_days: 1.769138, spin_epoch_deg: 200.39, orbit: circle(0.00282, 0.05, 84.0) },
    MoonRow { name: "Europa", parent: "Jupiter", radius_km: 1560.8, mass_kg: 4.800e22, temperature_k: 102.0, rotation_hours: 85.23, period_days: 3.551181, spin_epoch_deg: 36.022, orbit: circle(0.00449, 0.47, 171.0) },
    MoonRow { name: "Ganymede", parent: "Jupiter", radius_km: 2634.1, mass_kg: 1.482e23, temperature_k: 110.0, rotation_hours: 171.71, period_days: 7.154553, spin_epoch_deg: 44.064, orbit: circle(0.00716, 0.20, 317.0) },
    MoonRow { name: "Callisto", parent: "Jupiter", radius_km: 2410.3, mass_kg: 1.076e23, temperature_k: 134.0, rotation_hours: 400.54, period_days: 16.689018, spin_epoch_deg: 259.51, orbit: circle(0.01259, 0.19, 182.0) },
    MoonRow { name: "Titan", parent: "Saturn", radius_km: 2574.7, mass_kg: 1.345e23, temperature_k: 94.0, rotation_hours: 382.69, period_days: 15.945, spin_epoch_deg: 186.5855, orbit: circle(0.00817, 0.35, 11.0) },
    MoonRow { name: "Titania", parent: "Uranus", radius_km: 788.4, mass_kg: 3.4e21, temperature_k: 70.0, rotation_hours: 208.94, period_days: 8.706, spin_epoch_deg: 0.0, orbit: None },
    MoonRow { name: "Oberon", parent: "Uranus", radius_km: 761.4, mass_kg: 3.08e21, temperature_k: 75.0, rotation_hours: 323.12, period_days: 13.463, spin_epoch_deg: 0.0, orbit: None },
    MoonRow { name: "Triton", parent: "Neptune", radius_km: 1353.4, mass_kg: 2.14e22, temperature_k: 38.0, rotation_hours: -141.04, period_days: 5.877, spin_epoch_deg: 296.53, orbit: circle(0.00237, 156.885, 264.0) },
    MoonRow { name: "Charon", parent: "Pluto", radius_km: 606.0, mass_kg: 1.586e21, temperature_k: 53.0, rotation_hours: 153.29, period_days: 6.387, spin_epoch_deg: 122.695, orbit: circle(0.000131, 0.0, 0.0) },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let catalog = BodyCatalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.bodies.len(), 1 + PLANETS.len() + MOONS.len());
        assert_eq!(catalog.bodies[0].class, BodyClass::Star);
    }

    #[test]
    fn builtin_has_unmodelled_moons() {
        let catalog = BodyCatalog::builtin();
        let titania = catalog.find("Titania").unwrap();
        assert!(titania.moon_orbit.is_none());
        assert_eq!(titania.parent.as_deref(), Some("Uranus"));
    }

    #[test]
    fn moon_before_parent_is_rejected() {
        let json = r#"{ "bodies": [
            { "name": "Sun", "class": "Star", "radius_km": 10.0, "rotation_period_hours": 1.0 },
            { "name": "Luna", "class": "Moon", "parent": "Terra", "radius_km": 1.0, "rotation_period_hours": 1.0 },
            { "name": "Terra", "class": "Planet", "radius_km": 2.0, "rotation_period_hours": 1.0 }
        ] }"#;
        let err = BodyCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, SimError::InvalidCatalog(_)), "{err}");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"{ "bodies": [
            { "name": "Sun", "class": "Star", "radius_km": 10.0, "rotation_period_hours": 1.0 },
            { "name": "Sun", "class": "Planet", "radius_km": 2.0, "rotation_period_hours": 1.0 }
        ] }"#;
        assert!(BodyCatalog::from_json(json).is_err());
    }

    #[test]
    fn needs_exactly_one_star() {
        let json = r#"{ "bodies": [
            { "name": "Terra", "class": "Planet", "radius_km": 2.0, "rotation_period_hours": 1.0 }
        ] }"#;
        assert!(BodyCatalog::from_json(json).is_err());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = BodyCatalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
