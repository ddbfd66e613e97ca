use crate::api::error::SimError;
use crate::api::types::BodyId;
use crate::assets::catalog::BodyCatalog;
use crate::assets::config::SimConfig;
use crate::components::body::CelestialBody;

/// Arena owning every body. `BodyId(n)` is the n-th body in catalog order,
/// so hosts always precede their moons.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self { bodies: Vec::with_capacity(32) }
    }

    /// Build all bodies from a validated catalog.
    pub fn from_catalog(catalog: &BodyCatalog, config: &SimConfig) -> Result<Self, SimError> {
        catalog.validate()?;
        let mut registry = Self::new();
        for desc in &catalog.bodies {
            let parent = match desc.parent.as_deref() {
                Some(name) => Some(
                    registry
                        .find_by_name(name)
                        .map(|b| b.id)
                        .ok_or_else(|| SimError::UnknownBody(name.to_string()))?,
                ),
                None => None,
            };
            let id = registry.next_id();
            registry.spawn(CelestialBody::from_desc(id, desc, parent, config));
        }
        Ok(registry)
    }

    fn next_id(&self) -> BodyId {
        BodyId(self.bodies.len() as u32)
    }

    /// Add a body. Its id is overwritten with the arena slot.
    pub fn spawn(&mut self, mut body: CelestialBody) -> BodyId {
        let id = self.next_id();
        body.id = id;
        if let Some(orbit) = body.orbit_mut() {
            orbit.owner = id;
        }
        self.bodies.push(body);
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.index())
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> {
        (0..self.bodies.len() as u32).map(BodyId)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// The central star.
    pub fn star(&self) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.is_star())
    }

    /// Moons hosted by `planet`.
    pub fn moons_of(&self, planet: BodyId) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(move |b| b.parent() == Some(planet))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> BodyRegistry {
        BodyRegistry::from_catalog(&BodyCatalog::builtin(), &SimConfig::default()).unwrap()
    }

    #[test]
    fn ids_follow_catalog_order() {
        let registry = builtin();
        assert_eq!(registry.len(), BodyCatalog::builtin().bodies.len());
        for (i, body) in registry.iter().enumerate() {
            assert_eq!(body.id, BodyId(i as u32));
            if let Some(orbit) = body.orbit() {
                assert_eq!(orbit.owner, body.id);
            }
        }
    }

    #[test]
    fn moons_resolve_parent_handles() {
        let registry = builtin();
        let jupiter = registry.find_by_name("Jupiter").unwrap().id;
        let io = registry.find_by_name("Io").unwrap();
        assert_eq!(io.parent(), Some(jupiter));
        assert_eq!(registry.moons_of(jupiter).count(), 4);
    }

    #[test]
    fn star_lookup() {
        let registry = builtin();
        assert_eq!(registry.star().unwrap().name, "Sun");
        assert!(registry.get(BodyId(999)).is_none());
    }
}
