use glam::DVec3;

use crate::api::types::BodyId;

/// Closed polyline approximating one revolution of `owner`.
///
/// Built wholesale by the orbit-line pass; never patched in place. An empty
/// point list means the line is currently removed from the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitLine {
    pub owner: BodyId,
    pub points: Vec<DVec3>,
    pub visible: bool,
    /// Number of samples per revolution. The closing point is extra.
    pub segments: usize,
}

impl OrbitLine {
    pub fn new(owner: BodyId, segments: usize) -> Self {
        Self {
            owner,
            points: Vec::new(),
            visible: false,
            segments: segments.max(2),
        }
    }

    /// Discard the old buffer and take `points` as the new loop.
    pub fn replace(&mut self, points: Vec<DVec3>) {
        debug_assert_eq!(points.first(), points.last());
        self.points = points;
        self.visible = !self.points.is_empty();
    }

    /// Take the line out of the scene.
    pub fn remove(&mut self) {
        self.points.clear();
        self.visible = false;
    }

    pub fn is_built(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }
}
