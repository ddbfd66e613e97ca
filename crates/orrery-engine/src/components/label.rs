use glam::{DQuat, DVec3};

/// Camera-facing text sprite attached to a body.
/// Position, scale and orientation are rewritten each frame by the label pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub visible: bool,
    pub position: DVec3,
    /// World-space height of the sprite.
    pub scale: f64,
    /// Billboard orientation (the camera's).
    pub rotation: DQuat,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            position: DVec3::ZERO,
            scale: 1.0,
            rotation: DQuat::IDENTITY,
        }
    }
}
