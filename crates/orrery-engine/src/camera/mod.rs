pub mod controller;
pub mod perspective;
pub mod zoom;

pub use controller::{CameraController, CameraMode};
pub use perspective::{PerspectiveCamera, Ray};
pub use zoom::{ZoomAnimation, ZoomToken};
