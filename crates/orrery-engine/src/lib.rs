pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod camera;
pub mod ephemeris;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::error::SimError;
pub use api::sinks::{CoreSinks, DisplaySink, FeedbackSink, Notification, Outbox, SelectionSink};
pub use api::types::{BodyId, ClickKind, SimEvent};
pub use assets::catalog::{BodyCatalog, BodyClass, BodyDesc};
pub use assets::config::SimConfig;
pub use camera::{CameraController, CameraMode, PerspectiveCamera, ZoomToken};
pub use components::body::{BodyKind, CelestialBody, SizeMode};
pub use components::label::Label;
pub use components::orbit_line::OrbitLine;
pub use core::clock::{format_date, parse_date_input, SimulationClock, TimeController};
pub use core::registry::BodyRegistry;
pub use core::simulation::Simulation;
pub use core::state::{SimulationState, VisibilityToggles};
pub use core::time::FixedTimestep;
pub use ephemeris::{AxisSpin, EphemerisProvider, KeplerEphemeris, SceneFrame};
pub use input::queue::{Command, InputEvent, InputQueue};
pub use renderer::instance::{BodyInstance, CameraUniform, FrameBuffer, LabelInstance, LineRange, LineVertex};

// Extensions: decoupled helpers
pub use extensions::{ease, lerp, Easing};
