pub mod instance;

pub use instance::{BodyInstance, CameraUniform, FrameBuffer, LabelInstance, LineRange, LineVertex};
