use bytemuck::{Pod, Zeroable};

/// Handle to a body in the [`BodyRegistry`](crate::core::registry::BodyRegistry).
/// Non-owning: the registry is the only owner of body data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Position of the body in registry order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fire-and-forget feedback cue for the audio layer.
/// The numeric value maps to a sound in the browser-side sound table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClickKind {
    Selection = 1,
    Toggle = 2,
    Settings = 3,
}

/// An event communicated from Rust to the browser through a flat f32 buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SimEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl SimEvent {
    pub const FLOATS: usize = 4;

    /// Simulated date: a = year, b = month, c = day.
    pub const DATE: f32 = 1.0;
    /// Clock state: a = speed, b = playing (1/0).
    pub const CLOCK: f32 = 2.0;
    /// Selection changed: a = body index or -1.
    pub const SELECTION: f32 = 3.0;
    /// Distance readout: a = body index, b = millions of km, c = remaining km.
    pub const DISTANCE: f32 = 4.0;
    /// Time of day following each `DATE`: a = hour, b = minute, c = second.
    pub const TIME: f32 = 5.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
