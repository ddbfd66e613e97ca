use crate::api::types::BodyId;

/// Requests from the UI layer (buttons, sliders, body list, date field).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TogglePlayPause,
    /// Multiply the clock speed.
    SetSpeed(f64),
    /// Set the clock speed outright (slider).
    SetRate(f64),
    /// User-edited date text. Ignored if it does not parse.
    SetDateText(String),
    /// `None` clears the selection.
    Select(Option<BodyId>),
    SelectByName(String),
    SetMoonsVisible(bool),
    SetLabelsVisible(bool),
    SetOrbitLinesVisible(bool),
    SetRelativeSize(bool),
    ResetView,
}

/// Input event types the simulation understands.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at viewport pixel (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/click ended at viewport pixel (x, y).
    PointerUp { x: f32, y: f32 },
    /// A touch/cursor moved to viewport pixel (x, y).
    PointerMove { x: f32, y: f32 },
    /// Wheel or pinch. Positive moves away from the target.
    Wheel { delta: f32 },
    /// Viewport resized (CSS pixels).
    Resize { width: f32, height: f32 },
    Command(Command),
}

/// A queue of input events.
/// The bridge pushes events as they arrive; the simulation drains them at
/// the start of each frame.
#[derive(Debug)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn command(&mut self, command: Command) {
        self.events.push(InputEvent::Command(command));
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
