use bytemuck::{Pod, Zeroable};

/// Per-body render data read by the JS/GPU renderer.
/// 8 floats = 32 bytes stride. Positions are relative to the frame origin.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Display radius in scene units.
    pub radius: f32,
    /// Spin about Y in radians.
    pub rotation_y: f32,
    /// Registry index, for texture lookup.
    pub body_index: f32,
    /// 1.0 when selected.
    pub selected: f32,
    /// 0 = star, 1 = planet, 2 = moon.
    pub kind: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Camera-facing label sprite. 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LabelInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub scale: f32,
    /// Billboard rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    pub body_index: f32,
    pub _pad: [f32; 3],
}

impl LabelInstance {
    pub const FLOATS: usize = 12;
}

/// One orbit-line vertex. 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// 1.0 when the owning body is selected (highlighted line).
    pub highlight: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 4;
}

/// A contiguous run of [`LineVertex`] forming one closed orbit line.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct LineRange {
    pub first: u32,
    pub count: u32,
    pub owner: u32,
    pub _pad: u32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Eye position relative to the frame origin, w = 1.
    pub eye: [f32; 4],
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    pub bodies: Vec<BodyInstance>,
    /// Visible labels only.
    pub labels: Vec<LabelInstance>,
    pub line_vertices: Vec<LineVertex>,
    pub line_ranges: Vec<LineRange>,
    pub camera: CameraUniform,
    /// Scene-space point all f32 positions are relative to.
    pub origin: [f64; 3],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(32),
            labels: Vec::with_capacity(32),
            line_vertices: Vec::with_capacity(4096),
            line_ranges: Vec::with_capacity(32),
            camera: CameraUniform::default(),
            origin: [0.0; 3],
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.labels.clear();
        self.line_vertices.clear();
        self.line_ranges.clear();
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    pub fn label_count(&self) -> u32 {
        self.labels.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.line_vertices.len() as u32
    }

    pub fn line_range_count(&self) -> u32 {
        self.line_ranges.len() as u32
    }

    /// Raw pointers for zero-copy reads from wasm memory.
    pub fn bodies_ptr(&self) -> *const f32 {
        self.bodies.as_ptr() as *const f32
    }

    pub fn labels_ptr(&self) -> *const f32 {
        self.labels.as_ptr() as *const f32
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.line_vertices.as_ptr() as *const f32
    }

    pub fn line_ranges_ptr(&self) -> *const u32 {
        self.line_ranges.as_ptr() as *const u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }
}
