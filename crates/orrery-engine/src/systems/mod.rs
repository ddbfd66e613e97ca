pub mod labels;
pub mod motion;
pub mod orbit_lines;
pub mod render;
