pub mod body;
pub mod label;
pub mod orbit_line;
