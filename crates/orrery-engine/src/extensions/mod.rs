// extensions/mod.rs
//
// Optional helpers decoupled from the body registry.

pub mod easing;

pub use easing::{ease, lerp, Easing};
