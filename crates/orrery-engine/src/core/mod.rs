pub mod clock;
pub mod registry;
pub mod simulation;
pub mod state;
pub mod time;
