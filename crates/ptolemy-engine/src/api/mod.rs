pub mod params;
pub mod simulation;
pub mod types;
