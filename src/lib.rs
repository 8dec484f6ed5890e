//! Wavetank library - fixed-step water surface simulation

pub mod cli;
pub mod clock;
pub mod params;
pub mod publish;
pub mod rendering;
pub mod water;
