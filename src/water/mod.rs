//! Water surface simulation: fixed-step wave solver with normal-map output.

mod field;
mod normal_map;
mod solver;
mod system;

// Re-export public types
pub use field::{WaveField, FLAT_NORMAL_RGBA};
pub use normal_map::NormalMapProjector;
pub use solver::WaveSolver;
pub use system::WaterSystem;
