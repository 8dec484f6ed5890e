//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning constants live here with:
//! - Physical units (meters, seconds, etc.)
//! - Documented ranges and meanings
//! - Validation for values the solver cannot tolerate

/// Water tank simulation parameters
#[derive(Debug, Clone)]
pub struct WaterPhysics {
    /// Grid resolution (cells per side, e.g. 256 = 65,536 cells)
    pub grid_size: usize,

    /// Wave propagation speed in domain units per second
    /// (the grid spans [-1, 1] on both axes)
    pub wave_velocity: f32,

    /// Duration of one integration step (seconds)
    /// Default 1/grid_size, chosen so the explicit scheme stays stable
    /// at the default velocity
    pub step_duration_s: f32,

    /// Simulation speed multiplier (dimensionless, >= 0; 1.0 = real time)
    pub speed_multiplier: f32,

    /// Per-step probability of a raindrop landing somewhere on the grid
    /// (range [0, 1])
    pub drop_probability: f32,

    /// Height added to a cell struck by a raindrop (domain units)
    pub drop_height: f32,

    /// Maximum damping coefficient, reached away from the tank walls
    /// (range [0, 1]; 1.0 = lossless)
    pub max_damping: f32,

    /// Fraction of the grid extent over which damping ramps from 0 at the
    /// wall up to `max_damping`
    pub damping_falloff_fraction: f32,

    /// RNG seed for drop placement; `None` seeds from entropy.
    /// Fixed seeds make runs bit-reproducible given identical `advance`
    /// call sequences.
    pub rng_seed: Option<u64>,
}

impl Default for WaterPhysics {
    fn default() -> Self {
        let grid_size = 256;
        Self {
            grid_size,
            wave_velocity: 1.0,
            step_duration_s: 1.0 / grid_size as f32,
            speed_multiplier: 0.3,
            drop_probability: 0.2,
            drop_height: 0.25,
            max_damping: 0.95,
            damping_falloff_fraction: 0.2,
            rng_seed: None,
        }
    }
}

impl WaterPhysics {
    /// Validate configuration (grid must hold an interior, step must advance time)
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size <= 2 {
            return Err(format!(
                "Grid size must be > 2 to have interior cells, got {}",
                self.grid_size
            ));
        }
        if self.step_duration_s <= 0.0 {
            return Err(format!(
                "Step duration must be > 0, got {}",
                self.step_duration_s
            ));
        }
        if self.speed_multiplier < 0.0 {
            return Err(format!(
                "Speed multiplier must be >= 0, got {}",
                self.speed_multiplier
            ));
        }
        if !(0.0..=1.0).contains(&self.drop_probability) {
            return Err(format!(
                "Drop probability must be in [0, 1], got {}",
                self.drop_probability
            ));
        }
        if !(0.0..=1.0).contains(&self.max_damping) {
            return Err(format!(
                "Max damping must be in [0, 1], got {}",
                self.max_damping
            ));
        }
        if self.damping_falloff_fraction <= 0.0 {
            return Err(format!(
                "Damping falloff fraction must be > 0, got {}",
                self.damping_falloff_fraction
            ));
        }
        Ok(())
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1024,
            window_height: 1024,
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_physics_validates() {
        assert!(WaterPhysics::default().validate().is_ok());
    }

    #[test]
    fn test_degenerate_grid_rejected() {
        let physics = WaterPhysics {
            grid_size: 2,
            ..Default::default()
        };
        assert!(physics.validate().is_err());
    }

    #[test]
    fn test_non_positive_step_rejected() {
        let physics = WaterPhysics {
            step_duration_s: 0.0,
            ..Default::default()
        };
        assert!(physics.validate().is_err());
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let physics = WaterPhysics {
            drop_probability: 1.5,
            ..Default::default()
        };
        assert!(physics.validate().is_err());
    }
}
