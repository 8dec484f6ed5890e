//! Command-line argument parsing.

use clap::Parser;

use crate::params::{RecordingConfig, WaterPhysics};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Wavetank")]
#[command(about = "Fixed-step water surface simulation with normal-map output", long_about = None)]
pub struct Args {
    /// Grid resolution (cells per side)
    #[arg(long, value_name = "N", default_value = "256")]
    pub grid_size: usize,

    /// RNG seed for raindrop placement (omit for a random seed)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Simulation speed multiplier
    #[arg(long, value_name = "FACTOR", default_value = "0.3")]
    pub speed: f32,

    /// Per-step probability of a raindrop
    #[arg(long, value_name = "P", default_value = "0.2")]
    pub drop_probability: f32,

    /// Record normal-map frames to disk (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,
}

impl Args {
    /// Build simulation parameters from command-line overrides
    pub fn water_physics(&self) -> WaterPhysics {
        WaterPhysics {
            grid_size: self.grid_size,
            step_duration_s: 1.0 / self.grid_size as f32,
            speed_multiplier: self.speed,
            drop_probability: self.drop_probability,
            rng_seed: self.seed,
            ..Default::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Result<Option<RecordingConfig>, String> {
        match self.record {
            Some(duration) => {
                let config = RecordingConfig::new(duration);
                std::fs::create_dir_all(config.frames_dir())
                    .map_err(|e| format!("Failed to create frames directory: {}", e))?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }
}
