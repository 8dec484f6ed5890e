//! Normal-map reconstruction from the height field.
//!
//! Runs once per completed batch of solver steps, not per step, so the
//! cost is amortized when several physics ticks land in one frame.

use super::field::WaveField;

/// Guard against normalizing a degenerate gradient vector
const NORM_EPSILON: f32 = 1e-12;

/// Derives per-cell surface normals from finite-difference gradients and
/// packs them into the field's RGBA normal map (Blinn bump mapping).
pub struct NormalMapProjector;

impl NormalMapProjector {
    /// Recompute normals for every interior cell of the current height
    /// buffer. Edge cells keep the flat up-normal they were initialized
    /// with, matching the stencil's own edge exclusion.
    pub fn recompute(field: &mut WaveField) {
        let n = field.grid_size();
        let (heights, normal_map) = field.heights_and_normals_mut();

        for i in 1..n - 1 {
            for j in 1..n - 1 {
                // 1. Gradient via central differences of neighboring heights
                let mut dx = heights[n * i + (j - 1)] - heights[n * i + (j + 1)];
                let mut dy = 1.0_f32;
                let mut dz = heights[n * (i - 1) + j] - heights[n * (i + 1) + j];

                // 2. Normalize, falling back to straight up on a degenerate
                //    vector (unreachable while dy is fixed at 1)
                let norm = (dx * dx + dy * dy + dz * dz).sqrt();
                if norm > NORM_EPSILON {
                    dx /= norm;
                    dy /= norm;
                    dz /= norm;
                } else {
                    dx = 0.0;
                    dy = 1.0;
                    dz = 0.0;
                }

                // 3. [-1, 1] -> [0, 255]
                let idx = 4 * (i * n + j);
                normal_map[idx] = Self::encode(dx);
                normal_map[idx + 1] = Self::encode(dy);
                normal_map[idx + 2] = Self::encode(dz);
                normal_map[idx + 3] = 255;
            }
        }
    }

    fn encode(component: f32) -> u8 {
        ((component + 1.0) / 2.0 * 255.0).round() as u8
    }
}
