//! Height-field grid data model with double buffering and wall damping.

use crate::params::WaterPhysics;

/// RGBA encoding of the flat up-normal (0, 1, 0)
pub const FLAT_NORMAL_RGBA: [u8; 4] = [128, 255, 128, 255];

/// N x N water height field with two alternating height buffers, a
/// precomputed per-cell damping coefficient, and the derived normal map.
///
/// Buffer roles are tracked by a parity index: `current` is whatever the
/// solver last wrote, `next` still holds the heights from two steps ago.
/// Swapping roles flips the index instead of copying data.
pub struct WaveField {
    heights: [Vec<f32>; 2],
    damping: Vec<f32>,
    normal_map: Vec<u8>,
    current: usize,
    grid_size: usize,
}

impl WaveField {
    /// Allocate a zeroed field and precompute the damping coefficients
    pub fn new(physics: &WaterPhysics) -> Result<Self, String> {
        physics.validate()?;

        let n = physics.grid_size;
        let damping = Self::compute_damping(
            n,
            physics.max_damping,
            physics.damping_falloff_fraction,
        );

        let mut normal_map = Vec::with_capacity(n * n * 4);
        for _ in 0..n * n {
            normal_map.extend_from_slice(&FLAT_NORMAL_RGBA);
        }

        Ok(Self {
            heights: [vec![0.0; n * n], vec![0.0; n * n]],
            damping,
            normal_map,
            current: 0,
            grid_size: n,
        })
    }

    /// Per-cell damping from the Chebyshev distance to the nearest wall:
    /// 0 on the edge ring, ramping up to `max_damping` over
    /// `falloff_fraction` of the grid extent.
    fn compute_damping(n: usize, max_damping: f32, falloff_fraction: f32) -> Vec<f32> {
        let mut damping = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let wall_dist = i.min(j).min(n - 1 - i).min(n - 1 - j);
                let l = 2.0 * wall_dist as f32 / n as f32;
                damping[i * n + j] = max_damping * (l / falloff_fraction).min(1.0);
            }
        }
        damping
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn current(&self) -> &[f32] {
        &self.heights[self.current]
    }

    pub fn current_mut(&mut self) -> &mut [f32] {
        &mut self.heights[self.current]
    }

    /// Borrow the current buffer read-only and the next buffer writable,
    /// for a single stencil pass
    pub fn buffers_mut(&mut self) -> (&[f32], &mut [f32]) {
        let (a, b) = self.heights.split_at_mut(1);
        if self.current == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// Borrow damping, current and next together for a stencil pass
    pub fn stencil_buffers(&mut self) -> (&[f32], &[f32], &mut [f32]) {
        let (a, b) = self.heights.split_at_mut(1);
        let (curr, next) = if self.current == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        };
        (&self.damping, curr, next)
    }

    /// Flip buffer roles: the just-written next buffer becomes current
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }

    pub fn damping(&self) -> &[f32] {
        &self.damping
    }

    pub fn normal_map(&self) -> &[u8] {
        &self.normal_map
    }

    pub fn normal_map_mut(&mut self) -> &mut [u8] {
        &mut self.normal_map
    }

    /// Borrow the current heights read-only and the normal map writable,
    /// for a reconstruction pass
    pub fn heights_and_normals_mut(&mut self) -> (&[f32], &mut [u8]) {
        (&self.heights[self.current], &mut self.normal_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_physics() -> WaterPhysics {
        WaterPhysics {
            grid_size: 64,
            step_duration_s: 1.0 / 64.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_construction_rejects_degenerate_grid() {
        let physics = WaterPhysics {
            grid_size: 1,
            ..Default::default()
        };
        assert!(WaveField::new(&physics).is_err());
    }

    #[test]
    fn test_buffers_start_zeroed() {
        let field = WaveField::new(&small_physics()).unwrap();
        assert!(field.current().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_damping_bounded_and_zero_at_walls() {
        let physics = small_physics();
        let field = WaveField::new(&physics).unwrap();
        let n = field.grid_size();

        for &d in field.damping() {
            assert!((0.0..=physics.max_damping).contains(&d));
        }

        // Edge ring absorbs fully
        for k in 0..n {
            assert_eq!(field.damping()[k], 0.0); // top row
            assert_eq!(field.damping()[(n - 1) * n + k], 0.0); // bottom row
            assert_eq!(field.damping()[k * n], 0.0); // left column
            assert_eq!(field.damping()[k * n + n - 1], 0.0); // right column
        }

        // Center sits at the configured maximum
        let c = n / 2;
        assert_eq!(field.damping()[c * n + c], physics.max_damping);
    }

    #[test]
    fn test_damping_monotone_toward_wall() {
        let field = WaveField::new(&small_physics()).unwrap();
        let n = field.grid_size();
        let mid = n / 2;
        for j in 0..mid {
            assert!(field.damping()[mid * n + j] <= field.damping()[mid * n + j + 1]);
        }
    }

    #[test]
    fn test_normal_map_initialized_flat() {
        let field = WaveField::new(&small_physics()).unwrap();
        for pixel in field.normal_map().chunks_exact(4) {
            assert_eq!(pixel, FLAT_NORMAL_RGBA);
        }
    }

    #[test]
    fn test_swap_flips_roles_without_copying() {
        let mut field = WaveField::new(&small_physics()).unwrap();
        let n = field.grid_size();

        {
            let (_, next) = field.buffers_mut();
            next[n + 1] = 0.5;
        }
        assert_eq!(field.current()[n + 1], 0.0);

        field.swap();
        assert_eq!(field.current()[n + 1], 0.5);

        field.swap();
        assert_eq!(field.current()[n + 1], 0.0);
    }
}
