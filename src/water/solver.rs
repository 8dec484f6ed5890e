//! Explicit finite-difference integrator for the 2D wave equation.

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::field::WaveField;
use crate::params::WaterPhysics;

/// Advances a [`WaveField`] by fixed steps of the discretized wave
/// equation `d2h/dt2 = v^2 * laplacian(h)` and injects random raindrops.
///
/// Writing into the buffer that still holds the heights from two steps
/// ago gives the leapfrog form of the scheme; the per-cell damping
/// multiply absorbs energy near the tank walls.
///
/// Stability is the caller's responsibility: `velocity`, `step_duration`
/// and the grid spacing must keep the Courant coefficient small enough
/// that `2 - 4a` stays non-negative. No CFL check is performed at runtime
/// so the numerical behavior stays predictable.
pub struct WaveSolver {
    /// Courant coefficient `a = v^2 * dt^2 / h^2`
    coeff_a: f32,
    /// Center weight `b = 2 - 4a`
    coeff_b: f32,
    drop_probability: f32,
    drop_height: f32,
    rng: StdRng,
}

impl WaveSolver {
    /// Build a solver for the given parameters. Each solver owns its own
    /// seeded generator so fixed-seed runs replay bit-identically.
    pub fn new(physics: &WaterPhysics) -> Result<Self, String> {
        physics.validate()?;

        // Domain is normalized to [-1, 1] on both axes
        let h = 2.0 / (physics.grid_size as f32 - 1.0);
        let dt = physics.step_duration_s;
        let a = physics.wave_velocity * physics.wave_velocity * dt * dt / (h * h);

        let rng = match physics.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            coeff_a: a,
            coeff_b: 2.0 - 4.0 * a,
            drop_probability: physics.drop_probability,
            drop_height: physics.drop_height,
            rng,
        })
    }

    /// Run exactly one integration step.
    ///
    /// The boundary ring is never touched by the stencil (fixed-edge
    /// behavior); raindrop indices are drawn from the full range, so an
    /// edge cell can receive a drop that then never decays.
    pub fn step(&mut self, field: &mut WaveField) {
        let n = field.grid_size();
        let a = self.coeff_a;
        let b = self.coeff_b;

        {
            let (damping, curr, next) = field.stencil_buffers();

            for i in 1..n - 1 {
                for j in 1..n - 1 {
                    let idx = i * n + j;
                    let neighbors =
                        curr[idx + n] + curr[idx - n] + curr[idx - 1] + curr[idx + 1];
                    // next[idx] still holds the height from two steps ago
                    next[idx] = damping[idx] * (a * neighbors + b * curr[idx] - next[idx]);
                }
            }
        }

        field.swap();

        // Raindrop impact, landing in the buffer the next step reads
        if self.rng.gen::<f32>() < self.drop_probability {
            let i = self.rng.gen_range(0..n);
            let j = self.rng.gen_range(0..n);
            field.current_mut()[i * n + j] += self.drop_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics(seed: u64, drop_probability: f32) -> WaterPhysics {
        WaterPhysics {
            grid_size: 32,
            step_duration_s: 1.0 / 32.0,
            drop_probability,
            rng_seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_field_stays_zero_without_drops() {
        let p = physics(7, 0.0);
        let mut field = WaveField::new(&p).unwrap();
        let mut solver = WaveSolver::new(&p).unwrap();

        for _ in 0..100 {
            solver.step(&mut field);
        }
        assert!(field.current().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_determinism_with_fixed_seed() {
        let p = physics(42, 0.5);

        let run = || {
            let mut field = WaveField::new(&p).unwrap();
            let mut solver = WaveSolver::new(&p).unwrap();
            for _ in 0..50 {
                solver.step(&mut field);
            }
            field.current().to_vec()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_edges_immobile_under_stencil() {
        let p = physics(3, 0.0);
        let mut field = WaveField::new(&p).unwrap();
        let mut solver = WaveSolver::new(&p).unwrap();
        let n = field.grid_size();

        // Disturb the interior, then step; the boundary ring must not move.
        field.current_mut()[(n / 2) * n + n / 2] = 1.0;
        for _ in 0..20 {
            solver.step(&mut field);
        }

        for k in 0..n {
            assert_eq!(field.current()[k], 0.0);
            assert_eq!(field.current()[(n - 1) * n + k], 0.0);
            assert_eq!(field.current()[k * n], 0.0);
            assert_eq!(field.current()[k * n + n - 1], 0.0);
        }
    }

    #[test]
    fn test_disturbance_propagates_to_neighbors() {
        let p = physics(3, 0.0);
        let mut field = WaveField::new(&p).unwrap();
        let mut solver = WaveSolver::new(&p).unwrap();
        let n = field.grid_size();
        let c = n / 2;

        field.current_mut()[c * n + c] = 1.0;
        solver.step(&mut field);

        assert_ne!(field.current()[c * n + c + 1], 0.0);
        assert_ne!(field.current()[(c + 1) * n + c], 0.0);
    }

    #[test]
    fn test_drops_inject_energy() {
        let p = physics(11, 1.0);
        let mut field = WaveField::new(&p).unwrap();
        let mut solver = WaveSolver::new(&p).unwrap();

        solver.step(&mut field);

        let total: f32 = field.current().iter().map(|h| h.abs()).sum();
        assert!((total - p.drop_height).abs() < 1e-6);
    }

    #[test]
    fn test_amplitude_decays_toward_walls() {
        // A single interior disturbance with damping and no drops loses
        // energy over time.
        let p = physics(5, 0.0);
        let mut field = WaveField::new(&p).unwrap();
        let mut solver = WaveSolver::new(&p).unwrap();
        let n = field.grid_size();

        field.current_mut()[(n / 2) * n + n / 2] = 1.0;
        let initial: f32 = field.current().iter().map(|h| h * h).sum();

        for _ in 0..500 {
            solver.step(&mut field);
        }
        let remaining: f32 = field.current().iter().map(|h| h * h).sum();

        assert!(remaining < initial);
    }
}
