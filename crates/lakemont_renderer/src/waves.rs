//! CPU wave simulation over a regular height-field grid.
//!
//! Solves the 2-D wave equation with an explicit finite-difference stencil.
//! The three stencil coefficients are derived once at construction from wave
//! speed, damping, spatial step and timestep; the caller is responsible for
//! picking a timestep that keeps the scheme stable.  The simulation never
//! touches GPU resources — it only exposes per-vertex positions and normals
//! that the update pass streams into the current frame-resource slot.

use glam::Vec3;

pub struct Waves {
    rows: usize,
    cols: usize,
    time_step: f32,
    spatial_step: f32,
    // precomputed stencil coefficients
    k1: f32,
    k2: f32,
    k3: f32,
    // accumulated real time not yet consumed by internal steps
    t_accum: f32,
    prev: Vec<Vec3>,
    curr: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl Waves {
    /// Builds an `rows × cols` grid centred on the origin in the XZ plane.
    ///
    /// Panics if either dimension is zero.
    pub fn new(rows: usize, cols: usize, dx: f32, dt: f32, speed: f32, damping: f32) -> Self {
        assert!(rows >= 1 && cols >= 1, "wave grid must be at least 1x1");

        let d = damping * dt + 2.0;
        let e = (speed * speed) * (dt * dt) / (dx * dx);
        let k1 = (damping * dt - 2.0) / d;
        let k2 = (4.0 - 8.0 * e) / d;
        let k3 = (2.0 * e) / d;

        let half_width = 0.5 * (cols - 1) as f32 * dx;
        let half_depth = 0.5 * (rows - 1) as f32 * dx;

        let mut grid = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            let z = half_depth - i as f32 * dx;
            for j in 0..cols {
                let x = -half_width + j as f32 * dx;
                grid.push(Vec3::new(x, 0.0, z));
            }
        }

        Self {
            rows,
            cols,
            time_step: dt,
            spatial_step: dx,
            k1,
            k2,
            k3,
            t_accum: 0.0,
            prev: grid.clone(),
            normals: vec![Vec3::Y; rows * cols],
            curr: grid,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn vertex_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn triangle_count(&self) -> usize {
        (self.rows - 1) * (self.cols - 1) * 2
    }

    /// Total extent along X.
    pub fn width(&self) -> f32 {
        (self.cols - 1) as f32 * self.spatial_step
    }

    /// Total extent along Z.
    pub fn depth(&self) -> f32 {
        (self.rows - 1) as f32 * self.spatial_step
    }

    pub fn position(&self, index: usize) -> Vec3 {
        self.curr[index]
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        self.normals[index]
    }

    /// Perturbs cell `(i, j)` by `magnitude` and its four neighbours by half
    /// of it.  `(i, j)` must leave a margin of at least two cells to every
    /// border so the neighbour writes stay interior.
    pub fn disturb(&mut self, i: usize, j: usize, magnitude: f32) {
        debug_assert!(i >= 2 && i < self.rows - 2, "disturb row out of interior");
        debug_assert!(j >= 2 && j < self.cols - 2, "disturb column out of interior");

        let n = self.cols;
        let half = 0.5 * magnitude;
        self.curr[i * n + j].y += magnitude;
        self.curr[i * n + j + 1].y += half;
        self.curr[i * n + j - 1].y += half;
        self.curr[(i + 1) * n + j].y += half;
        self.curr[(i - 1) * n + j].y += half;
    }

    /// Advances the simulation by `dt` seconds of real time.  Internally runs
    /// zero or more fixed-size steps depending on how much time accumulated;
    /// `update(0.0)` is a no-op.
    pub fn update(&mut self, dt: f32) {
        self.t_accum += dt;
        while self.t_accum >= self.time_step {
            self.step();
            self.t_accum -= self.time_step;
        }
    }

    /// One finite-difference step plus the normal recomputation.
    fn step(&mut self) {
        let n = self.cols;

        // The stencil writes next-heights into `prev`, which after the swap
        // below becomes the new current buffer.  Border cells never move.
        for i in 1..self.rows - 1 {
            for j in 1..n - 1 {
                self.prev[i * n + j].y = self.k1 * self.prev[i * n + j].y
                    + self.k2 * self.curr[i * n + j].y
                    + self.k3
                        * (self.curr[(i + 1) * n + j].y
                            + self.curr[(i - 1) * n + j].y
                            + self.curr[i * n + j + 1].y
                            + self.curr[i * n + j - 1].y);
            }
        }
        std::mem::swap(&mut self.prev, &mut self.curr);

        // Approximate normals by central differences of neighbouring heights.
        // Border vertices keep their default +Y normal.
        for i in 1..self.rows - 1 {
            for j in 1..n - 1 {
                let left = self.curr[i * n + j - 1].y;
                let right = self.curr[i * n + j + 1].y;
                let bottom = self.curr[(i + 1) * n + j].y;
                let top = self.curr[(i - 1) * n + j].y;
                self.normals[i * n + j] =
                    Vec3::new(left - right, 2.0 * self.spatial_step, bottom - top).normalize();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_waves() -> Waves {
        Waves::new(128, 128, 1.0, 0.03, 4.0, 0.2)
    }

    #[test]
    fn zero_elapsed_time_changes_nothing() {
        let mut waves = demo_waves();
        waves.disturb(40, 40, 0.5);
        let heights: Vec<f32> = (0..waves.vertex_count())
            .map(|i| waves.position(i).y)
            .collect();
        let normals: Vec<Vec3> = (0..waves.vertex_count()).map(|i| waves.normal(i)).collect();

        waves.update(0.0);

        for i in 0..waves.vertex_count() {
            assert_eq!(waves.position(i).y, heights[i]);
            assert_eq!(waves.normal(i), normals[i]);
        }
    }

    #[test]
    fn disturb_touches_exactly_five_cells() {
        let mut waves = demo_waves();
        // get the field moving first so this is a mid-simulation disturb
        waves.disturb(30, 30, 0.4);
        waves.update(0.1);

        let before: Vec<f32> = (0..waves.vertex_count())
            .map(|i| waves.position(i).y)
            .collect();

        let (i, j, r) = (64usize, 64usize, 0.35f32);
        waves.disturb(i, j, r);

        let n = waves.cols();
        for idx in 0..waves.vertex_count() {
            let delta = waves.position(idx).y - before[idx];
            if idx == i * n + j {
                assert!((delta - r).abs() < 1e-6);
            } else if idx == i * n + j + 1
                || idx == i * n + j - 1
                || idx == (i + 1) * n + j
                || idx == (i - 1) * n + j
            {
                assert!((delta - 0.5 * r).abs() < 1e-6);
            } else {
                assert_eq!(delta, 0.0);
            }
        }
    }

    #[test]
    fn border_heights_stay_fixed_under_interior_disturbs() {
        let mut waves = demo_waves();
        for k in 0..50 {
            waves.disturb(4 + k % 100, 4 + (k * 7) % 100, 0.3);
            waves.update(0.05);
        }
        let n = waves.cols();
        for j in 0..n {
            assert_eq!(waves.position(j).y, 0.0);
            assert_eq!(waves.position((waves.rows() - 1) * n + j).y, 0.0);
        }
        for i in 0..waves.rows() {
            assert_eq!(waves.position(i * n).y, 0.0);
            assert_eq!(waves.position(i * n + n - 1).y, 0.0);
        }
    }

    #[test]
    fn update_consumes_accumulated_time_in_fixed_steps() {
        let mut a = demo_waves();
        let mut b = demo_waves();
        a.disturb(50, 50, 0.5);
        b.disturb(50, 50, 0.5);

        // one big slice of time vs. the same slice fed in pieces
        a.update(0.09);
        b.update(0.03);
        b.update(0.03);
        b.update(0.03);

        for i in 0..a.vertex_count() {
            assert!((a.position(i).y - b.position(i).y).abs() < 1e-6);
        }
    }
}
