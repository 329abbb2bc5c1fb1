//! Per-frame CPU update: advances the ring, pushes dirty constants, writes
//! the pass constants and steps the wave simulation into the current slot's
//! dynamic vertex buffer.
//!
//! Everything here writes only into the slot returned by
//! [`FrameResourceRing::acquire_next`], which has already fenced out the GPU,
//! so no buffer is touched while a submitted frame still reads it.

use rand::Rng;

use lakemont_core::{Camera, Time};

use crate::frame::{FrameResourceRing, PassConstants};
use crate::geometry::Vertex;
use crate::scene::{update_material_constants, SceneAssets, SceneModel};
use crate::waves::Waves;

/// Seconds between random wave disturbances.
const DISTURB_PERIOD: f32 = 0.25;

pub struct UpdatePass {
    /// Elapsed time at which the last disturbance fired.
    t_base: f32,
    /// Reused staging buffer for the wave vertex upload.
    staging: Vec<Vertex>,
}

impl Default for UpdatePass {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdatePass {
    pub fn new() -> Self {
        Self {
            t_base: 0.0,
            staging: Vec::new(),
        }
    }

    /// Runs the whole CPU side of one frame, in fixed order: acquire the next
    /// ring slot, animate materials, push dirty object and material
    /// constants, write the pass constants, then step the waves.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        time: &Time,
        camera: &Camera,
        viewport: (u32, u32),
        scene: &mut SceneModel,
        assets: &mut SceneAssets,
        waves: &mut Waves,
        ring: &mut FrameResourceRing,
    ) {
        ring.acquire_next(device);

        scene.animate_materials(assets, time.delta);

        {
            let slot = ring.current();
            scene.update_object_constants(|i, data| slot.object_cb.write(queue, i, &data));
            update_material_constants(assets.materials_mut(), |i, data| {
                slot.material_cb.write(queue, i, &data)
            });
            slot.write_pass(queue, &pass_constants(time, camera, viewport));
        }

        self.update_waves(queue, time, scene, assets, waves, ring);
    }

    /// Kicks off a random ripple every quarter second, advances the
    /// simulation, and streams the solution into the current slot's vertex
    /// buffer.  The water geometry is repointed at that buffer so the draw
    /// pass reads the copy that matches this frame's constants.
    fn update_waves(
        &mut self,
        queue: &wgpu::Queue,
        time: &Time,
        scene: &SceneModel,
        assets: &mut SceneAssets,
        waves: &mut Waves,
        ring: &FrameResourceRing,
    ) {
        if time.elapsed as f32 - self.t_base >= DISTURB_PERIOD {
            self.t_base += DISTURB_PERIOD;

            let mut rng = rand::thread_rng();
            // keep a margin so the disturbance and its neighbours stay clear
            // of the fixed boundary
            let i = rng.gen_range(4..=waves.rows() - 5);
            let j = rng.gen_range(4..=waves.cols() - 5);
            let r = rng.gen_range(0.2..0.5);

            waves.disturb(i, j, r);
        }

        waves.update(time.delta);

        let slot = ring.current();
        self.staging.clear();
        self.staging.reserve(waves.vertex_count());
        for i in 0..waves.vertex_count() {
            let pos = waves.position(i);
            self.staging.push(Vertex {
                position: pos.to_array(),
                normal: waves.normal(i).to_array(),
                // map [-w/2, w/2] to [0, 1]
                tex: [
                    0.5 + pos.x / waves.width(),
                    0.5 - pos.z / waves.depth(),
                ],
            });
        }
        queue.write_buffer(&slot.waves_vb, 0, bytemuck::cast_slice(&self.staging));

        if let Some(water) = scene.water_item() {
            assets.geometry_mut(water.mesh).vertex_buffer = slot.waves_vb.clone();
        }
    }
}

/// Builds this frame's pass constants from the camera and clock.
fn pass_constants(time: &Time, camera: &Camera, (width, height): (u32, u32)) -> PassConstants {
    let view = camera.view();
    let proj = camera.proj();
    let view_proj = proj * view;

    let mut pc = PassConstants {
        view: view.to_cols_array_2d(),
        inv_view: view.inverse().to_cols_array_2d(),
        proj: proj.to_cols_array_2d(),
        inv_proj: proj.inverse().to_cols_array_2d(),
        view_proj: view_proj.to_cols_array_2d(),
        inv_view_proj: view_proj.inverse().to_cols_array_2d(),
        eye_pos: camera.position().to_array(),
        render_target_size: [width as f32, height as f32],
        inv_render_target_size: [1.0 / width as f32, 1.0 / height as f32],
        near_z: camera.znear,
        far_z: camera.zfar,
        total_time: time.elapsed as f32,
        delta_time: time.delta,
        ambient_light: [0.47, 0.47, 0.47, 1.2],
        fog_color: [0.7, 0.7, 0.7, 1.0],
        fog_start: 5.0,
        fog_range: 150.0,
        ..Default::default()
    };

    pc.lights[0].direction = [0.57735, -0.57735, 0.57735];
    pc.lights[0].strength = [1.2, 0.4, 0.4];
    pc.lights[1].direction = [-0.57735, -0.57735, 0.57735];
    pc.lights[1].strength = [0.02, 0.02, 0.02];
    pc.lights[2].direction = [0.0, -0.707, -0.707];
    pc.lights[2].strength = [1.1, 0.0, 0.2];
    pc.lights[2].spot_power = 1.7;
    pc.lights[3].position = [0.0, 10.0, 0.0];
    pc.lights[3].direction = [0.0, 0.0, 0.0];
    pc.lights[4].position = [0.0, 10.0, 0.0];
    pc.lights[4].strength = [1000.1, 0.0, 100.2];

    pc
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn frame_time(delta: f32, elapsed: f64) -> Time {
        Time {
            delta,
            elapsed,
            frame_count: 0,
        }
    }

    #[test]
    fn pass_constants_carry_camera_and_clock() {
        let mut camera = Camera::new();
        camera.set_position(Vec3::new(0.0, 2.0, 0.0));
        camera.set_lens(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 1.0, 1000.0);
        camera.update_view_matrix();

        let pc = pass_constants(&frame_time(0.016, 12.5), &camera, (1280, 720));

        assert_eq!(pc.eye_pos, [0.0, 2.0, 0.0]);
        assert_eq!(pc.render_target_size, [1280.0, 720.0]);
        assert_eq!(pc.near_z, 1.0);
        assert_eq!(pc.far_z, 1000.0);
        assert_eq!(pc.total_time, 12.5);
        assert_eq!(pc.delta_time, 0.016);
        assert_eq!(pc.fog_color, [0.7, 0.7, 0.7, 1.0]);
        // three directional lights plus the two point/spot extras
        assert_eq!(pc.lights[0].strength, [1.2, 0.4, 0.4]);
        assert_eq!(pc.lights[4].strength, [1000.1, 0.0, 100.2]);
        assert_eq!(pc.lights[5].strength, [0.0; 3]);
    }

    #[test]
    fn view_proj_matches_manual_product() {
        let mut camera = Camera::new();
        camera.update_view_matrix();
        let pc = pass_constants(&frame_time(0.016, 0.0), &camera, (800, 600));
        let expected = (camera.proj() * camera.view()).to_cols_array_2d();
        assert_eq!(pc.view_proj, expected);
    }
}
