use glam::{Mat4, Vec3, Vec4};

use crate::frame::NUM_FRAME_RESOURCES;

/// Shading parameters shared by any number of render items.
///
/// The UV transform's translation row doubles as the scroll offset for
/// animated materials (the water surface).  `frames_dirty` counts how many
/// frame-resource slots still hold stale constants; every mutation must reset
/// it to the ring depth so the change reaches all in-flight copies.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub diffuse_albedo: Vec4,
    pub fresnel_r0: Vec3,
    pub roughness: f32,
    /// 4x4 texture transform; supports UV scaling and scrolling.
    pub transform: Mat4,
    /// Stable index into the texture table.
    pub texture_index: usize,
    /// Fixed slot in every frame-resource material buffer.
    pub cb_index: usize,
    pub frames_dirty: u32,
}

impl Material {
    pub fn new(
        name: &str,
        cb_index: usize,
        texture_index: usize,
        diffuse_albedo: Vec4,
        fresnel_r0: Vec3,
        roughness: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            diffuse_albedo,
            fresnel_r0,
            roughness,
            transform: Mat4::IDENTITY,
            texture_index,
            cb_index,
            frames_dirty: NUM_FRAME_RESOURCES as u32,
        }
    }

    /// Current UV scroll offset (the transform's translation).
    pub fn uv_offset(&self) -> (f32, f32) {
        (self.transform.w_axis.x, self.transform.w_axis.y)
    }

    /// Scrolls the UV offset, wrapping each axis back below 1.0, and marks
    /// the material dirty for every ring slot.
    pub fn scroll_uv(&mut self, du: f32, dv: f32) {
        let mut u = self.transform.w_axis.x + du;
        let mut v = self.transform.w_axis.y + dv;
        if u >= 1.0 {
            u -= 1.0;
        }
        if v >= 1.0 {
            v -= 1.0;
        }
        self.transform.w_axis.x = u;
        self.transform.w_axis.y = v;
        self.frames_dirty = NUM_FRAME_RESOURCES as u32;
    }
}
