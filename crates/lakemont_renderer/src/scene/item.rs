use glam::Mat4;

use crate::frame::NUM_FRAME_RESOURCES;
use crate::scene::mesh::Submesh;

/// Stable index into [`crate::scene::SceneAssets`] geometry arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// Stable index into [`crate::scene::SceneAssets`] material arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MaterialHandle(pub usize);

/// One drawable instance: a world transform plus handles into the shared
/// asset arenas and a resolved sub-mesh range.
///
/// `frames_dirty` starts at the ring depth so freshly created items reach all
/// in-flight constant-buffer copies; any later transform edit must reset it
/// the same way.
#[derive(Clone, Debug)]
pub struct RenderItem {
    pub world: Mat4,
    pub tex_transform: Mat4,
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    /// Instance count; 1 for everything except the billboard sprites.
    pub instances: u32,
    /// Fixed slot in every frame-resource object buffer.
    pub obj_cb_index: usize,
    pub frames_dirty: u32,
}

impl RenderItem {
    pub fn new(
        obj_cb_index: usize,
        mesh: MeshHandle,
        submesh: Submesh,
        material: MaterialHandle,
        world: Mat4,
        tex_transform: Mat4,
    ) -> Self {
        Self {
            world,
            tex_transform,
            mesh,
            material,
            index_count: submesh.index_count,
            start_index: submesh.start_index,
            base_vertex: submesh.base_vertex,
            instances: 1,
            obj_cb_index,
            frames_dirty: NUM_FRAME_RESOURCES as u32,
        }
    }

    /// Replaces the world transform and restarts dirty propagation.
    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
        self.frames_dirty = NUM_FRAME_RESOURCES as u32;
    }
}
