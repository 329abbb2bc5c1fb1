//! Frame resources: the constant-buffer layouts the shaders consume and the
//! ring of per-frame GPU buffer sets that lets the CPU prepare frame N while
//! the GPU still draws frames N-1 and N-2.
//!
//! ## Dynamic uniform buffer model
//!
//! Object and material constants live in one shared buffer per frame slot,
//! one aligned element per entity.  The draw pass binds each buffer's single
//! bind group once and supplies `buf.offset(slot)` as the dynamic offset per
//! draw call, so per-entity constants never cost a bind-group switch.
//!
//! ## Alignment
//!
//! wgpu requires each dynamic-offset element to be aligned to
//! `min_uniform_buffer_offset_alignment` (typically 256 bytes on desktop
//! hardware, 64 bytes on some mobile GPUs), so the slot stride is
//! `align_up(size_of::<T>(), alignment)` even when `T` is smaller.

use std::marker::PhantomData;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::geometry::Vertex;
use crate::pipeline::PipelineLayouts;
use crate::scene::Material;

/// Depth of the frame-resource ring: how many frames may be in flight.
pub const NUM_FRAME_RESOURCES: usize = 3;

/// Fixed light array length in the pass constants.
pub const MAX_LIGHTS: usize = 16;

// ── Shader-visible constant layouts ─────────────────────────────────────────

/// One light source.  The first `strength`/`direction` entries are treated as
/// directional lights by the shader; the layout also carries point/spot
/// fields so the array stride matches the WGSL struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Light {
    pub strength: [f32; 3],
    pub falloff_start: f32,
    pub direction: [f32; 3],
    pub falloff_end: f32,
    pub position: [f32; 3],
    pub spot_power: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Per-pass constants, written once per frame into the current slot.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PassConstants {
    pub view: [[f32; 4]; 4],
    pub inv_view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 3],
    pub _pad0: f32,
    pub render_target_size: [f32; 2],
    pub inv_render_target_size: [f32; 2],
    pub near_z: f32,
    pub far_z: f32,
    pub total_time: f32,
    pub delta_time: f32,
    pub ambient_light: [f32; 4],
    pub fog_color: [f32; 4],
    pub fog_start: f32,
    pub fog_range: f32,
    pub _pad1: [f32; 2],
    pub lights: [Light; MAX_LIGHTS],
}

impl Default for PassConstants {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Per-object constants, one aligned slot per render item.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub world: [[f32; 4]; 4],
    pub tex_transform: [[f32; 4]; 4],
}

impl ObjectConstants {
    pub fn new(world: Mat4, tex_transform: Mat4) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            tex_transform: tex_transform.to_cols_array_2d(),
        }
    }
}

/// Per-material constants, one aligned slot per material.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialConstants {
    pub diffuse_albedo: [f32; 4],
    pub fresnel_r0: [f32; 3],
    pub roughness: f32,
    pub transform: [[f32; 4]; 4],
}

impl MaterialConstants {
    pub fn from_material(mat: &Material) -> Self {
        Self {
            diffuse_albedo: mat.diffuse_albedo.to_array(),
            fresnel_r0: mat.fresnel_r0.to_array(),
            roughness: mat.roughness,
            transform: mat.transform.to_cols_array_2d(),
        }
    }
}

const _: () = assert!(std::mem::size_of::<Light>() == 48);
const _: () = assert!(std::mem::size_of::<PassConstants>() == 480 + 48 * MAX_LIGHTS);

// ── Slot buffer ─────────────────────────────────────────────────────────────

/// A GPU uniform buffer holding one `T` per slot, aligned to the device's
/// `min_uniform_buffer_offset_alignment`, with a single dynamic-offset bind
/// group covering the whole buffer.
pub struct SlotBuffer<T: Pod> {
    pub buffer: wgpu::Buffer,
    pub bind_group: Arc<wgpu::BindGroup>,
    /// Byte stride between consecutive slots (multiple of the alignment).
    pub stride: u32,
    capacity: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> SlotBuffer<T> {
    /// `layout` must be a uniform bind-group layout with
    /// `has_dynamic_offset: true` and a `min_binding_size` of `size_of::<T>()`.
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        capacity: usize,
    ) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let stride = align_up(std::mem::size_of::<T>() as u32, alignment);

        let capacity = capacity.max(1);
        let buffer = Self::create_buffer(device, label, capacity, stride);
        let bind_group = Self::create_bind_group(device, layout, label, &buffer);

        Self {
            buffer,
            bind_group: Arc::new(bind_group),
            stride,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Byte offset of slot `index`, for use as a dynamic bind offset.
    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        index as u32 * self.stride
    }

    /// Writes `value` into slot `index`.
    #[inline]
    pub fn write(&self, queue: &wgpu::Queue, index: usize, value: &T) {
        debug_assert!(index < self.capacity, "slot buffer index out of range");
        queue.write_buffer(
            &self.buffer,
            self.offset(index) as u64,
            bytemuck::bytes_of(value),
        );
    }

    fn create_buffer(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        stride: u32,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64 * stride as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer,
                    offset: 0,
                    // Size of one slot (the dynamic window the shader sees).
                    size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
                }),
            }],
        })
    }
}

// ── Frame resources ─────────────────────────────────────────────────────────

/// One ring slot: every GPU buffer the CPU rewrites per frame, plus the
/// submission fence guarding it.
pub struct FrameResource {
    pub object_cb: SlotBuffer<ObjectConstants>,
    pub material_cb: SlotBuffer<MaterialConstants>,
    pass_cb: wgpu::Buffer,
    pub pass_bind_group: wgpu::BindGroup,
    /// Per-slot dynamic water vertex buffer.  `Arc` so the water geometry can
    /// be repointed at the slot currently being recorded.
    pub waves_vb: Arc<wgpu::Buffer>,
    /// Submission the GPU must retire before this slot is reused.
    pub fence: Option<wgpu::SubmissionIndex>,
}

impl FrameResource {
    fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        slot: usize,
        item_count: usize,
        material_count: usize,
        wave_vertex_count: usize,
    ) -> Self {
        let pass_cb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("pass constants [{slot}]")),
            size: std::mem::size_of::<PassConstants>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let pass_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("pass constants [{slot}]")),
            layout: &layouts.pass,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: pass_cb.as_entire_binding(),
            }],
        });
        let waves_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("wave vertices [{slot}]")),
            size: (wave_vertex_count * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            object_cb: SlotBuffer::new(
                device,
                &layouts.object,
                &format!("object constants [{slot}]"),
                item_count,
            ),
            material_cb: SlotBuffer::new(
                device,
                &layouts.material,
                &format!("material constants [{slot}]"),
                material_count,
            ),
            pass_cb,
            pass_bind_group,
            waves_vb: Arc::new(waves_vb),
            fence: None,
        }
    }

    pub fn write_pass(&self, queue: &wgpu::Queue, constants: &PassConstants) {
        queue.write_buffer(&self.pass_cb, 0, bytemuck::bytes_of(constants));
    }
}

/// Rotating set of [`NUM_FRAME_RESOURCES`] frame slots.
pub struct FrameResourceRing {
    slots: Vec<FrameResource>,
    cursor: usize,
}

impl FrameResourceRing {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        item_count: usize,
        material_count: usize,
        wave_vertex_count: usize,
    ) -> Self {
        let slots = (0..NUM_FRAME_RESOURCES)
            .map(|slot| {
                FrameResource::new(
                    device,
                    layouts,
                    slot,
                    item_count,
                    material_count,
                    wave_vertex_count,
                )
            })
            .collect();
        Self { slots, cursor: 0 }
    }

    /// Advances to the next slot and blocks until the GPU has retired the
    /// submission that last used it.  Returns the new slot index.
    pub fn acquire_next(&mut self, device: &wgpu::Device) -> usize {
        self.cursor = next_cursor(self.cursor, self.slots.len());
        if let Some(fence) = self.slots[self.cursor].fence.take() {
            device.poll(wgpu::Maintain::wait_for(fence));
        }
        self.cursor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &FrameResource {
        &self.slots[self.cursor]
    }

    pub fn current_mut(&mut self) -> &mut FrameResource {
        &mut self.slots[self.cursor]
    }

    /// Records the submission index that must retire before the current slot
    /// can be rewritten.
    pub fn mark_submitted(&mut self, submission: wgpu::SubmissionIndex) {
        self.slots[self.cursor].fence = Some(submission);
    }
}

#[inline]
fn next_cursor(cursor: usize, len: usize) -> usize {
    (cursor + 1) % len
}

/// Round `value` up to the next multiple of `alignment` (which must be a
/// power of two).
#[inline]
fn align_up(value: u32, alignment: u32) -> u32 {
    (value + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_power_of_two_multiples() {
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(128, 64), 128);
    }

    #[test]
    fn cursor_cycles_through_every_slot() {
        let mut cursor = 0;
        let seen: Vec<usize> = (0..NUM_FRAME_RESOURCES * 2)
            .map(|_| {
                cursor = next_cursor(cursor, NUM_FRAME_RESOURCES);
                cursor
            })
            .collect();
        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn acquire_never_blocks_on_retired_or_missing_fences() {
        let ctx = match pollster::block_on(lakemont_core::EngineContext::new()) {
            Ok(ctx) => ctx,
            Err(_) => return, // no GPU adapter on this machine
        };
        let layouts = PipelineLayouts::new(&ctx.device);
        let mut ring = FrameResourceRing::new(&ctx.device, &layouts, 1, 1, 4);

        // never-submitted slots carry no fence and skip the poll entirely
        for _ in 0..NUM_FRAME_RESOURCES {
            ring.acquire_next(&ctx.device);
        }

        // fence a slot with a submission, let it retire, then cycle back to
        // it: the wait must find the fence already reached and return
        let fenced = ring.cursor();
        let encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        let submission = ctx.queue.submit(Some(encoder.finish()));
        ring.mark_submitted(submission);
        ctx.device.poll(wgpu::Maintain::Wait);

        for _ in 0..NUM_FRAME_RESOURCES {
            ring.acquire_next(&ctx.device);
        }
        assert_eq!(ring.cursor(), fenced);
        // acquisition consumed the fence; the slot is immediately reusable
        assert!(ring.current().fence.is_none());
    }

    #[test]
    fn pass_constants_match_wgsl_field_offsets() {
        use std::mem::offset_of;
        assert_eq!(offset_of!(PassConstants, eye_pos), 384);
        assert_eq!(offset_of!(PassConstants, render_target_size), 400);
        assert_eq!(offset_of!(PassConstants, ambient_light), 432);
        assert_eq!(offset_of!(PassConstants, fog_color), 448);
        assert_eq!(offset_of!(PassConstants, lights), 480);
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 128);
        assert_eq!(std::mem::size_of::<MaterialConstants>(), 96);
    }
}
