//! Shared `wgpu::BindGroupLayout` objects used by every scene pipeline.
//! Centralising them here means the frame-resource buffers, the texture
//! table and all four pipeline variants agree on one set of layouts.

use std::sync::Arc;

use crate::frame::{MaterialConstants, ObjectConstants, PassConstants};

/// All bind-group layouts used by the scene pipelines.
///
/// Layouts are created once and shared via `Arc` so individual passes can
/// hold a reference without owning the whole `PipelineLayouts` struct.
#[derive(Clone)]
pub struct PipelineLayouts {
    /// group(0) — per-pass constants (one `UNIFORM` buffer at binding 0).
    pub pass: Arc<wgpu::BindGroupLayout>,
    /// group(1) — per-object constants via a dynamic uniform buffer: one
    /// large buffer bound once, a different byte offset per draw call.
    pub object: Arc<wgpu::BindGroupLayout>,
    /// group(2) — per-material constants, dynamic like the object layout.
    pub material: Arc<wgpu::BindGroupLayout>,
    /// group(3) — diffuse texture at binding 0, sampler at binding 1.
    pub texture: Arc<wgpu::BindGroupLayout>,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_entry = |dynamic: bool, min_size: u64| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: wgpu::BufferSize::new(min_size),
            },
            count: None,
        };

        let pass = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Pass"),
                entries: &[uniform_entry(
                    false,
                    std::mem::size_of::<PassConstants>() as u64,
                )],
            },
        ));

        // Object and material layouts use dynamic offsets so the per-entity
        // constants live in one buffer per frame slot and draws only switch
        // the offset, not the bind group.
        let object = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Object (dynamic)"),
                entries: &[uniform_entry(
                    true,
                    std::mem::size_of::<ObjectConstants>() as u64,
                )],
            },
        ));

        let material = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Material (dynamic)"),
                entries: &[uniform_entry(
                    true,
                    std::mem::size_of::<MaterialConstants>() as u64,
                )],
            },
        ));

        let texture = Arc::new(device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Texture"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            },
        ));

        Self {
            pass,
            object,
            material,
            texture,
        }
    }
}
