//! Shared-buffer mesh geometry.
//!
//! A [`MeshGeometry`] owns one vertex buffer and one index buffer and maps
//! sub-mesh names to index ranges within them, so many logical shapes share a
//! single GPU allocation.  Buffers are `Arc`-wrapped: the water surface swaps
//! its vertex buffer every frame by repointing the `Arc` at the current
//! frame-resource slot's dynamic buffer.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::geometry::MeshData;

/// A named index range within the owning buffer pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Submesh {
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
}

pub struct MeshGeometry {
    pub name: String,
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_format: wgpu::IndexFormat,
    submeshes: HashMap<String, Submesh>,
}

impl MeshGeometry {
    /// Packs several [`MeshData`] parts into one shared vertex/index buffer
    /// pair, recording a [`Submesh`] range per part name.
    pub fn pack(device: &wgpu::Device, name: &str, parts: &[(&str, &MeshData)]) -> Self {
        let mut vertices = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut submeshes = HashMap::new();

        for (part_name, data) in parts {
            let submesh = Submesh {
                index_count: data.indices.len() as u32,
                start_index: indices.len() as u32,
                base_vertex: vertices.len() as i32,
            };
            vertices.extend_from_slice(&data.vertices);
            indices.extend_from_slice(&data.indices);
            submeshes.insert((*part_name).to_string(), submesh);
        }

        let geo = Self {
            name: name.to_string(),
            vertex_buffer: Arc::new(device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some(name),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            )),
            index_buffer: Arc::new(device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some(name),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            )),
            index_format: wgpu::IndexFormat::Uint32,
            submeshes,
        };
        geo.check_bounds(vertices.len(), indices.len());
        geo
    }

    /// Builds a geometry whose buffers were created elsewhere (dynamic vertex
    /// data, sprite instances).  `vertex_count`/`index_count` describe the
    /// supplied buffers and are only used to validate the sub-mesh ranges.
    pub fn from_buffers(
        name: &str,
        vertex_buffer: Arc<wgpu::Buffer>,
        index_buffer: Arc<wgpu::Buffer>,
        vertex_count: usize,
        index_count: usize,
        submeshes: HashMap<String, Submesh>,
    ) -> Self {
        let geo = Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            index_format: wgpu::IndexFormat::Uint32,
            submeshes,
        };
        geo.check_bounds(vertex_count, index_count);
        geo
    }

    /// Sub-mesh lookup.  A missing name is a scene-construction bug: fail
    /// fast rather than draw garbage.
    pub fn submesh(&self, name: &str) -> Submesh {
        match self.submeshes.get(name) {
            Some(s) => *s,
            None => panic!("geometry {:?} has no submesh {:?}", self.name, name),
        }
    }

    fn check_bounds(&self, vertex_count: usize, index_count: usize) {
        for (name, s) in &self.submeshes {
            assert!(
                (s.start_index + s.index_count) as usize <= index_count,
                "submesh {name:?} index range exceeds buffer"
            );
            assert!(
                (s.base_vertex as usize) <= vertex_count,
                "submesh {name:?} base vertex exceeds buffer"
            );
        }
    }
}
