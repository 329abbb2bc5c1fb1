//! Frame submission: one render pass walking the draw layers in order.
//!
//! The pass clears colour and depth once, binds the current frame slot's
//! pass constants, then draws layer by layer — opaque, alpha-tested, tree
//! sprites, transparent — switching pipelines between layers and only
//! dynamic offsets between items.

use crate::frame::FrameResource;
use crate::pipeline::ScenePipelines;
use crate::scene::{RenderLayer, SceneAssets, SceneModel};

pub struct DrawPass {
    pub pipelines: ScenePipelines,
    /// Background clear, matched to the shader's fog colour so fogged-out
    /// geometry fades into the sky.
    pub clear_color: wgpu::Color,
}

impl DrawPass {
    pub fn new(pipelines: ScenePipelines) -> Self {
        Self {
            pipelines,
            clear_color: wgpu::Color {
                r: 0.7,
                g: 0.7,
                b: 0.7,
                a: 1.0,
            },
        }
    }

    /// Records the full scene into `encoder`, targeting `color` and `depth`.
    /// `slot` must be the frame resource the update pass just wrote.
    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        scene: &SceneModel,
        assets: &SceneAssets,
        slot: &FrameResource,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_bind_group(0, &slot.pass_bind_group, &[]);

        for layer in RenderLayer::ORDER {
            rpass.set_pipeline(self.pipelines.for_layer(layer));

            for item in scene.layer_items(layer) {
                let geometry = assets.geometry(item.mesh);
                let material = assets.material(item.material);

                rpass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                rpass.set_index_buffer(
                    geometry.index_buffer.slice(..),
                    geometry.index_format,
                );
                rpass.set_bind_group(
                    1,
                    slot.object_cb.bind_group.as_ref(),
                    &[slot.object_cb.offset(item.obj_cb_index)],
                );
                rpass.set_bind_group(
                    2,
                    slot.material_cb.bind_group.as_ref(),
                    &[slot.material_cb.offset(material.cb_index)],
                );
                rpass.set_bind_group(3, assets.textures.bind_group(material.texture_index), &[]);

                rpass.draw_indexed(
                    item.start_index..item.start_index + item.index_count,
                    item.base_vertex,
                    0..item.instances,
                );
            }
        }
    }
}
