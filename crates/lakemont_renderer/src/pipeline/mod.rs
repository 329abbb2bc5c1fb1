//! The four scene pipeline variants, one per draw layer.
//!
//! Compiles `assets/shaders/scene.wgsl` and `assets/shaders/tree_sprite.wgsl`
//! and combines them with the vertex layouts and the shared bind-group
//! layouts from [`PipelineLayouts`].  All variants share the same pipeline
//! layout (pass / object / material / texture), so bind groups stay valid
//! across pipeline switches within a frame.

pub mod layout;

pub use layout::PipelineLayouts;

use std::sync::Arc;

use crate::geometry::{SpriteVertex, Vertex};
use crate::scene::RenderLayer;
use crate::texture::DEPTH_FORMAT;

pub struct ScenePipelines {
    pub opaque: Arc<wgpu::RenderPipeline>,
    pub alpha_tested: Arc<wgpu::RenderPipeline>,
    pub tree_sprites: Arc<wgpu::RenderPipeline>,
    pub transparent: Arc<wgpu::RenderPipeline>,
    /// Layouts are kept here so passes can create bind groups without needing
    /// a separate `PipelineLayouts` copy.
    pub layouts: PipelineLayouts,
}

impl ScenePipelines {
    /// Compiles and links every variant for the given `target_format`.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        layouts: PipelineLayouts,
    ) -> Self {
        let scene_shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../../../assets/shaders/scene.wgsl"
        ));
        let sprite_shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../../../assets/shaders/tree_sprite.wgsl"
        ));

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[
                    &layouts.pass,
                    &layouts.object,
                    &layouts.material,
                    &layouts.texture,
                ],
                push_constant_ranges: &[],
            });

        let build = |label: &str,
                     module: &wgpu::ShaderModule,
                     fs_entry: &str,
                     vertex_layout: wgpu::VertexBufferLayout,
                     cull_mode: Option<wgpu::Face>,
                     blend: wgpu::BlendState| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(fs_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: target_format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    ..Default::default()
                },
                // Depth writes stay on even for blended geometry so water
                // occludes submerged terrain drawn after it.
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let opaque = build(
            "Scene Pipeline: Opaque",
            &scene_shader,
            "fs_opaque",
            Vertex::layout(),
            Some(wgpu::Face::Back),
            wgpu::BlendState::REPLACE,
        );
        // Alpha-tested geometry (fence wire) is visible from both sides.
        let alpha_tested = build(
            "Scene Pipeline: Alpha Tested",
            &scene_shader,
            "fs_alpha_tested",
            Vertex::layout(),
            None,
            wgpu::BlendState::REPLACE,
        );
        let tree_sprites = build(
            "Scene Pipeline: Tree Sprites",
            &sprite_shader,
            "fs_main",
            SpriteVertex::layout(),
            None,
            wgpu::BlendState::REPLACE,
        );
        let transparent = build(
            "Scene Pipeline: Transparent",
            &scene_shader,
            "fs_opaque",
            Vertex::layout(),
            Some(wgpu::Face::Back),
            wgpu::BlendState::ALPHA_BLENDING,
        );

        log::debug!("compiled scene pipelines for {target_format:?}");

        Self {
            opaque: Arc::new(opaque),
            alpha_tested: Arc::new(alpha_tested),
            tree_sprites: Arc::new(tree_sprites),
            transparent: Arc::new(transparent),
            layouts,
        }
    }

    pub fn for_layer(&self, layer: RenderLayer) -> &wgpu::RenderPipeline {
        match layer {
            RenderLayer::Opaque => &self.opaque,
            RenderLayer::AlphaTested => &self.alpha_tested,
            RenderLayer::AlphaTestedTreeSprites => &self.tree_sprites,
            RenderLayer::Transparent => &self.transparent,
        }
    }
}
