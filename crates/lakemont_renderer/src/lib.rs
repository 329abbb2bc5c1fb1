//! `lakemont_renderer` — the per-frame simulation-and-render pipeline.
//!
//! # Module layout
//!
//! | Module     | Responsibility                                              |
//! |------------|-------------------------------------------------------------|
//! | `waves`    | Finite-difference wave height field + surface normals       |
//! | `scene`    | Assets, materials, render items, layers, dirty propagation  |
//! | `frame`    | Frame-resource ring: per-slot GPU buffers + completion fence|
//! | `update`   | Per-tick orchestration feeding the current ring slot        |
//! | `draw`     | Layer-ordered draw submission                               |
//! | `pipeline` | Shared bind-group layouts + the four named pipelines        |
//! | `geometry` | POD vertex types, primitive generators, shared-buffer packs |
//! | `texture`  | Texture table: RGBA8 image → stable index + bind group      |

pub mod draw;
pub mod frame;
pub mod geometry;
pub mod pipeline;
pub mod scene;
pub mod texture;
pub mod update;
pub mod waves;

pub use glam;

pub use draw::DrawPass;
pub use frame::{FrameResource, FrameResourceRing, PassConstants, NUM_FRAME_RESOURCES};
pub use geometry::{MeshData, SpriteVertex, Vertex};
pub use pipeline::{PipelineLayouts, ScenePipelines};
pub use scene::{
    Material, MaterialHandle, MeshGeometry, MeshHandle, RenderItem, RenderLayer, SceneAssets,
    SceneModel, Submesh,
};
pub use texture::TextureTable;
pub use update::UpdatePass;
pub use waves::Waves;
