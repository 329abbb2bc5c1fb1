pub mod primitives;
pub mod vertex;

pub use primitives::{
    cone, cuboid, cylinder, diamond, geosphere, grid, pyramid, quad, sphere, torus,
    triangular_prism, wedge, MeshData,
};
pub use vertex::{SpriteVertex, Vertex};
