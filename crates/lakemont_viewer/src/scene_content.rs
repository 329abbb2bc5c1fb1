//! Hand-authored scene: plateau terrain, animated lake, billboard trees and
//! the monument garden, with the materials and textures they reference.
//!
//! Registration order matters twice: texture indices must line up with the
//! material definitions, and item registration order fixes each item's
//! object-constant slot.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use rand::Rng;
use wgpu::util::DeviceExt;

use lakemont_renderer::geometry::{self, MeshData, SpriteVertex, Vertex};
use lakemont_renderer::{
    Material, MeshGeometry, MeshHandle, PipelineLayouts, RenderItem, RenderLayer, SceneAssets,
    SceneModel, Submesh, TextureTable, Waves,
};

use crate::textures;

pub struct SceneBundle {
    pub assets: SceneAssets,
    pub scene: SceneModel,
    pub waves: Waves,
}

pub fn build(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layouts: &PipelineLayouts,
) -> SceneBundle {
    let waves = Waves::new(128, 128, 1.0, 0.03, 4.0, 0.2);

    let mut table = TextureTable::new(device, layouts.texture.clone());
    for (label, pixels) in [
        ("grass", textures::grass()),
        ("water", textures::water()),
        ("wirefence", textures::wire_fence()),
        ("stone", textures::stone()),
        ("marble", textures::marble()),
        ("sun", textures::sun()),
        ("diamond", textures::diamond()),
        ("bush", textures::bush()),
        ("wood", textures::wood()),
        ("treeSprites", textures::tree()),
    ] {
        table.register(device, queue, label, textures::SIZE, textures::SIZE, &pixels);
    }

    let mut assets = SceneAssets::new(table);
    build_materials(&mut assets);

    let land = assets.add_geometry(MeshGeometry::pack(
        device,
        "landGeo",
        &[("grid", &terrain_mesh())],
    ));
    let water = assets.add_geometry(water_geometry(device, &waves));
    let shapes = assets.add_geometry(shape_geometry(device));
    let sprites = assets.add_geometry(tree_sprite_geometry(device));

    let mut scene = SceneModel::new();
    build_items(&mut scene, &assets, land, water, shapes, sprites);

    SceneBundle {
        assets,
        scene,
        waves,
    }
}

// ── Terrain ─────────────────────────────────────────────────────────────────

fn hills_height(x: f32, z: f32) -> f32 {
    0.3 * (z * (0.1 * x).sin() + x * (0.1 * z).cos())
}

fn hills_normal(x: f32, z: f32) -> Vec3 {
    // n = (-df/dx, 1, -df/dz)
    Vec3::new(
        -0.03 * z * (0.1 * x).cos() - 0.3 * (0.1 * z).cos(),
        1.0,
        -0.3 * (0.1 * x).sin() + 0.03 * x * (0.1 * z).sin(),
    )
    .normalize()
}

/// 125x125 plateau terrain: a flat grid rotated a quarter turn, raised to
/// height 2 inside the 45-unit border and dropped to -10 outside it, with
/// normals from the analytic hill function.
fn terrain_mesh() -> MeshData {
    const BORDER: f32 = 45.0;

    let mut mesh = geometry::grid(125.0, 125.0, 51, 51);
    for v in &mut mesh.vertices {
        let [x, _, z] = v.position;

        let inside = x > -BORDER && x < BORDER && z > -BORDER && z < BORDER;
        let height = if inside { 2.0 } else { -10.0 };

        // rotate the grid 90 degrees counter-clockwise about Y
        v.position = [-z, height, x];
        v.normal = hills_normal(x, z).to_array();
    }
    mesh
}

// ── Water ───────────────────────────────────────────────────────────────────

/// Triangle-list indices over the wave grid, two triangles per quad.
fn wave_indices(rows: usize, cols: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let a = (i * cols + j) as u32;
            let b = (i * cols + j + 1) as u32;
            let c = ((i + 1) * cols + j) as u32;
            let d = ((i + 1) * cols + j + 1) as u32;
            indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }
    indices
}

/// Water geometry with a static index buffer and a placeholder vertex buffer;
/// the update pass repoints the vertex buffer at the current frame slot's
/// dynamic copy before anything is drawn.
fn water_geometry(device: &wgpu::Device, waves: &Waves) -> MeshGeometry {
    let indices = wave_indices(waves.rows(), waves.cols());

    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("waterGeo"),
        size: (waves.vertex_count() * std::mem::size_of::<Vertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("waterGeo"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let mut submeshes = HashMap::new();
    submeshes.insert(
        "grid".to_string(),
        Submesh {
            index_count: indices.len() as u32,
            start_index: 0,
            base_vertex: 0,
        },
    );
    MeshGeometry::from_buffers(
        "waterGeo",
        Arc::new(vertex_buffer),
        Arc::new(index_buffer),
        waves.vertex_count(),
        indices.len(),
        submeshes,
    )
}

// ── Shapes and sprites ──────────────────────────────────────────────────────

fn shape_geometry(device: &wgpu::Device) -> MeshGeometry {
    let box_mesh = geometry::cuboid(4.5, 3.5, 4.5);
    let cylinder = geometry::cylinder(0.5, 0.3, 6.0, 20, 20);
    let sphere = geometry::sphere(0.5, 20, 20);
    let geosphere = geometry::geosphere(1.0, 2);
    let quad = geometry::quad(1.0, 1.0, 1.0, 1.0, 0.5);
    let triprism = geometry::triangular_prism(1.0, 1.0, 3.0);
    let cone = geometry::cone(1.0, 1.0, 9, 5);
    let pyramid = geometry::pyramid(1.0, 1.0);
    let diamond = geometry::diamond(1.0, 1.0, 1.0);
    let wedge = geometry::wedge(1.0, 1.0, 1.0);
    let torus = geometry::torus(2.0, 0.5, 20, 20);

    MeshGeometry::pack(
        device,
        "shapeGeo",
        &[
            ("box", &box_mesh),
            ("cylinder", &cylinder),
            ("sphere", &sphere),
            ("geosphere", &geosphere),
            ("quad", &quad),
            ("triprism", &triprism),
            ("cone", &cone),
            ("pyramid", &pyramid),
            ("diamond", &diamond),
            ("wedge", &wedge),
            ("torus", &torus),
        ],
    )
}

const TREE_COUNT: usize = 4;

/// Four sprite instances scattered over the plateau plus a 6-index quad the
/// vertex shader expands per instance.
fn tree_sprite_geometry(device: &wgpu::Device) -> MeshGeometry {
    let mut rng = rand::thread_rng();
    let mut sprites = [SpriteVertex {
        position: [0.0; 3],
        size: [20.0, 20.0],
    }; TREE_COUNT];
    for sprite in &mut sprites {
        let x = rng.gen_range(-30.0..68.0);
        let z = rng.gen_range(-45.0..55.0);
        // anchored above the land rather than on it
        sprite.position = [x, 10.0, z];
    }

    let quad_indices: [u32; 6] = [0, 1, 2, 1, 3, 2];

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("treeSpritesGeo"),
        contents: bytemuck::cast_slice(&sprites),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("treeSpritesGeo"),
        contents: bytemuck::cast_slice(&quad_indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let mut submeshes = HashMap::new();
    submeshes.insert(
        "points".to_string(),
        Submesh {
            index_count: quad_indices.len() as u32,
            start_index: 0,
            base_vertex: 0,
        },
    );
    MeshGeometry::from_buffers(
        "treeSpritesGeo",
        Arc::new(vertex_buffer),
        Arc::new(index_buffer),
        TREE_COUNT,
        quad_indices.len(),
        submeshes,
    )
}

// ── Materials ───────────────────────────────────────────────────────────────

const LIGHT_STEEL_BLUE: Vec4 = Vec4::new(0.690_196_1, 0.768_627_5, 0.870_588_3, 1.0);

fn build_materials(assets: &mut SceneAssets) {
    let defs: [(&str, usize, Vec4, Vec3, f32); 10] = [
        ("grass", 0, Vec4::ONE, Vec3::splat(0.01), 0.125),
        // fake water: no env reflection available, so lean on transparency
        ("water", 1, Vec4::new(1.0, 1.0, 1.0, 0.5), Vec3::splat(0.1), 0.0),
        ("wirefence", 2, LIGHT_STEEL_BLUE, Vec3::splat(0.02), 0.3),
        ("stone", 3, LIGHT_STEEL_BLUE, Vec3::splat(0.05), 0.3),
        ("marble", 4, LIGHT_STEEL_BLUE, Vec3::splat(0.05), 0.3),
        ("sun", 5, LIGHT_STEEL_BLUE, Vec3::splat(0.05), 0.3),
        ("diamond", 6, LIGHT_STEEL_BLUE, Vec3::splat(0.05), 0.3),
        ("bush", 7, LIGHT_STEEL_BLUE, Vec3::splat(0.05), 0.3),
        ("wood", 8, LIGHT_STEEL_BLUE, Vec3::splat(0.05), 0.3),
        ("treeSprites", 9, Vec4::ONE, Vec3::splat(0.01), 0.125),
    ];
    for (name, index, albedo, fresnel, roughness) in defs {
        assets.add_material(Material::new(name, index, index, albedo, fresnel, roughness));
    }
}

// ── Render items ────────────────────────────────────────────────────────────

fn add_shape(
    scene: &mut SceneModel,
    assets: &SceneAssets,
    shapes: MeshHandle,
    part: &str,
    world: Mat4,
    material: &str,
) {
    let submesh = assets.geometry(shapes).submesh(part);
    let item = RenderItem::new(
        scene.item_count(),
        shapes,
        submesh,
        assets.material_handle(material),
        world,
        Mat4::IDENTITY,
    );
    scene.add_item(item, RenderLayer::Opaque);
}

fn build_items(
    scene: &mut SceneModel,
    assets: &SceneAssets,
    land: MeshHandle,
    water: MeshHandle,
    shapes: MeshHandle,
    sprites: MeshHandle,
) {
    let tex_scale5 = Mat4::from_scale(Vec3::new(5.0, 5.0, 1.0));

    let water_mat = assets.material_handle("water");
    let waves_item = scene.add_item(
        RenderItem::new(
            scene.item_count(),
            water,
            assets.geometry(water).submesh("grid"),
            water_mat,
            Mat4::IDENTITY,
            tex_scale5,
        ),
        RenderLayer::Transparent,
    );
    scene.set_water(waves_item, water_mat);

    scene.add_item(
        RenderItem::new(
            scene.item_count(),
            land,
            assets.geometry(land).submesh("grid"),
            assets.material_handle("grass"),
            Mat4::IDENTITY,
            tex_scale5,
        ),
        RenderLayer::Opaque,
    );

    let deg = f32::to_radians;
    let t = Mat4::from_translation;
    let s = |x, y, z| Mat4::from_scale(Vec3::new(x, y, z));

    // door and floor
    add_shape(
        scene,
        assets,
        shapes,
        "quad",
        t(Vec3::new(-45.0, 10.0, -30.0)) * s(30.0, 15.5, 62.0) * Mat4::from_rotation_x(deg(90.0)),
        "stone",
    );
    add_shape(
        scene,
        assets,
        shapes,
        "quad",
        t(Vec3::new(-22.0, 1.0, -39.0)) * s(15.0, 15.5, 15.0),
        "stone",
    );

    // tomb: prism lid on a marble base, diamond floating above
    add_shape(
        scene,
        assets,
        shapes,
        "triprism",
        t(Vec3::new(0.0, 5.5, 18.0)) * s(15.0, 3.0, 3.0) * Mat4::from_rotation_z(deg(90.0)),
        "stone",
    );
    add_shape(
        scene,
        assets,
        shapes,
        "box",
        t(Vec3::new(0.0, 2.5, 18.0)) * s(3.7, 1.2, 1.2),
        "marble",
    );

    // two bushes on wooden trunks
    for x in [-32.0, 32.0] {
        add_shape(
            scene,
            assets,
            shapes,
            "pyramid",
            t(Vec3::new(x, 9.0, -22.0)) * s(4.0, 4.0, 4.0),
            "bush",
        );
        add_shape(
            scene,
            assets,
            shapes,
            "cylinder",
            t(Vec3::new(x, 6.0, -22.0)) * s(1.5, 1.5, 1.5),
            "wood",
        );
    }

    add_shape(
        scene,
        assets,
        shapes,
        "geosphere",
        t(Vec3::new(-25.0, 35.0, 100.0)) * s(9.0, 9.0, 9.0),
        "sun",
    );
    add_shape(
        scene,
        assets,
        shapes,
        "diamond",
        t(Vec3::new(0.0, 10.0, 18.0)) * s(4.0, 4.0, 4.0),
        "diamond",
    );

    // monument walls
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 6.5, 30.0)) * s(7.0, 7.0, 0.5), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 6.5, -30.0)) * s(7.0, 7.0, 0.5), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(15.0, 6.5, 0.0)) * s(0.5, 7.0, 13.0), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(-15.0, 6.5, 0.0)) * s(0.5, 7.0, 13.0), "marble");

    // rails above and below the colonnade
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 22.5, 30.0)) * s(10.3, 0.2, 0.5), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 22.5, -30.0)) * s(10.3, 0.2, 0.5), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(22.0, 22.5, 0.0)) * s(0.5, 0.2, 13.0), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(-22.0, 22.5, 0.0)) * s(0.5, 0.2, 13.0), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 2.5, 32.0)) * s(10.3, 0.2, 0.5), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 2.5, -32.0)) * s(10.3, 0.2, 0.5), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(22.0, 2.5, 0.0)) * s(0.5, 0.2, 14.0), "marble");
    add_shape(scene, assets, shapes, "box", t(Vec3::new(-22.0, 2.5, 0.0)) * s(0.5, 0.2, 14.0), "marble");

    // clock tower
    add_shape(scene, assets, shapes, "box", t(Vec3::new(0.0, 18.0, 0.0)) * s(3.0, 10.0, 2.0), "marble");
    add_shape(scene, assets, shapes, "cone", t(Vec3::new(0.0, 40.0, 0.0)) * s(10.0, 10.0, 10.0), "stone");
    add_shape(scene, assets, shapes, "sphere", t(Vec3::new(0.0, 25.0, 0.0)) * s(11.0, 11.0, 11.0), "stone");
    for z in [-4.0, 4.0] {
        add_shape(
            scene,
            assets,
            shapes,
            "torus",
            t(Vec3::new(0.0, 25.0, z)) * s(2.5, 2.5, 2.5) * Mat4::from_rotation_x(deg(90.0)),
            "stone",
        );
    }

    // colonnade arcade: column, wedge footing and cone cap per side
    for i in 0..6 {
        let z = -25.0 + i as f32 * 10.0;
        for side in [1.0f32, -1.0] {
            add_shape(
                scene,
                assets,
                shapes,
                "cylinder",
                t(Vec3::new(side * 22.0, 10.0, z)) * s(4.0, 4.5, 4.0),
                "marble",
            );
            add_shape(
                scene,
                assets,
                shapes,
                "wedge",
                t(Vec3::new(side * 24.0, 4.0, z))
                    * s(3.5, 4.0, 3.5)
                    * Mat4::from_rotation_y(deg(if side > 0.0 { 270.0 } else { 90.0 })),
                "marble",
            );
            add_shape(
                scene,
                assets,
                shapes,
                "cone",
                t(Vec3::new(side * 22.0, 25.0, z)) * s(3.0, 3.5, 3.0),
                "marble",
            );
        }
    }

    // billboard trees: one item, one instance per sprite
    let mut tree_item = RenderItem::new(
        scene.item_count(),
        sprites,
        assets.geometry(sprites).submesh("points"),
        assets.material_handle("treeSprites"),
        Mat4::IDENTITY,
        Mat4::IDENTITY,
    );
    tree_item.instances = TREE_COUNT as u32;
    scene.add_item(tree_item, RenderLayer::AlphaTestedTreeSprites);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_is_a_51_by_51_plateau() {
        let mesh = terrain_mesh();
        assert_eq!(mesh.vertices.len(), 51 * 51);
        assert_eq!(mesh.indices.len(), 50 * 50 * 6);

        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            // positions were rotated, so recover the pre-rotation sample point
            let (px, pz) = (z, -x);
            let inside = px > -45.0 && px < 45.0 && pz > -45.0 && pz < 45.0;
            assert_eq!(y, if inside { 2.0 } else { -10.0 });
        }
    }

    #[test]
    fn terrain_normals_are_unit_length() {
        let mesh = terrain_mesh();
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.y > 0.0, "terrain normals must point upward");
        }
    }

    #[test]
    fn hills_height_matches_surface_function() {
        // spot checks against 0.3 * (z*sin(0.1x) + x*cos(0.1z))
        assert!((hills_height(0.0, 0.0)).abs() < 1e-6);
        let expected = 0.3 * (7.0 * (1.0f32).sin() + 10.0 * (0.7f32).cos());
        assert!((hills_height(10.0, 7.0) - expected).abs() < 1e-5);
    }

    #[test]
    fn wave_indices_tile_the_full_grid() {
        let indices = wave_indices(4, 4);
        assert_eq!(indices.len(), 3 * 3 * 6);
        assert!(indices.iter().all(|&i| i < 16));
        // last quad's final triangle reaches the last vertex
        assert_eq!(indices[indices.len() - 1], 15);
    }
}
