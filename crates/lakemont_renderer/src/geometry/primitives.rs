//! CPU-side procedural mesh generators.
//!
//! Each generator returns a [`MeshData`] — plain position/normal/uv vertex and
//! triangle index arrays — that the scene packs into shared GPU buffers (see
//! `scene::MeshGeometry::pack`).  Curved shapes get analytic normals; faceted
//! shapes are built face by face so every face keeps a flat normal.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::Vertex;

/// Vertex/index arrays for one logical shape.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3, tex: [f32; 2]) {
        self.vertices.push(Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            tex,
        });
    }

    /// Appends a flat-shaded triangle; the normal comes from the winding.
    fn push_tri(&mut self, p: [Vec3; 3], uv: [[f32; 2]; 3]) {
        let normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize();
        let base = self.vertices.len() as u32;
        for k in 0..3 {
            self.push_vertex(p[k], normal, uv[k]);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Appends a flat-shaded quad (two triangles sharing four vertices).
    fn push_quad(&mut self, p: [Vec3; 4], uv: [[f32; 2]; 4]) {
        let normal = (p[1] - p[0]).cross(p[2] - p[0]).normalize();
        let base = self.vertices.len() as u32;
        for k in 0..4 {
            self.push_vertex(p[k], normal, uv[k]);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Flat grid in the XZ plane centred on the origin: `m × n` vertices,
/// `(m-1) × (n-1)` quads.
pub fn grid(width: f32, depth: f32, m: usize, n: usize) -> MeshData {
    assert!(m >= 2 && n >= 2, "grid needs at least 2x2 vertices");

    let half_w = 0.5 * width;
    let half_d = 0.5 * depth;
    let dx = width / (n - 1) as f32;
    let dz = depth / (m - 1) as f32;
    let du = 1.0 / (n - 1) as f32;
    let dv = 1.0 / (m - 1) as f32;

    let mut mesh = MeshData::default();
    for i in 0..m {
        let z = half_d - i as f32 * dz;
        for j in 0..n {
            let x = -half_w + j as f32 * dx;
            mesh.push_vertex(
                Vec3::new(x, 0.0, z),
                Vec3::Y,
                [j as f32 * du, i as f32 * dv],
            );
        }
    }
    for i in 0..m - 1 {
        for j in 0..n - 1 {
            let a = (i * n + j) as u32;
            let b = (i * n + j + 1) as u32;
            let c = ((i + 1) * n + j) as u32;
            let d = ((i + 1) * n + j + 1) as u32;
            mesh.indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }
    mesh
}

/// Axis-aligned box centred on the origin.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
    let uv = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

    let mut mesh = MeshData::default();
    // +Z front
    mesh.push_quad(
        [
            Vec3::new(-w, -h, d),
            Vec3::new(-w, h, d),
            Vec3::new(w, h, d),
            Vec3::new(w, -h, d),
        ],
        uv,
    );
    // -Z back
    mesh.push_quad(
        [
            Vec3::new(w, -h, -d),
            Vec3::new(w, h, -d),
            Vec3::new(-w, h, -d),
            Vec3::new(-w, -h, -d),
        ],
        uv,
    );
    // -X left
    mesh.push_quad(
        [
            Vec3::new(-w, -h, -d),
            Vec3::new(-w, h, -d),
            Vec3::new(-w, h, d),
            Vec3::new(-w, -h, d),
        ],
        uv,
    );
    // +X right
    mesh.push_quad(
        [
            Vec3::new(w, -h, d),
            Vec3::new(w, h, d),
            Vec3::new(w, h, -d),
            Vec3::new(w, -h, -d),
        ],
        uv,
    );
    // +Y top
    mesh.push_quad(
        [
            Vec3::new(-w, h, d),
            Vec3::new(-w, h, -d),
            Vec3::new(w, h, -d),
            Vec3::new(w, h, d),
        ],
        uv,
    );
    // -Y bottom
    mesh.push_quad(
        [
            Vec3::new(-w, -h, -d),
            Vec3::new(-w, -h, d),
            Vec3::new(w, -h, d),
            Vec3::new(w, -h, -d),
        ],
        uv,
    );
    mesh
}

/// UV sphere with pole caps.
pub fn sphere(radius: f32, slices: usize, stacks: usize) -> MeshData {
    assert!(slices >= 3 && stacks >= 2);

    let mut mesh = MeshData::default();
    mesh.push_vertex(Vec3::new(0.0, radius, 0.0), Vec3::Y, [0.0, 0.0]);

    for i in 1..stacks {
        let phi = i as f32 * PI / stacks as f32;
        for j in 0..=slices {
            let theta = j as f32 * TAU / slices as f32;
            let p = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            );
            mesh.push_vertex(
                p,
                p.normalize(),
                [theta / TAU, phi / PI],
            );
        }
    }
    mesh.push_vertex(Vec3::new(0.0, -radius, 0.0), Vec3::NEG_Y, [0.0, 1.0]);

    // top fan
    for j in 1..=slices as u32 {
        mesh.indices.extend_from_slice(&[0, j + 1, j]);
    }
    // interior rings
    let ring = slices as u32 + 1;
    let base = 1u32;
    for i in 0..stacks as u32 - 2 {
        for j in 0..slices as u32 {
            let a = base + i * ring + j;
            let b = base + i * ring + j + 1;
            let c = base + (i + 1) * ring + j;
            let d = base + (i + 1) * ring + j + 1;
            mesh.indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }
    // bottom fan
    let south = mesh.vertices.len() as u32 - 1;
    let last_ring = south - ring;
    for j in 0..slices as u32 {
        mesh.indices
            .extend_from_slice(&[south, last_ring + j, last_ring + j + 1]);
    }
    mesh
}

/// Geodesic sphere: subdivided icosahedron projected onto the sphere.
pub fn geosphere(radius: f32, subdivisions: usize) -> MeshData {
    // icosahedron seed
    let x = 0.525731f32;
    let z = 0.850651f32;
    let seed = [
        Vec3::new(-x, 0.0, z),
        Vec3::new(x, 0.0, z),
        Vec3::new(-x, 0.0, -z),
        Vec3::new(x, 0.0, -z),
        Vec3::new(0.0, z, x),
        Vec3::new(0.0, z, -x),
        Vec3::new(0.0, -z, x),
        Vec3::new(0.0, -z, -x),
        Vec3::new(z, x, 0.0),
        Vec3::new(-z, x, 0.0),
        Vec3::new(z, -x, 0.0),
        Vec3::new(-z, -x, 0.0),
    ];
    #[rustfmt::skip]
    let faces: [[usize; 3]; 20] = [
        [1,4,0],  [4,9,0],  [4,5,9],  [8,5,4],  [1,8,4],
        [1,10,8], [10,3,8], [8,3,5],  [3,2,5],  [3,7,2],
        [3,10,7], [10,6,7], [6,11,7], [6,0,11], [6,1,0],
        [10,1,6], [11,0,9], [2,11,9], [5,2,9],  [11,2,7],
    ];

    let mut tris: Vec<[Vec3; 3]> = faces
        .iter()
        .map(|f| [seed[f[0]], seed[f[1]], seed[f[2]]])
        .collect();

    for _ in 0..subdivisions.min(6) {
        let mut next = Vec::with_capacity(tris.len() * 4);
        for [a, b, c] in tris {
            let ab = 0.5 * (a + b);
            let bc = 0.5 * (b + c);
            let ca = 0.5 * (c + a);
            next.push([a, ab, ca]);
            next.push([ab, b, bc]);
            next.push([ca, bc, c]);
            next.push([ab, bc, ca]);
        }
        tris = next;
    }

    let mut mesh = MeshData::default();
    for tri in tris {
        let base = mesh.vertices.len() as u32;
        for p in tri {
            let n = p.normalize();
            let theta = n.z.atan2(n.x).rem_euclid(TAU);
            let phi = n.y.acos();
            mesh.push_vertex(n * radius, n, [theta / TAU, phi / PI]);
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    mesh
}

/// Capped cylinder (or truncated cone when the radii differ).
pub fn cylinder(
    bottom_radius: f32,
    top_radius: f32,
    height: f32,
    slices: usize,
    stacks: usize,
) -> MeshData {
    assert!(slices >= 3 && stacks >= 1);

    let mut mesh = MeshData::default();
    let stack_height = height / stacks as f32;
    let radius_step = (top_radius - bottom_radius) / stacks as f32;

    // side rings
    for i in 0..=stacks {
        let y = -0.5 * height + i as f32 * stack_height;
        let r = bottom_radius + i as f32 * radius_step;
        for j in 0..=slices {
            let theta = j as f32 * TAU / slices as f32;
            let (sin, cos) = theta.sin_cos();
            // slope the normal by the radius delta over the height
            let tangent = Vec3::new(-sin, 0.0, cos);
            let bitangent = Vec3::new(
                (bottom_radius - top_radius) / height * cos,
                1.0,
                (bottom_radius - top_radius) / height * sin,
            );
            let normal = tangent.cross(bitangent).normalize();
            mesh.push_vertex(
                Vec3::new(r * cos, y, r * sin),
                normal,
                [j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32],
            );
        }
    }
    let ring = slices as u32 + 1;
    for i in 0..stacks as u32 {
        for j in 0..slices as u32 {
            let a = i * ring + j;
            let b = (i + 1) * ring + j;
            mesh.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    // caps
    for (cap_y, r, normal) in [
        (0.5 * height, top_radius, Vec3::Y),
        (-0.5 * height, bottom_radius, Vec3::NEG_Y),
    ] {
        if r <= 0.0 {
            continue;
        }
        let base = mesh.vertices.len() as u32;
        for j in 0..=slices {
            let theta = j as f32 * TAU / slices as f32;
            let (sin, cos) = theta.sin_cos();
            mesh.push_vertex(
                Vec3::new(r * cos, cap_y, r * sin),
                normal,
                [0.5 + 0.5 * cos, 0.5 - 0.5 * sin],
            );
        }
        let center = mesh.vertices.len() as u32;
        mesh.push_vertex(Vec3::new(0.0, cap_y, 0.0), normal, [0.5, 0.5]);
        for j in 0..slices as u32 {
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, base + j + 1, base + j]);
            } else {
                mesh.indices.extend_from_slice(&[center, base + j, base + j + 1]);
            }
        }
    }
    mesh
}

/// Cone: a cylinder with zero top radius.
pub fn cone(bottom_radius: f32, height: f32, slices: usize, stacks: usize) -> MeshData {
    cylinder(bottom_radius, 0.0, height, slices, stacks)
}

/// Single quad at `depth` spanning `[x, x+w] × [y-h, y]`, facing -Z.
pub fn quad(x: f32, y: f32, w: f32, h: f32, depth: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let normal = Vec3::NEG_Z;
    mesh.push_vertex(Vec3::new(x, y - h, depth), normal, [0.0, 1.0]);
    mesh.push_vertex(Vec3::new(x, y, depth), normal, [0.0, 0.0]);
    mesh.push_vertex(Vec3::new(x + w, y, depth), normal, [1.0, 0.0]);
    mesh.push_vertex(Vec3::new(x + w, y - h, depth), normal, [1.0, 1.0]);
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

/// Square pyramid: apex up, flat base.
pub fn pyramid(base: f32, height: f32) -> MeshData {
    let b = 0.5 * base;
    let apex = Vec3::new(0.0, 0.5 * height, 0.0);
    let y = -0.5 * height;
    let c = [
        Vec3::new(-b, y, -b),
        Vec3::new(b, y, -b),
        Vec3::new(b, y, b),
        Vec3::new(-b, y, b),
    ];

    let mut mesh = MeshData::default();
    let side_uv = [[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]];
    mesh.push_tri([c[0], c[1], apex], side_uv);
    mesh.push_tri([c[1], c[2], apex], side_uv);
    mesh.push_tri([c[2], c[3], apex], side_uv);
    mesh.push_tri([c[3], c[0], apex], side_uv);
    mesh.push_quad(
        [c[0], c[3], c[2], c[1]],
        [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
    );
    mesh
}

/// Ramp: a box with the +X top edge collapsed down to the base.
pub fn wedge(width: f32, height: f32, depth: f32) -> MeshData {
    let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
    let uv4 = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

    // back-top edge at -X, base at -Y, slope running down toward +X
    let b0 = Vec3::new(-w, -h, -d);
    let b1 = Vec3::new(w, -h, -d);
    let b2 = Vec3::new(w, -h, d);
    let b3 = Vec3::new(-w, -h, d);
    let t0 = Vec3::new(-w, h, -d);
    let t1 = Vec3::new(-w, h, d);

    let mut mesh = MeshData::default();
    // bottom
    mesh.push_quad([b0, b3, b2, b1], uv4);
    // vertical back (-X)
    mesh.push_quad([b0, t0, t1, b3], uv4);
    // slope
    mesh.push_quad([t0, b1, b2, t1], uv4);
    // triangular sides
    mesh.push_tri([b0, b1, t0], [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]);
    mesh.push_tri([b3, t1, b2], [[0.0, 1.0], [0.0, 0.0], [1.0, 1.0]]);
    mesh
}

/// Prism with an isosceles-triangle cross-section, ridge along Z.
pub fn triangular_prism(width: f32, height: f32, depth: f32) -> MeshData {
    let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
    let uv4 = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

    let b0 = Vec3::new(-w, -h, -d);
    let b1 = Vec3::new(w, -h, -d);
    let b2 = Vec3::new(w, -h, d);
    let b3 = Vec3::new(-w, -h, d);
    let r0 = Vec3::new(0.0, h, -d);
    let r1 = Vec3::new(0.0, h, d);

    let mut mesh = MeshData::default();
    // bottom
    mesh.push_quad([b0, b3, b2, b1], uv4);
    // slanted faces
    mesh.push_quad([b0, r0, r1, b3], uv4);
    mesh.push_quad([b1, b2, r1, r0], uv4);
    // triangle caps
    mesh.push_tri([b0, b1, r0], [[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]]);
    mesh.push_tri([b3, r1, b2], [[0.0, 1.0], [0.5, 0.0], [1.0, 1.0]]);
    mesh
}

/// Two square pyramids joined base to base.
pub fn diamond(width: f32, height: f32, depth: f32) -> MeshData {
    let (w, h, d) = (0.5 * width, 0.5 * height, 0.5 * depth);
    let top = Vec3::new(0.0, h, 0.0);
    let bottom = Vec3::new(0.0, -h, 0.0);
    let e = [
        Vec3::new(-w, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -d),
        Vec3::new(w, 0.0, 0.0),
        Vec3::new(0.0, 0.0, d),
    ];

    let mut mesh = MeshData::default();
    let uv = [[0.0, 1.0], [1.0, 1.0], [0.5, 0.0]];
    for k in 0..4 {
        let a = e[k];
        let b = e[(k + 1) % 4];
        mesh.push_tri([a, b, top], uv);
        mesh.push_tri([b, a, bottom], uv);
    }
    mesh
}

/// Torus around the Y axis.
pub fn torus(major_radius: f32, minor_radius: f32, rings: usize, sides: usize) -> MeshData {
    assert!(rings >= 3 && sides >= 3);

    let mut mesh = MeshData::default();
    for i in 0..=rings {
        let theta = i as f32 * TAU / rings as f32;
        let (ring_sin, ring_cos) = theta.sin_cos();
        let ring_center = Vec3::new(major_radius * ring_cos, 0.0, major_radius * ring_sin);
        for j in 0..=sides {
            let phi = j as f32 * TAU / sides as f32;
            let (tube_sin, tube_cos) = phi.sin_cos();
            let normal = Vec3::new(ring_cos * tube_cos, tube_sin, ring_sin * tube_cos);
            mesh.push_vertex(
                ring_center + minor_radius * normal,
                normal,
                [i as f32 / rings as f32, j as f32 / sides as f32],
            );
        }
    }
    let ring = sides as u32 + 1;
    for i in 0..rings as u32 {
        for j in 0..sides as u32 {
            let a = i * ring + j;
            let b = (i + 1) * ring + j;
            mesh.indices
                .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn grid_vertex_and_quad_counts() {
        let g = grid(125.0, 125.0, 51, 51);
        assert_eq!(g.vertices.len(), 51 * 51);
        assert_eq!(g.indices.len(), 50 * 50 * 6);
    }

    #[test]
    fn grid_spans_requested_extent() {
        let g = grid(10.0, 4.0, 3, 5);
        let xs: Vec<f32> = g.vertices.iter().map(|v| v.position[0]).collect();
        let zs: Vec<f32> = g.vertices.iter().map(|v| v.position[2]).collect();
        assert_relative_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -5.0);
        assert_relative_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 5.0);
        assert_relative_eq!(zs.iter().cloned().fold(f32::MAX, f32::min), -2.0);
        assert_relative_eq!(zs.iter().cloned().fold(f32::MIN, f32::max), 2.0);
    }

    #[test]
    fn sphere_vertices_sit_on_the_sphere() {
        let s = sphere(2.0, 12, 8);
        for v in &s.vertices {
            let r = Vec3::from_array(v.position).length();
            assert_relative_eq!(r, 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn geosphere_triangle_count_grows_fourfold() {
        assert_eq!(geosphere(1.0, 0).indices.len(), 20 * 3);
        assert_eq!(geosphere(1.0, 2).indices.len(), 20 * 4 * 4 * 3);
    }

    #[test]
    fn all_indices_in_bounds() {
        for mesh in [
            cuboid(4.5, 3.5, 4.5),
            cylinder(0.5, 0.3, 6.0, 20, 20),
            cone(1.0, 1.0, 9, 5),
            sphere(0.5, 20, 20),
            geosphere(1.0, 2),
            quad(0.0, 1.0, 1.0, 1.0, 0.5),
            pyramid(1.0, 1.0),
            wedge(1.0, 1.0, 1.0),
            triangular_prism(1.0, 1.0, 3.0),
            diamond(1.0, 1.0, 1.0),
            torus(2.0, 0.5, 20, 20),
        ] {
            assert!(!mesh.indices.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
            let max = *mesh.indices.iter().max().unwrap() as usize;
            assert!(max < mesh.vertices.len());
        }
    }
}
