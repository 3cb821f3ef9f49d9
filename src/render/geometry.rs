//! Procedural geometry for the primitives the scene is built from.
//!
//! Every generator returns a [`MeshData`]: interleaved vertices, indices and the draw ranges
//! needed to render them. The draw ranges are derived from the same segment constants that
//! drive the tessellation, so vertex counts are never repeated by hand in the renderer.

use std::{f32::consts::TAU, sync::Arc};

use glam::{Vec2, Vec3};

use crate::abs::{DrawRange, Mesh, Vertex};

/// Segments around the rim of a cap fan. The fan closes by repeating its first rim vertex.
pub const CAP_SEGMENTS: u32 = 34;
/// Segments around the side wall of a cylinder or cone.
pub const SIDE_SEGMENTS: u32 = 72;
/// Latitude bands of the sphere.
pub const SPHERE_STACKS: u32 = 18;
/// Longitude bands of the sphere.
pub const SPHERE_SECTORS: u32 = 36;
/// Sides of the hexagonal prism.
pub const HEXAGON_SIDES: u32 = 6;
/// Half the thickness of the hexagonal prism.
pub const HEXAGON_HALF_HEIGHT: f32 = 0.1;

/// Vertices in one cap fan: the center plus `CAP_SEGMENTS + 1` rim vertices.
pub const CAP_VERTEX_COUNT: u32 = CAP_SEGMENTS + 2;
/// Vertices in the side wall strip: a bottom and a top vertex per column.
pub const SIDE_VERTEX_COUNT: u32 = 2 * (SIDE_SEGMENTS + 1);

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct SceneVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl SceneVertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl Vertex for SceneVertex {
    fn vertex_attribs(gl: &glow::Context) {
        use glow::HasContext;

        unsafe {
            let stride = std::mem::size_of::<SceneVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Normal attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, size_of::<Vec3>() as i32);

            // Texture coordinate attribute
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(
                2,
                2,
                glow::FLOAT,
                false,
                stride,
                (2 * size_of::<Vec3>()) as i32,
            );
        }
    }
}

/// CPU side geometry for one primitive.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<SceneVertex>,
    pub indices: Vec<u32>,
    pub draws: Vec<DrawRange>,
}

impl MeshData {
    /// Uploads the geometry to the GPU.
    pub fn upload(&self, gl: &Arc<glow::Context>) -> Result<Mesh, String> {
        Mesh::new(gl, &self.vertices, &self.indices, self.draws.clone())
    }

    fn triangles(vertices: Vec<SceneVertex>, indices: Vec<u32>) -> Self {
        let draws = vec![DrawRange::Elements {
            mode: glow::TRIANGLES,
            count: indices.len() as i32,
        }];
        Self {
            vertices,
            indices,
            draws,
        }
    }
}

/// Point on a circle of `radius` in the XZ plane.
fn rim(angle: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Pushes a triangle fan cap at height `y` and returns its draw range.
fn push_cap(vertices: &mut Vec<SceneVertex>, y: f32, radius: f32, normal: Vec3) -> DrawRange {
    let first = vertices.len() as i32;
    vertices.push(SceneVertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5)));
    for i in 0..=CAP_SEGMENTS {
        let angle = TAU * i as f32 / CAP_SEGMENTS as f32;
        let uv = Vec2::new(0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin());
        vertices.push(SceneVertex::new(rim(angle, radius, y), normal, uv));
    }
    DrawRange::Arrays {
        mode: glow::TRIANGLE_FAN,
        first,
        count: vertices.len() as i32 - first,
    }
}

/// A closed frustum standing on the XZ plane, `y` from 0 to 1.
///
/// Laid out as bottom fan, top fan, then the side wall as one triangle strip.
fn frustum(bottom_radius: f32, top_radius: f32) -> MeshData {
    let mut vertices = Vec::with_capacity((2 * CAP_VERTEX_COUNT + SIDE_VERTEX_COUNT) as usize);
    let mut draws = Vec::with_capacity(3);

    draws.push(push_cap(&mut vertices, 0.0, bottom_radius, Vec3::NEG_Y));
    draws.push(push_cap(&mut vertices, 1.0, top_radius, Vec3::Y));

    let first = vertices.len() as i32;
    let slope = bottom_radius - top_radius;
    for i in 0..=SIDE_SEGMENTS {
        let t = i as f32 / SIDE_SEGMENTS as f32;
        let angle = TAU * t;
        let normal = Vec3::new(angle.cos(), slope, angle.sin()).normalize();
        vertices.push(SceneVertex::new(rim(angle, bottom_radius, 0.0), normal, Vec2::new(t, 0.0)));
        vertices.push(SceneVertex::new(rim(angle, top_radius, 1.0), normal, Vec2::new(t, 1.0)));
    }
    draws.push(DrawRange::Arrays {
        mode: glow::TRIANGLE_STRIP,
        first,
        count: vertices.len() as i32 - first,
    });

    MeshData {
        vertices,
        indices: Vec::new(),
        draws,
    }
}

/// Unit radius cylinder, base at `y = 0`, top at `y = 1`.
pub fn cylinder() -> MeshData {
    frustum(1.0, 1.0)
}

/// Unit radius cone with the same layout as [`cylinder`]. The top cap collapses onto the apex.
pub fn cone() -> MeshData {
    frustum(1.0, 0.0)
}

/// A 2x2 quad in the XZ plane facing up.
pub fn plane() -> MeshData {
    let vertices = vec![
        SceneVertex::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::Y, Vec2::new(0.0, 1.0)),
        SceneVertex::new(Vec3::new(1.0, 0.0, -1.0), Vec3::Y, Vec2::new(1.0, 1.0)),
        SceneVertex::new(Vec3::new(1.0, 0.0, 1.0), Vec3::Y, Vec2::new(1.0, 0.0)),
        SceneVertex::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::Y, Vec2::new(0.0, 0.0)),
    ];
    MeshData::triangles(vertices, vec![0, 3, 2, 0, 2, 1])
}

/// Unit radius UV sphere centered at the origin.
pub fn sphere() -> MeshData {
    let columns = SPHERE_SECTORS + 1;
    let mut vertices = Vec::with_capacity(((SPHERE_STACKS + 1) * columns) as usize);
    for stack in 0..=SPHERE_STACKS {
        let phi = std::f32::consts::PI * stack as f32 / SPHERE_STACKS as f32;
        for sector in 0..=SPHERE_SECTORS {
            let theta = TAU * sector as f32 / SPHERE_SECTORS as f32;
            let normal = Vec3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            let uv = Vec2::new(
                sector as f32 / SPHERE_SECTORS as f32,
                1.0 - stack as f32 / SPHERE_STACKS as f32,
            );
            vertices.push(SceneVertex::new(normal, normal, uv));
        }
    }

    let mut indices = Vec::new();
    for stack in 0..SPHERE_STACKS {
        for sector in 0..SPHERE_SECTORS {
            let i0 = stack * columns + sector;
            let i1 = i0 + 1;
            let i2 = i0 + columns;
            let i3 = i2 + 1;

            // The pole rows collapse to a point, so one triangle per quad is enough there
            if stack > 0 {
                indices.extend_from_slice(&[i0, i2, i1]);
            }
            if stack < SPHERE_STACKS - 1 {
                indices.extend_from_slice(&[i1, i2, i3]);
            }
        }
    }

    MeshData::triangles(vertices, indices)
}

/// Unit cube centered at the origin, four vertices per face so every face gets a flat normal.
pub fn cube() -> MeshData {
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        // normal, u axis, v axis
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * 0.5;
            let uv = Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5);
            vertices.push(SceneVertex::new(position, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::triangles(vertices, indices)
}

/// Flat hexagonal prism of unit radius centered at the origin.
pub fn hexagon() -> MeshData {
    let h = HEXAGON_HALF_HEIGHT;
    let corner = |i: u32| TAU * (i % HEXAGON_SIDES) as f32 / HEXAGON_SIDES as f32;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for (y, normal) in [(h, Vec3::Y), (-h, Vec3::NEG_Y)] {
        let center = vertices.len() as u32;
        vertices.push(SceneVertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5)));
        for i in 0..HEXAGON_SIDES {
            let angle = corner(i);
            let uv = Vec2::new(0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin());
            vertices.push(SceneVertex::new(rim(angle, 1.0, y), normal, uv));
        }
        for i in 0..HEXAGON_SIDES {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % HEXAGON_SIDES;
            if normal.y > 0.0 {
                indices.extend_from_slice(&[center, b, a]);
            } else {
                indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    for i in 0..HEXAGON_SIDES {
        let (a0, a1) = (corner(i), corner(i + 1));
        let normal = rim(TAU * (i as f32 + 0.5) / HEXAGON_SIDES as f32, 1.0, 0.0);
        let u0 = i as f32 / HEXAGON_SIDES as f32;
        let u1 = (i + 1) as f32 / HEXAGON_SIDES as f32;
        let base = vertices.len() as u32;
        vertices.push(SceneVertex::new(rim(a0, 1.0, -h), normal, Vec2::new(u0, 0.0)));
        vertices.push(SceneVertex::new(rim(a1, 1.0, -h), normal, Vec2::new(u1, 0.0)));
        vertices.push(SceneVertex::new(rim(a1, 1.0, h), normal, Vec2::new(u1, 1.0)));
        vertices.push(SceneVertex::new(rim(a0, 1.0, h), normal, Vec2::new(u0, 1.0)));
        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    MeshData::triangles(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shapes() -> Vec<(&'static str, MeshData)> {
        vec![
            ("cylinder", cylinder()),
            ("cone", cone()),
            ("plane", plane()),
            ("sphere", sphere()),
            ("cube", cube()),
            ("hexagon", hexagon()),
        ]
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SceneVertex>(), 8 * std::mem::size_of::<f32>());
        for (name, mesh) in all_shapes() {
            assert_eq!(
                std::mem::size_of_val(mesh.vertices.as_slice()),
                mesh.vertices.len() * 32,
                "{name}"
            );
        }
    }

    #[test]
    fn test_indices_stay_in_range() {
        for (name, mesh) in all_shapes() {
            let vertex_count = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < vertex_count), "{name}");
            assert_eq!(mesh.indices.len() % 3, 0, "{name}");
        }
    }

    #[test]
    fn test_draw_ranges_stay_in_range() {
        for (name, mesh) in all_shapes() {
            assert!(!mesh.draws.is_empty(), "{name}");
            for draw in &mesh.draws {
                match *draw {
                    DrawRange::Arrays { first, count, .. } => {
                        assert!(first >= 0 && count > 0, "{name}");
                        assert!((first + count) as usize <= mesh.vertices.len(), "{name}");
                    }
                    DrawRange::Elements { count, .. } => {
                        assert_eq!(count as usize, mesh.indices.len(), "{name}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_cylinder_and_cone_share_fan_strip_layout() {
        let expected = vec![
            DrawRange::Arrays {
                mode: glow::TRIANGLE_FAN,
                first: 0,
                count: 36,
            },
            DrawRange::Arrays {
                mode: glow::TRIANGLE_FAN,
                first: 36,
                count: 36,
            },
            DrawRange::Arrays {
                mode: glow::TRIANGLE_STRIP,
                first: 72,
                count: 146,
            },
        ];
        for mesh in [cylinder(), cone()] {
            assert_eq!(mesh.draws, expected);
            assert_eq!(mesh.vertices.len(), 218);
            assert!(mesh.indices.is_empty());
        }
    }

    #[test]
    fn test_cone_top_collapses_to_apex() {
        let mesh = cone();
        let apex = Vec3::new(0.0, 1.0, 0.0);
        let top_fan = &mesh.vertices[CAP_VERTEX_COUNT as usize..2 * CAP_VERTEX_COUNT as usize];
        assert!(top_fan.iter().all(|v| v.position.abs_diff_eq(apex, 1e-6)));
    }

    #[test]
    fn test_fans_close_their_rim() {
        let mesh = cylinder();
        let first_rim = mesh.vertices[1].position;
        let last_rim = mesh.vertices[CAP_VERTEX_COUNT as usize - 1].position;
        assert!(first_rim.abs_diff_eq(last_rim, 1e-5));
    }

    #[test]
    fn test_cube_has_six_quads() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for v in &mesh.vertices {
            assert!(v.position.abs().max_element() <= 0.5 + 1e-6);
            // Every vertex lies on the face its normal points at
            assert!((v.position.dot(v.normal) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_vertices_lie_on_unit_sphere() {
        let mesh = sphere();
        assert_eq!(
            mesh.vertices.len() as u32,
            (SPHERE_STACKS + 1) * (SPHERE_SECTORS + 1)
        );
        assert_eq!(
            mesh.indices.len() as u32,
            3 * SPHERE_SECTORS * (2 * SPHERE_STACKS - 2)
        );
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
            assert!(v.normal.is_normalized());
        }
    }

    #[test]
    fn test_hexagon_is_a_six_sided_prism() {
        let mesh = hexagon();
        // two caps of center + 6 corners, then 6 side quads
        assert_eq!(mesh.vertices.len() as u32, 2 * (1 + HEXAGON_SIDES) + 4 * HEXAGON_SIDES);
        assert_eq!(mesh.indices.len() as u32, 3 * 2 * HEXAGON_SIDES + 6 * HEXAGON_SIDES);
        for v in &mesh.vertices[2 * (1 + HEXAGON_SIDES) as usize..] {
            // side normals are horizontal and point away from the axis
            assert!(v.normal.y.abs() < 1e-6);
            assert!(v.normal.dot(v.position.with_y(0.0)) > 0.0);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        for (name, mesh) in all_shapes() {
            for v in &mesh.vertices {
                assert!((v.normal.length() - 1.0).abs() < 1e-4, "{name}");
            }
        }
    }
}
