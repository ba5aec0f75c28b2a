//! Static geometry of the textured cube.
//!
//! Each face owns four vertices so it can carry its own color and texture
//! coordinates. The vertex order within a face is always
//! left-top, right-top, left-bottom, right-bottom.

use glam::{Vec2, Vec3};
use glow::HasContext;
use serde::{Deserialize, Serialize};

use crate::abs::Vertex;

/// A single vertex of the cube: position, face color and texture coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct CubeVertex {
    pub position: Vec3,
    pub color: Vec3,
    pub uv: Vec2,
}

impl CubeVertex {
    const fn new(position: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position: Vec3::new(position[0], position[1], position[2]),
            color: Vec3::new(color[0], color[1], color[2]),
            uv: Vec2::new(uv[0], uv[1]),
        }
    }
}

impl Vertex for CubeVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<CubeVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Color attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                3,
                glow::FLOAT,
                false,
                stride,
                std::mem::size_of::<Vec3>() as i32,
            );

            // Texture coordinate attribute
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(
                2,
                2,
                glow::FLOAT,
                false,
                stride,
                2 * std::mem::size_of::<Vec3>() as i32,
            );
        }
    }
}

/// How hidden faces of the cube are removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullMode {
    /// Rely on clockwise winding and back-face culling.
    #[default]
    CullFace,
    /// Rely on the depth buffer.
    DepthTest,
}

pub const VERTICES_PER_FACE: usize = 4;
pub const FACE_COUNT: usize = 6;
pub const TRIANGLE_COUNT: usize = 12;
pub const INDEX_COUNT: usize = TRIANGLE_COUNT * 3;

const LT: [f32; 2] = [0.0, 1.0];
const RT: [f32; 2] = [1.0, 1.0];
const LB: [f32; 2] = [0.0, 0.0];
const RB: [f32; 2] = [1.0, 0.0];

const FRONT: [f32; 3] = [0.0, 0.0, 1.0];
const BACK: [f32; 3] = [0.0, 0.0, 0.5];
const LEFT: [f32; 3] = [0.5, 0.0, 0.0];
const RIGHT: [f32; 3] = [1.0, 0.0, 0.0];
const TOP: [f32; 3] = [0.0, 1.0, 0.0];
const BOTTOM: [f32; 3] = [0.0, 0.5, 0.0];

/// The 24 cube vertices, grouped by face: front (+z), back (-z), left (-x),
/// right (+x), top (+y), bottom (-y).
pub const CUBE_VERTICES: [CubeVertex; FACE_COUNT * VERTICES_PER_FACE] = [
    // Front
    CubeVertex::new([-0.5, 0.5, 0.5], FRONT, LT),
    CubeVertex::new([0.5, 0.5, 0.5], FRONT, RT),
    CubeVertex::new([-0.5, -0.5, 0.5], FRONT, LB),
    CubeVertex::new([0.5, -0.5, 0.5], FRONT, RB),
    // Back
    CubeVertex::new([-0.5, 0.5, -0.5], BACK, LT),
    CubeVertex::new([0.5, 0.5, -0.5], BACK, RT),
    CubeVertex::new([-0.5, -0.5, -0.5], BACK, LB),
    CubeVertex::new([0.5, -0.5, -0.5], BACK, RB),
    // Left
    CubeVertex::new([-0.5, 0.5, -0.5], LEFT, LT),
    CubeVertex::new([-0.5, 0.5, 0.5], LEFT, RT),
    CubeVertex::new([-0.5, -0.5, -0.5], LEFT, LB),
    CubeVertex::new([-0.5, -0.5, 0.5], LEFT, RB),
    // Right
    CubeVertex::new([0.5, 0.5, -0.5], RIGHT, LT),
    CubeVertex::new([0.5, 0.5, 0.5], RIGHT, RT),
    CubeVertex::new([0.5, -0.5, -0.5], RIGHT, LB),
    CubeVertex::new([0.5, -0.5, 0.5], RIGHT, RB),
    // Top
    CubeVertex::new([-0.5, 0.5, -0.5], TOP, LT),
    CubeVertex::new([0.5, 0.5, -0.5], TOP, RT),
    CubeVertex::new([-0.5, 0.5, 0.5], TOP, LB),
    CubeVertex::new([0.5, 0.5, 0.5], TOP, RB),
    // Bottom
    CubeVertex::new([-0.5, -0.5, -0.5], BOTTOM, LT),
    CubeVertex::new([-0.5, -0.5, 0.5], BOTTOM, RT),
    CubeVertex::new([0.5, -0.5, -0.5], BOTTOM, LB),
    CubeVertex::new([0.5, -0.5, 0.5], BOTTOM, RB),
];

/// Every triangle wound clockwise as seen from outside the cube, so that
/// `front_face(CW)` + `cull_face(BACK)` hides the far side.
const CULL_FACE_INDICES: [u32; INDEX_COUNT] = [
    0, 1, 2, 1, 3, 2, // front
    4, 6, 5, 5, 6, 7, // back
    8, 9, 10, 9, 11, 10, // left
    12, 14, 13, 13, 14, 15, // right
    16, 17, 18, 17, 19, 18, // top
    20, 21, 22, 21, 23, 22, // bottom
];

/// Same triangles as [`CULL_FACE_INDICES`]; winding is irrelevant once the
/// depth buffer resolves visibility.
const DEPTH_TEST_INDICES: [u32; INDEX_COUNT] = [
    0, 1, 2, 1, 3, 2, // front
    5, 6, 4, 7, 6, 5, // back
    8, 9, 10, 9, 11, 10, // left
    13, 14, 12, 15, 14, 13, // right
    18, 17, 16, 18, 19, 17, // top
    22, 21, 20, 22, 23, 21, // bottom
];

/// Returns the index list matching the given culling strategy.
pub fn cube_indices(mode: CullMode) -> &'static [u32; INDEX_COUNT] {
    match mode {
        CullMode::CullFace => &CULL_FACE_INDICES,
        CullMode::DepthTest => &DEPTH_TEST_INDICES,
    }
}
