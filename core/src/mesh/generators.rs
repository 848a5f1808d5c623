//! Mesh generators for common shapes.
//!
//! Every generator is a pure function returning [`GeometryData`] laid out for
//! [`VertexLayout::position_color`](super::VertexLayout::position_color):
//! float3 positions, RGBA8 colors and u32 triangle indices.
//!
//! None of them fail. Out-of-range parameters (zero sectors, zero radius)
//! give degenerate but well-formed output; range checks belong to callers.

use std::f32::consts::{FRAC_PI_2, PI};

use super::data::GeometryData;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const YELLOW: [u8; 4] = [255, 255, 0, 255];
const MAGENTA: [u8; 4] = [255, 0, 255, 255];
const CYAN: [u8; 4] = [0, 255, 255, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Cube corner positions, four per face in face order
/// (upper, lower, right, left, front, back).
#[rustfmt::skip]
const CUBE_POSITIONS: [f32; 72] = [
    // Upper face
    -1.0,  1.0, -1.0,
    -1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0, -1.0,
    // Lower face
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0, -1.0,  1.0,
    -1.0, -1.0,  1.0,
    // Right face
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0,  1.0,  1.0,
     1.0, -1.0,  1.0,
    // Left face
    -1.0, -1.0, -1.0,
    -1.0, -1.0,  1.0,
    -1.0,  1.0,  1.0,
    -1.0,  1.0, -1.0,
    // Front face
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
    // Back face
    -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,
];

/// Generate a colored quad on the XY plane.
///
/// Unit quad centered at the origin, 4 vertices and 2 triangles, with a red,
/// green, blue and magenta corner.
pub fn generate_plane() -> GeometryData {
    #[rustfmt::skip]
    let positions = vec![
        -0.5, -0.5, 0.0,
         0.5, -0.5, 0.0,
         0.5,  0.5, 0.0,
        -0.5,  0.5, 0.0,
    ];
    let colors = [RED, GREEN, BLUE, MAGENTA].concat();
    let indices = vec![0, 1, 2, 2, 3, 0];

    GeometryData::new(positions, colors, indices).with_label("plane")
}

/// Generate a cube spanning [-1, 1] on every axis with one flat color per face.
///
/// 24 vertices (4 per face, so faces do not share colors) and 12 triangles.
/// Face colors: upper red, lower green, right blue, left yellow, front
/// magenta, back cyan.
pub fn generate_colored_cube() -> GeometryData {
    cube_with_face_colors([RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN]).with_label("colored_cube")
}

/// Generate the same cube as [`generate_colored_cube`] with every face white.
pub fn generate_white_cube() -> GeometryData {
    cube_with_face_colors([WHITE; 6]).with_label("white_cube")
}

fn cube_with_face_colors(face_colors: [[u8; 4]; 6]) -> GeometryData {
    let colors = face_colors
        .iter()
        .flat_map(|color| std::iter::repeat(*color).take(4))
        .flatten()
        .collect();

    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    GeometryData::new(CUBE_POSITIONS.to_vec(), colors, indices)
}

/// Generate a UV sphere centered at the origin with its poles on the Z axis.
///
/// Vertices are laid out row-major by stack (from +Z to -Z) then sector,
/// with `sector_count + 1` vertices per stack so the seam column is
/// duplicated. Stack 0 and stack `stack_count` collapse to the poles.
///
/// Each vertex color encodes its direction from the center:
/// `channel = (coordinate / radius + 1) / 2 * 255`, alpha 255.
///
/// Stacks touching a pole contribute one triangle per sector (the pole fan),
/// every other stack two, for `2 * sector_count * (stack_count - 1)`
/// triangles in total.
///
/// # Arguments
///
/// * `sector_count` - Longitude subdivisions (3 or more for a closed surface)
/// * `stack_count` - Latitude subdivisions (2 or more for a closed surface)
/// * `radius` - Sphere radius
pub fn generate_sphere(sector_count: u32, stack_count: u32, radius: f32) -> GeometryData {
    let sector_step = 2.0 * PI / sector_count as f32;
    let stack_step = PI / stack_count as f32;

    let row_len = sector_count as usize + 1;
    let vertex_count = (stack_count as usize + 1) * row_len;
    let mut positions = Vec::with_capacity(vertex_count * 3);
    let mut colors = Vec::with_capacity(vertex_count * 4);

    for i in 0..=stack_count {
        let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();

        for j in 0..=sector_count {
            let sector_angle = j as f32 * sector_step;
            let x = xy * sector_angle.cos();
            let y = xy * sector_angle.sin();

            positions.extend_from_slice(&[x, y, z]);
            colors.extend_from_slice(&[
                direction_channel(x, radius),
                direction_channel(y, radius),
                direction_channel(z, radius),
                255,
            ]);
        }
    }

    let triangle_count = 2 * sector_count as usize * (stack_count as usize).saturating_sub(1);
    let mut indices = Vec::with_capacity(triangle_count * 3);

    for i in 0..stack_count {
        let first_stack = i == 0;
        let last_stack = i + 1 == stack_count;

        for j in 0..sector_count {
            let k1 = i * (sector_count + 1) + j;
            let k2 = k1 + sector_count + 1;

            if !first_stack {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if !last_stack {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
        }
    }

    GeometryData::new(positions, colors, indices).with_label("sphere")
}

/// Map one coordinate of a point on the sphere to a color channel.
///
/// NaN (from a zero radius or zero subdivisions) maps to 0.
fn direction_channel(coordinate: f32, radius: f32) -> u8 {
    let normalized = (coordinate / radius).clamp(-1.0, 1.0);
    ((normalized + 1.0) / 2.0 * 255.0) as u8
}

/// Build drawable geometry from an already-parsed triangulated surface.
///
/// Positions (flat float triples) and indices (flat u32 triples) pass
/// through unchanged; every vertex gets an opaque white color.
pub fn generate_from_surface(positions: Vec<f32>, indices: Vec<u32>) -> GeometryData {
    let colors = vec![255u8; positions.len() / 3 * 4];
    GeometryData::new(positions, colors, indices).with_label("surface")
}
