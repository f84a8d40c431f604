//! Static geometry of both demos.

use std::ops::Range;

use crate::vertex::{QuadVertex, SceneVertex, ScreenVertex};

const fn quad(position: [f32; 2], color: [f32; 3], texcoord: [f32; 2]) -> QuadVertex {
    QuadVertex { position, color, texcoord }
}

const fn scene(position: [f32; 3], color: [f32; 3], texcoord: [f32; 2]) -> SceneVertex {
    SceneVertex { position, color, texcoord }
}

const fn screen(position: [f32; 2], texcoord: [f32; 2]) -> ScreenVertex {
    ScreenVertex { position, texcoord }
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Corners of the blended quad: top-left, top-right, bottom-right, bottom-left.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    quad([-0.5, 0.5], [1.0, 0.0, 0.0], [0.0, 0.0]),
    quad([0.5, 0.5], [0.0, 1.0, 0.0], [1.0, 0.0]),
    quad([0.5, -0.5], [0.0, 0.0, 1.0], [1.0, 1.0]),
    quad([-0.5, -0.5], [1.0, 1.0, 1.0], [0.0, 1.0]),
];

/// Two triangles over [`QUAD_VERTICES`].
pub const QUAD_ELEMENTS: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Vertices of the cube, drawn by [`CUBE_RANGE`].
pub const CUBE_RANGE: Range<usize> = 0..36;

/// Vertices of the floor, drawn by [`FLOOR_RANGE`].
pub const FLOOR_RANGE: Range<usize> = 36..42;

/// Height of the floor plane; it touches the bottom face of the cube.
pub const FLOOR_Z: f32 = -0.5;

/// Cube (6 faces of 2 triangles) followed by the floor.
#[rustfmt::skip]
pub const SCENE_VERTICES: [SceneVertex; 42] = [
    scene([-0.5, -0.5, -0.5], WHITE, [0.0, 0.0]),
    scene([ 0.5, -0.5, -0.5], WHITE, [1.0, 0.0]),
    scene([ 0.5,  0.5, -0.5], WHITE, [1.0, 1.0]),
    scene([ 0.5,  0.5, -0.5], WHITE, [1.0, 1.0]),
    scene([-0.5,  0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([-0.5, -0.5, -0.5], WHITE, [0.0, 0.0]),

    scene([-0.5, -0.5,  0.5], WHITE, [0.0, 0.0]),
    scene([ 0.5, -0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([ 0.5,  0.5,  0.5], WHITE, [1.0, 1.0]),
    scene([ 0.5,  0.5,  0.5], WHITE, [1.0, 1.0]),
    scene([-0.5,  0.5,  0.5], WHITE, [0.0, 1.0]),
    scene([-0.5, -0.5,  0.5], WHITE, [0.0, 0.0]),

    scene([-0.5,  0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([-0.5,  0.5, -0.5], WHITE, [1.0, 1.0]),
    scene([-0.5, -0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([-0.5, -0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([-0.5, -0.5,  0.5], WHITE, [0.0, 0.0]),
    scene([-0.5,  0.5,  0.5], WHITE, [1.0, 0.0]),

    scene([ 0.5,  0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([ 0.5,  0.5, -0.5], WHITE, [1.0, 1.0]),
    scene([ 0.5, -0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([ 0.5, -0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([ 0.5, -0.5,  0.5], WHITE, [0.0, 0.0]),
    scene([ 0.5,  0.5,  0.5], WHITE, [1.0, 0.0]),

    scene([-0.5, -0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([ 0.5, -0.5, -0.5], WHITE, [1.0, 1.0]),
    scene([ 0.5, -0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([ 0.5, -0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([-0.5, -0.5,  0.5], WHITE, [0.0, 0.0]),
    scene([-0.5, -0.5, -0.5], WHITE, [0.0, 1.0]),

    scene([-0.5,  0.5, -0.5], WHITE, [0.0, 1.0]),
    scene([ 0.5,  0.5, -0.5], WHITE, [1.0, 1.0]),
    scene([ 0.5,  0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([ 0.5,  0.5,  0.5], WHITE, [1.0, 0.0]),
    scene([-0.5,  0.5,  0.5], WHITE, [0.0, 0.0]),
    scene([-0.5,  0.5, -0.5], WHITE, [0.0, 1.0]),

    scene([-1.0, -1.0, FLOOR_Z], BLACK, [0.0, 0.0]),
    scene([ 1.0, -1.0, FLOOR_Z], BLACK, [1.0, 0.0]),
    scene([ 1.0,  1.0, FLOOR_Z], BLACK, [1.0, 1.0]),
    scene([ 1.0,  1.0, FLOOR_Z], BLACK, [1.0, 1.0]),
    scene([-1.0,  1.0, FLOOR_Z], BLACK, [0.0, 1.0]),
    scene([-1.0, -1.0, FLOOR_Z], BLACK, [0.0, 0.0]),
];

/// Fullscreen quad in normalized device coordinates.
pub const SCREEN_VERTICES: [ScreenVertex; 6] = [
    screen([-1.0, 1.0], [0.0, 1.0]),
    screen([1.0, 1.0], [1.0, 1.0]),
    screen([1.0, -1.0], [1.0, 0.0]),
    screen([1.0, -1.0], [1.0, 0.0]),
    screen([-1.0, -1.0], [0.0, 0.0]),
    screen([-1.0, 1.0], [0.0, 1.0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_and_floor_ranges_cover_scene_buffer() {
        assert_eq!(CUBE_RANGE.len(), 36);
        assert_eq!(FLOOR_RANGE.len(), 6);
        assert_eq!(CUBE_RANGE.end, FLOOR_RANGE.start);
        assert_eq!(FLOOR_RANGE.end, SCENE_VERTICES.len());
    }

    #[test]
    fn test_cube_is_unit_sized_and_floor_is_flat() {
        for v in &SCENE_VERTICES[CUBE_RANGE] {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
            assert_eq!(v.color, WHITE);
        }
        for v in &SCENE_VERTICES[FLOOR_RANGE] {
            assert_eq!(v.position[2], FLOOR_Z);
            assert_eq!(v.color, BLACK);
        }
    }

    #[test]
    fn test_quad_elements_index_all_corners() {
        for i in 0..QUAD_VERTICES.len() as u32 {
            assert!(QUAD_ELEMENTS.contains(&i));
        }
        assert!(QUAD_ELEMENTS.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn test_screen_quad_spans_ndc() {
        for v in &SCREEN_VERTICES {
            assert!(v.position.iter().all(|c| c.abs() == 1.0));
            // texcoords follow positions: -1 maps to 0, 1 maps to 1
            assert_eq!(v.texcoord[0], (v.position[0] + 1.0) / 2.0);
            assert_eq!(v.texcoord[1], (v.position[1] + 1.0) / 2.0);
        }
    }
}
