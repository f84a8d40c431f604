//! Interleaved vertex formats.
//!
//! Every vertex type is a `#[repr(C)]` struct of `f32` arrays and describes
//! itself through a [`VertexLayout`]. The GL side derives strides and
//! attribute offsets from the layout, so the layout must agree with the
//! struct; the tests below check exactly that.

/// A named vertex attribute made of `components` floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub components: usize,
}

/// Ordered list of attributes packed back to back in one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub attributes: &'static [Attribute],
}

impl VertexLayout {
    /// Number of floats per vertex.
    pub fn stride_floats(&self) -> usize {
        self.attributes.iter().map(|a| a.components).sum()
    }

    /// Number of bytes per vertex.
    pub fn stride_bytes(&self) -> usize {
        self.stride_floats() * size_of::<f32>()
    }

    /// Offset of the `index`-th attribute, in floats.
    pub fn offset_floats(&self, index: usize) -> usize {
        self.attributes[..index].iter().map(|a| a.components).sum()
    }

    /// Offset of the `index`-th attribute, in bytes.
    pub fn offset_bytes(&self, index: usize) -> usize {
        self.offset_floats(index) * size_of::<f32>()
    }

    /// Iterates over `(attribute, byte offset)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, usize)> + '_ {
        self.attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a, self.offset_bytes(i)))
    }
}

/// Implemented by every vertex type uploaded to the GPU.
pub trait Vertex: Copy {
    const LAYOUT: VertexLayout;
}

/// Vertex of the blended quad.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex for QuadVertex {
    const LAYOUT: VertexLayout = VertexLayout {
        attributes: &[
            Attribute { name: "position", components: 2 },
            Attribute { name: "color", components: 3 },
            Attribute { name: "texcoord", components: 2 },
        ],
    };
}

/// Vertex of the cube and floor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex for SceneVertex {
    const LAYOUT: VertexLayout = VertexLayout {
        attributes: &[
            Attribute { name: "position", components: 3 },
            Attribute { name: "color", components: 3 },
            Attribute { name: "texcoord", components: 2 },
        ],
    };
}

/// Vertex of the fullscreen quad used by the post-process pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct ScreenVertex {
    pub position: [f32; 2],
    pub texcoord: [f32; 2],
}

impl Vertex for ScreenVertex {
    const LAYOUT: VertexLayout = VertexLayout {
        attributes: &[
            Attribute { name: "position", components: 2 },
            Attribute { name: "texcoord", components: 2 },
        ],
    };
}

#[cfg(test)]
mod tests {
    use std::mem::offset_of;

    use super::*;

    fn offsets(layout: &VertexLayout) -> Vec<usize> {
        (0..layout.attributes.len()).map(|i| layout.offset_floats(i)).collect()
    }

    #[test]
    fn test_quad_layout() {
        let layout = QuadVertex::LAYOUT;
        assert_eq!(layout.stride_floats(), 7);
        assert_eq!(offsets(&layout), vec![0, 2, 5]);
        assert_eq!(layout.stride_bytes(), size_of::<QuadVertex>());
        assert_eq!(layout.offset_bytes(1), offset_of!(QuadVertex, color));
        assert_eq!(layout.offset_bytes(2), offset_of!(QuadVertex, texcoord));
    }

    #[test]
    fn test_scene_layout() {
        let layout = SceneVertex::LAYOUT;
        assert_eq!(layout.stride_floats(), 8);
        assert_eq!(offsets(&layout), vec![0, 3, 6]);
        assert_eq!(layout.stride_bytes(), size_of::<SceneVertex>());
        assert_eq!(layout.offset_bytes(1), offset_of!(SceneVertex, color));
        assert_eq!(layout.offset_bytes(2), offset_of!(SceneVertex, texcoord));
    }

    #[test]
    fn test_screen_layout() {
        let layout = ScreenVertex::LAYOUT;
        assert_eq!(layout.stride_floats(), 4);
        assert_eq!(offsets(&layout), vec![0, 2]);
        assert_eq!(layout.stride_bytes(), size_of::<ScreenVertex>());
        assert_eq!(layout.offset_bytes(1), offset_of!(ScreenVertex, texcoord));
    }

    #[test]
    fn test_iter_pairs_names_with_byte_offsets() {
        let pairs: Vec<_> = SceneVertex::LAYOUT
            .iter()
            .map(|(a, offset)| (a.name, offset))
            .collect();
        assert_eq!(pairs, vec![("position", 0), ("color", 12), ("texcoord", 24)]);
    }
}
