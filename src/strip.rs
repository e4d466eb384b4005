use std::collections::HashMap;

use itertools::Itertools;
use three_d::{vec3, InnerSpace, MetricSpace, Vec3, Zero};

use crate::{
    error::FlexResult,
    params::FlexagonParams,
    utils::{equilateral_height, signed_area_xy},
};

/// The unfolded, double-sided paper strip of a hexaflexagon.
///
/// The strip lies flat in the XY plane.  It is built column by column from left to right, where
/// columns alternate between the 'upper' row and the 'lower' row:
/// ```text
/// upper ->  0-------3-------6---
///            \ F   / \ F   / \
///             \   / B \   /
/// lower ->     2-------5-------8
///             /   \ F /   \
///            / B   \ /  B  \ /
/// back  ->  1-------4-------7---
/// ```
/// Every upper column also emits a mirrored 'backside' vertex below the lower row, so the
/// strip is really two mirrored zig-zags which share the lower row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Strip {
    verts: VertVec<Vertex>,
    /// Each triangle of the strip, in the order they were emitted.  Faces alternate between
    /// [`Layer::Front`] and [`Layer::Back`].
    faces: FaceVec<Face>,

    scale: f32,
    height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pos: Vec3,
}

impl Vertex {
    pub fn pos(&self) -> Vec3 {
        self.pos
    }
}

/// A single triangle of the strip.  Vertices are listed anti-clockwise when viewed from `+z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    verts: [VertIdx; 3],
}

impl Face {
    pub fn verts(&self) -> [VertIdx; 3] {
        self.verts
    }

    pub fn vert_positions(&self, strip: &Strip) -> [Vec3; 3] {
        self.verts.map(|idx| strip.vert_pos(idx))
    }

    /// Vertex positions measured in edge lengths, which keeps products of coordinates in
    /// range however large or small the strip is.
    pub fn unit_positions(&self, strip: &Strip) -> [Vec3; 3] {
        self.verts.map(|idx| strip.unit_pos(idx))
    }

    pub fn centroid(&self, strip: &Strip) -> Vec3 {
        let mut total = Vec3::zero();
        for pos in self.vert_positions(strip) {
            total += pos;
        }
        total / 3.0
    }

    pub fn normal(&self, strip: &Strip) -> Vec3 {
        let [v0, v1, v2] = self.unit_positions(strip);
        (v1 - v0).cross(v2 - v0).normalize()
    }

    pub fn area(&self, strip: &Strip) -> f32 {
        self.unit_area(strip) * strip.scale * strip.scale
    }

    /// Area of this face in units of the edge length squared
    pub fn unit_area(&self, strip: &Strip) -> f32 {
        let [v0, v1, v2] = self.unit_positions(strip);
        signed_area_xy(v0, v1, v2).abs() / 2.0
    }
}

/// Which of the two interleaved triangle sequences a face was emitted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Front,
    Back,
}

impl Layer {
    /// Faces are emitted in `front, back, front, back, ...` order
    pub fn of(face: FaceIdx) -> Self {
        match face.index() % 2 {
            0 => Layer::Front,
            _ => Layer::Back,
        }
    }
}

/// Number of vertex columns in a strip for a flexagon with `sides` sides
pub fn column_count(sides: usize) -> usize {
    sides * 3 + 2
}

/// Number of vertices in a strip for a flexagon with `sides` sides.  Upper columns contribute
/// two vertices (front and backside), lower columns contribute one.
pub fn vertex_count(sides: usize) -> usize {
    let columns = column_count(sides);
    columns + columns.div_ceil(2)
}

/// Number of triangles in a strip for a flexagon with `sides` sides
pub fn triangle_count(sides: usize) -> usize {
    sides * 6
}

////////////////
// GENERATION //
////////////////

/// Validate `scale` and `sides`, then build the strip of equilateral triangles for a flexagon
/// with `sides` sides.  The strip is checked before it is returned.
pub fn build_strip(scale: f32, sides: usize) -> FlexResult<Strip> {
    FlexagonParams::new(scale, sides)?;
    let strip = Strip::build(scale, sides);
    strip.check()?;
    Ok(strip)
}

impl Strip {
    /// Build the strip for a flexagon with `sides` sides, made from equilateral triangles with
    /// edge length `scale`.
    ///
    /// The caller is responsible for validating the parameters (see
    /// [`FlexagonParams::validate`](crate::FlexagonParams::validate)).
    pub fn build(scale: f32, sides: usize) -> Self {
        debug_assert!(scale > 0.0, "scale must be positive");
        debug_assert!(sides >= 3, "folding requires at least 3 sides");

        let height = equilateral_height(scale);
        let mut strip = Self {
            verts: VertVec::with_capacity(vertex_count(sides)),
            faces: FaceVec::with_capacity(triangle_count(sides)),
            scale,
            height,
        };

        // Start with the upper left vertex, then zig-zag between the rows
        for column in 0..column_count(sides) {
            let x = column as f32 * (scale / 2.0);
            let is_upper = column % 2 == 0;
            if is_upper {
                strip.verts.push(Vertex {
                    pos: vec3(x, height, 0.0),
                });
                strip.verts.push(Vertex {
                    pos: vec3(x, -height, 0.0),
                });
            } else {
                strip.verts.push(Vertex {
                    pos: vec3(x, 0.0, 0.0),
                });
            }

            // Need at least 3 columns before the first pair of faces can be made
            if column >= 2 {
                let n = strip.verts.len();
                let front = match is_upper {
                    true => [n - 5, n - 3, n - 2],
                    false => [n - 4, n - 2, n - 1],
                };
                strip.push_face(front);
                strip.push_face([n - 4, n - 3, n - 1]);
            }
        }
        strip
    }

    /// Create a `Strip` directly from vertex positions and triangles.  Unlike [`Strip::build`],
    /// the triangles are kept exactly as given (including their winding), which makes this
    /// useful for checking meshes from elsewhere.
    pub fn new(scale: f32, verts: Vec<Vec3>, faces: impl IntoIterator<Item = [usize; 3]>) -> Self {
        Self {
            verts: verts.into_iter().map(|pos| Vertex { pos }).collect(),
            faces: faces
                .into_iter()
                .map(|verts| Face {
                    verts: verts.map(VertIdx::new),
                })
                .collect(),
            scale,
            height: equilateral_height(scale),
        }
    }

    /// Add a face made from the given vertices.  The first vertex stays first, and the other
    /// two are swapped if needed to make the face anti-clockwise.
    fn push_face(&mut self, verts: [usize; 3]) -> FaceIdx {
        let [a, b, c] = verts.map(VertIdx::new);
        let area = signed_area_xy(self.unit_pos(a), self.unit_pos(b), self.unit_pos(c));
        let verts = if area < 0.0 { [a, c, b] } else { [a, b, c] };
        self.faces.push(Face { verts })
    }
}

/////////////
// GETTERS //
/////////////

impl Strip {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Distance between the left-most and right-most vertices
    pub fn width(&self) -> f32 {
        self.verts
            .iter()
            .map(|v| v.pos.x)
            .minmax()
            .into_option()
            .map_or(0.0, |(min, max)| max - min)
    }

    pub fn vert_pos(&self, idx: VertIdx) -> Vec3 {
        self.verts[idx].pos
    }

    /// Position of a vertex, measured in edge lengths
    pub fn unit_pos(&self, idx: VertIdx) -> Vec3 {
        self.verts[idx].pos / self.scale
    }

    pub fn verts(&self) -> &[Vertex] {
        self.verts.as_raw_slice()
    }

    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn get_face(&self, face: FaceIdx) -> &Face {
        &self.faces[face]
    }

    pub fn faces(&self) -> impl DoubleEndedIterator<Item = &Face> + ExactSizeIterator + '_ {
        self.faces.iter()
    }

    pub fn faces_enumerated(&self) -> impl DoubleEndedIterator<Item = (FaceIdx, &Face)> + '_ {
        self.faces.iter_enumerated()
    }

    pub fn faces_in_layer(&self, layer: Layer) -> impl Iterator<Item = (FaceIdx, &Face)> + '_ {
        self.faces_enumerated()
            .filter(move |(idx, _face)| Layer::of(*idx) == layer)
    }

    /// Every edge of the strip, sorted by [`EdgeId`].  Assumes that every vertex index is valid.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = HashMap::<EdgeId, Edge>::new();
        for (face_idx, face) in self.faces_enumerated() {
            for (&v1, &v2) in face.verts.iter().circular_tuple_windows() {
                let key = EdgeId::new(v1, v2);
                if let Some(edge) = edges.get_mut(&key) {
                    if edge.left_face.is_none() {
                        edge.left_face = Some(face_idx);
                    }
                } else {
                    edges.insert(
                        key,
                        Edge {
                            bottom_vert: v1,
                            top_vert: v2,
                            right_face: face_idx,
                            left_face: None,
                        },
                    );
                }
            }
        }
        edges
            .into_values()
            .sorted_by_key(|e| e.id())
            .collect_vec()
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub bottom_vert: VertIdx,
    pub top_vert: VertIdx,
    pub right_face: FaceIdx,
    pub left_face: Option<FaceIdx>,
}

impl Edge {
    pub fn length(&self, strip: &Strip) -> f32 {
        let v1 = strip.unit_pos(self.bottom_vert);
        let v2 = strip.unit_pos(self.top_vert);
        v1.distance(v2) * strip.scale()
    }

    /// Boundary edges only have one adjacent face
    pub fn is_boundary(&self) -> bool {
        self.left_face.is_none()
    }

    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.bottom_vert, self.top_vert)
    }
}

/// A pair of vertices which make up an edge, guaranteeing that `v1 < v2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId {
    v1: VertIdx,
    v2: VertIdx,
}

impl EdgeId {
    pub fn new(v1: VertIdx, v2: VertIdx) -> Self {
        Self {
            v1: VertIdx::min(v1, v2),
            v2: VertIdx::max(v1, v2),
        }
    }
}

index_vec::define_index_type! { pub struct VertIdx = usize; }
index_vec::define_index_type! { pub struct FaceIdx = usize; }
pub type VertVec<T> = index_vec::IndexVec<VertIdx, T>;
pub type FaceVec<T> = index_vec::IndexVec<FaceIdx, T>;
