//! Brush geometry and face addressing

use nalgebra::Matrix3;

use super::node::NodeId;
use crate::foundation::math::{Aabb, Vec3};

/// Slack when testing whether a plane intersection lies inside every face
const VERTEX_EPSILON: f32 = 0.001;

/// One bounding plane of a brush
#[derive(Debug, Clone, PartialEq)]
pub struct BrushFace {
    /// Texture name
    pub texture: String,
    /// Outward plane normal
    pub normal: Vec3,
    /// Plane distance from the origin along `normal`
    pub distance: f32,
    selected: bool,
}

impl BrushFace {
    /// Create an unselected face
    pub fn new(normal: Vec3, distance: f32, texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            normal,
            distance,
            selected: false,
        }
    }

    /// Whether this face is selected
    pub const fn selected(&self) -> bool {
        self.selected
    }
}

/// Convex solid bounded by faces
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    faces: Vec<BrushFace>,
    bounds: Aabb,
}

impl Brush {
    /// Create a brush from its faces and precomputed bounds
    pub fn new(faces: Vec<BrushFace>, bounds: Aabb) -> Self {
        Self { faces, bounds }
    }

    /// Axis-aligned box brush with all six faces using `texture`
    pub fn cuboid(min: Vec3, max: Vec3, texture: &str) -> Self {
        let faces = vec![
            BrushFace::new(Vec3::new(-1.0, 0.0, 0.0), -min.x, texture),
            BrushFace::new(Vec3::new(1.0, 0.0, 0.0), max.x, texture),
            BrushFace::new(Vec3::new(0.0, -1.0, 0.0), -min.y, texture),
            BrushFace::new(Vec3::new(0.0, 1.0, 0.0), max.y, texture),
            BrushFace::new(Vec3::new(0.0, 0.0, -1.0), -min.z, texture),
            BrushFace::new(Vec3::new(0.0, 0.0, 1.0), max.z, texture),
        ];
        Self::new(faces, Aabb::new(min, max))
    }

    /// Brush enclosed by `faces`, with bounds taken from its vertices
    ///
    /// Returns `None` when the planes do not enclose a volume.
    pub fn from_faces(faces: Vec<BrushFace>) -> Option<Self> {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        let mut vertex_count = 0;
        for (i, a) in faces.iter().enumerate() {
            for (j, b) in faces.iter().enumerate().skip(i + 1) {
                for c in faces.iter().skip(j + 1) {
                    let Some(vertex) = intersect_planes(a, b, c) else {
                        continue;
                    };
                    if faces
                        .iter()
                        .all(|face| face.normal.dot(&vertex) <= face.distance + VERTEX_EPSILON)
                    {
                        min = min.inf(&vertex);
                        max = max.sup(&vertex);
                        vertex_count += 1;
                    }
                }
            }
        }
        // a tetrahedron has four vertices
        if vertex_count < 4 || (max - min).min() <= 0.0 {
            return None;
        }
        Some(Self::new(faces, Aabb::new(min, max)))
    }

    /// All faces
    pub fn faces(&self) -> &[BrushFace] {
        &self.faces
    }

    /// Face by index
    pub fn face(&self, index: usize) -> Option<&BrushFace> {
        self.faces.get(index)
    }

    /// Replace the texture of one face; returns `false` if out of range
    pub fn set_face_texture(&mut self, index: usize, texture: impl Into<String>) -> bool {
        match self.faces.get_mut(index) {
            Some(face) => {
                face.texture = texture.into();
                true
            }
            None => false,
        }
    }

    /// Replace every occurrence of texture `from`, returning how many faces changed
    pub fn replace_texture(&mut self, from: &str, to: &str) -> usize {
        let mut replaced = 0;
        for face in self.faces.iter_mut().filter(|face| face.texture == from) {
            face.texture = to.to_string();
            replaced += 1;
        }
        replaced
    }

    /// Bounding box
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Number of selected faces
    pub fn selected_face_count(&self) -> usize {
        self.faces.iter().filter(|face| face.selected).count()
    }

    /// Whether any face is selected
    pub fn has_selected_faces(&self) -> bool {
        self.faces.iter().any(BrushFace::selected)
    }

    /// Indices of faces for which `filter` holds
    pub fn face_indices(&self, filter: impl Fn(&BrushFace) -> bool) -> Vec<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, face)| filter(face))
            .map(|(index, _)| index)
            .collect()
    }

    /// Flip one face's selection flag; returns `false` if it already had that state
    pub(super) fn set_face_selected(&mut self, index: usize, selected: bool) -> bool {
        let face = &mut self.faces[index];
        if face.selected == selected {
            return false;
        }
        face.selected = selected;
        true
    }

    pub(super) fn clear_face_selection(&mut self) {
        for face in &mut self.faces {
            face.selected = false;
        }
    }

    /// Take over the face selection of `other` when both have the same faces
    pub(super) fn copy_face_selection_from(&mut self, other: &Self) -> bool {
        if self.faces.len() != other.faces.len() {
            return false;
        }
        for (face, source) in self.faces.iter_mut().zip(&other.faces) {
            face.selected = source.selected;
        }
        true
    }
}

fn intersect_planes(a: &BrushFace, b: &BrushFace, c: &BrushFace) -> Option<Vec3> {
    let normals = Matrix3::from_rows(&[a.normal.transpose(), b.normal.transpose(), c.normal.transpose()]);
    let inverse = normals.try_inverse()?;
    Some(inverse * Vec3::new(a.distance, b.distance, c.distance))
}

/// Address of one face of a brush node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceRef {
    /// Owning brush node
    pub brush: NodeId,
    /// Face index within the brush
    pub index: usize,
}

impl FaceRef {
    /// Create a face reference
    pub const fn new(brush: NodeId, index: usize) -> Self {
        Self { brush, index }
    }
}
