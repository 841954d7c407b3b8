//! Hexahedral block topology.
//!
//! A block is defined by 8 corner vertices in the conventional hexahedron
//! order: corners `0..4` form the bottom face counter-clockwise starting at the
//! minimum corner, corners `4..8` the mirrored top face.
//!
//! ```text
//!        7 ---------- 6
//!       /|           /|
//!      4 ---------- 5 |
//!      | |          | |        z  y
//!      | 3 ---------|-2        | /
//!      |/           |/         |/
//!      0 ---------- 1          +--- x
//! ```
//!
//! Faces and edges are derived from fixed corner templates. The face winding
//! is part of the output format and must not change.

use crate::topology::point::{BlockId, EdgeId, VertexId};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local block axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Axis> {
        Axis::ALL.get(i).copied()
    }

    /// The two axes perpendicular to `self`, in ascending order.
    pub fn orthogonal(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    /// The `(min, max)` face directions normal to this axis.
    pub fn faces(self) -> [FaceDir; 2] {
        let k = 2 * self.index();
        [FaceDir::ALL[k], FaceDir::ALL[k + 1]]
    }

    /// Indices into [`EDGE_TEMPLATE`] of the 4 edges running along this axis.
    pub fn edge_indices(self) -> [usize; 4] {
        let k = 4 * self.index();
        [k, k + 1, k + 2, k + 3]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{name}")
    }
}

/// Face slot of a block. The discriminant is the neighbour-table index;
/// even slots are the min side of their axis, odd slots the max side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceDir {
    XMin = 0,
    XMax = 1,
    YMin = 2,
    YMax = 3,
    ZMin = 4,
    ZMax = 5,
}

impl FaceDir {
    pub const ALL: [FaceDir; 6] = [
        FaceDir::XMin,
        FaceDir::XMax,
        FaceDir::YMin,
        FaceDir::YMax,
        FaceDir::ZMin,
        FaceDir::ZMax,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<FaceDir> {
        FaceDir::ALL.get(i).copied()
    }

    /// The facing slot on the neighbour across this face (`d ^ 1`).
    #[inline]
    pub fn opposite(self) -> FaceDir {
        FaceDir::ALL[self.index() ^ 1]
    }

    pub fn axis(self) -> Axis {
        Axis::ALL[self.index() / 2]
    }

    pub fn is_min(self) -> bool {
        self.index() % 2 == 0
    }

    /// Corner indices of this face, in output winding.
    pub fn corner_indices(self) -> [usize; 4] {
        FACE_TEMPLATE[self.index()]
    }
}

/// Face slot → corner indices. xmin, xmax, ymin, ymax, zmin, zmax.
pub const FACE_TEMPLATE: [[usize; 4]; 6] = [
    [4, 7, 3, 0],
    [6, 5, 1, 2],
    [5, 4, 0, 1],
    [7, 6, 2, 3],
    [3, 2, 1, 0],
    [4, 5, 6, 7],
];

/// Edge index → `(start, end)` corner indices; 4 edges per axis, x first.
pub const EDGE_TEMPLATE: [[usize; 2]; 12] = [
    [0, 1],
    [3, 2],
    [7, 6],
    [4, 5],
    [0, 3],
    [1, 2],
    [5, 6],
    [4, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// A quadrilateral block face as a wound vertex-id quadruple.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    vertices: [VertexId; 4],
}

impl Face {
    pub fn new(vertices: [VertexId; 4]) -> Self {
        Self { vertices }
    }

    /// Vertex ids in winding order.
    pub fn vertices(&self) -> [VertexId; 4] {
        self.vertices
    }

    /// `true` when both faces reference the same 4 vertices, in any winding.
    pub fn same_vertices(&self, other: &Face) -> bool {
        self.vertices.iter().sorted().eq(other.vertices.iter().sorted())
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.vertices.iter().join(" "))
    }
}

/// Per-axis cell counts and grading ratios a block is created with.
/// `None` entries are filled in by neighbour propagation.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockSettings {
    pub nodes: [Option<u32>; 3],
    pub gradings: [Option<f64>; 3],
    /// Let propagation overwrite this block's node counts on a mismatch.
    /// When `false`, any mismatch involving this block is an error.
    pub allow_node_adjustment: bool,
    /// Same as `allow_node_adjustment`, for gradings.
    pub allow_grading_adjustment: bool,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            nodes: [None; 3],
            gradings: [None; 3],
            allow_node_adjustment: true,
            allow_grading_adjustment: true,
        }
    }
}

impl BlockSettings {
    /// Fully specified cell counts and gradings on all three axes.
    pub fn uniform(nodes: [u32; 3], gradings: [f64; 3]) -> Self {
        Self {
            nodes: nodes.map(Some),
            gradings: gradings.map(Some),
            ..Self::default()
        }
    }

    /// Sets the cell count along one axis.
    pub fn with_nodes(mut self, axis: Axis, n: u32) -> Self {
        self.nodes[axis.index()] = Some(n);
        self
    }

    /// Sets the grading along one axis.
    pub fn with_grading(mut self, axis: Axis, grading: f64) -> Self {
        self.gradings[axis.index()] = Some(grading);
        self
    }

    /// Turns mismatching node counts and gradings into hard errors.
    pub fn fixed(mut self) -> Self {
        self.allow_node_adjustment = false;
        self.allow_grading_adjustment = false;
        self
    }
}

/// One hexahedral block of the mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    id: BlockId,
    corners: [VertexId; 8],
    faces: [Face; 6],
    edges: [EdgeId; 12],
    pub(crate) nodes: [Option<u32>; 3],
    pub(crate) gradings: [Option<f64>; 3],
    pub(crate) pinned_gradings: [bool; 3],
    pub(crate) neighbours: [Option<BlockId>; 6],
    allow_node_adjustment: bool,
    allow_grading_adjustment: bool,
}

impl Block {
    pub(crate) fn new(
        id: BlockId,
        corners: [VertexId; 8],
        edges: [EdgeId; 12],
        settings: &BlockSettings,
    ) -> Self {
        let faces = FACE_TEMPLATE.map(|slot| Face::new(slot.map(|c| corners[c])));
        Self {
            id,
            corners,
            faces,
            edges,
            nodes: settings.nodes,
            gradings: settings.gradings,
            pinned_gradings: [false; 3],
            neighbours: [None; 6],
            allow_node_adjustment: settings.allow_node_adjustment,
            allow_grading_adjustment: settings.allow_grading_adjustment,
        }
    }

    /// Directed corner pairs of the 12 block edges.
    pub(crate) fn edge_endpoints(corners: &[VertexId; 8]) -> [(VertexId, VertexId); 12] {
        EDGE_TEMPLATE.map(|[s, e]| (corners[s], corners[e]))
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Corner vertex ids in the fixed corner order.
    pub fn corners(&self) -> &[VertexId; 8] {
        &self.corners
    }

    pub fn faces(&self) -> &[Face; 6] {
        &self.faces
    }

    pub fn face(&self, dir: FaceDir) -> Face {
        self.faces[dir.index()]
    }

    pub fn edges(&self) -> &[EdgeId; 12] {
        &self.edges
    }

    /// The 4 edges running along `axis`.
    pub fn axis_edges(&self, axis: Axis) -> [EdgeId; 4] {
        axis.edge_indices().map(|i| self.edges[i])
    }

    pub fn nodes(&self) -> [Option<u32>; 3] {
        self.nodes
    }

    pub fn node_count(&self, axis: Axis) -> Option<u32> {
        self.nodes[axis.index()]
    }

    pub fn gradings(&self) -> [Option<f64>; 3] {
        self.gradings
    }

    pub fn grading(&self, axis: Axis) -> Option<f64> {
        self.gradings[axis.index()]
    }

    /// `true` when the grading along `axis` was produced by the grading solver.
    pub fn is_grading_pinned(&self, axis: Axis) -> bool {
        self.pinned_gradings[axis.index()]
    }

    pub fn neighbours(&self) -> &[Option<BlockId>; 6] {
        &self.neighbours
    }

    pub fn neighbour(&self, dir: FaceDir) -> Option<BlockId> {
        self.neighbours[dir.index()]
    }

    /// Face direction under which `other` is registered as a neighbour.
    pub fn direction_of(&self, other: BlockId) -> Option<FaceDir> {
        FaceDir::ALL
            .into_iter()
            .find(|d| self.neighbours[d.index()] == Some(other))
    }

    pub fn allows_node_adjustment(&self) -> bool {
        self.allow_node_adjustment
    }

    pub fn allows_grading_adjustment(&self) -> bool {
        self.allow_grading_adjustment
    }

    /// All `(own, other)` face-slot pairs whose faces share their 4 vertices.
    pub(crate) fn matching_faces<'a>(
        &'a self,
        other: &'a Block,
    ) -> impl Iterator<Item = (FaceDir, FaceDir)> + 'a {
        FaceDir::ALL
            .into_iter()
            .cartesian_product(FaceDir::ALL)
            .filter(move |&(own, theirs)| self.face(own).same_vertices(&other.face(theirs)))
    }
}
