//! Mesh descriptor records and the case-file collaborator.
//!
//! Assembly produces a [`BlockMeshData`]: the canonical vertex list, one
//! [`BlockRecord`] per block and one [`PatchRecord`] per patch. These are
//! rendered into the three template slots of a `blockMeshDict` and handed to
//! a [`CaseFileStore`], which owns the on-disk layout of the case.

pub mod block_mesh_dict;

pub use block_mesh_dict::{BLOCK_MESH_DICT_HEADER, CaseDirectory, write_block_mesh_dict};

use crate::mesh_error::MeshBlocksError;
use crate::topology::block::Face;
use crate::topology::point::VertexId;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One `hex` entry of the mesh descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Vertex indices in block corner order.
    pub corners: [VertexId; 8],
    pub nodes: [u32; 3],
    pub gradings: [f64; 3],
}

/// `hex (i0 … i7) (nx ny nz) simpleGrading (gx gy gz)`
impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hex ({}) ({} {} {}) simpleGrading ({:.6} {:.6} {:.6})",
            self.corners.iter().join(" "),
            self.nodes[0],
            self.nodes[1],
            self.nodes[2],
            self.gradings[0],
            self.gradings[1],
            self.gradings[2],
        )
    }
}

/// One boundary patch of the mesh descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    /// Boundary-condition type.
    pub kind: String,
    pub name: String,
    pub faces: Vec<Face>,
}

impl PatchRecord {
    /// `<type> <name>` followed by the parenthesized face list, one face per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.faces.len() + 3);
        lines.push(format!("{} {}", self.kind, self.name));
        lines.push("(".to_string());
        lines.extend(self.faces.iter().map(|f| format!("    {f}")));
        lines.push(")".to_string());
        lines
    }
}

/// `(x y z)`
pub fn vertex_line(position: [f64; 3]) -> String {
    format!("({} {} {})", position[0], position[1], position[2])
}

/// The three collections handed to the descriptor writer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockMeshData {
    /// Canonical vertex positions; the position in this list is the vertex
    /// index used by blocks and patches.
    pub vertices: Vec<[f64; 3]>,
    pub blocks: Vec<BlockRecord>,
    pub patches: Vec<PatchRecord>,
}

impl BlockMeshData {
    /// Renders every record with its line grammar.
    pub fn template_slots(&self) -> TemplateSlots {
        TemplateSlots {
            vertices: self.vertices.iter().copied().map(vertex_line).collect(),
            blocks: self.blocks.iter().map(ToString::to_string).collect(),
            patches: self.patches.iter().flat_map(PatchRecord::lines).collect(),
        }
    }
}

/// Pre-rendered lines for the `vertices`, `blocks` and `patches` entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateSlots {
    pub vertices: Vec<String>,
    pub blocks: Vec<String>,
    pub patches: Vec<String>,
}

/// Case-management collaborator that knows where the mesh descriptor lives
/// and how to write a templated file.
pub trait CaseFileStore {
    /// Target path of the mesh descriptor.
    fn mesh_dict_path(&self) -> PathBuf;

    /// Writes `header` followed by the three slots to `target`.
    fn write_template(
        &self,
        target: &Path,
        header: &str,
        slots: &TemplateSlots,
    ) -> Result<(), MeshBlocksError>;
}
