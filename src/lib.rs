//! # mesh-blocks
//!
//! mesh-blocks builds structured hexahedral block-mesh descriptions: vertices,
//! hexahedral blocks, inter-block adjacency, boundary patches and per-axis
//! cell counts and gradings. Adjoining blocks are kept *conformal*: the same
//! number of cells and the same stretching along every shared edge.
//!
//! ## Features
//! - Exact-coordinate vertex deduplication and directed edge registry
//! - Face-matching neighbour discovery with reciprocal neighbour tables
//! - Transitive propagation and validation of node counts and gradings
//! - Grading solve matching a block's first cell to its neighbour's cell size
//! - `blockMeshDict` output through a pluggable case-file store
//!
//! ## Usage
//!
//! ```no_run
//! use mesh_blocks::prelude::*;
//!
//! # fn main() -> Result<(), MeshBlocksError> {
//! let mut mesh = MeshBuilder::new();
//! let cube = mesh.add_box(
//!     [-0.5, -0.5, -0.5],
//!     [0.5, 0.5, 0.5],
//!     BlockSettings::uniform([10, 10, 10], [1.0, 1.0, 1.0]),
//! )?;
//! let faces = FaceDir::ALL.map(|d| mesh.blocks()[cube.get()].face(d));
//! mesh.add_patch(Patch::new("OUTSIDE", faces));
//! mesh.write(&CaseDirectory::new("unitCube"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Sessions are single-threaded; every registry lives in one [`MeshBuilder`].

pub mod algs;
pub mod io;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;
pub mod validation;

pub use mesh_error::MeshBlocksError;
pub use mesh_generation::MeshBuilder;
pub use validation::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::grading::GradingSearch;
    pub use crate::io::{BlockMeshData, CaseDirectory, CaseFileStore, TemplateSlots};
    pub use crate::mesh_error::MeshBlocksError;
    pub use crate::mesh_generation::{MeshBuilder, MeshBuilderOptions, bounding_box};
    pub use crate::topology::block::{Axis, Block, BlockSettings, Face, FaceDir};
    pub use crate::topology::patch::Patch;
    pub use crate::topology::point::{BlockId, EdgeId, VertexId};
    pub use crate::validation::DebugInvariants;
}
