//! Block-mesh topology entities.
//!
//! - [`point`]: arena handles for vertices, edges and blocks
//! - [`vertex`] / [`edge`]: deduplicating registries
//! - [`block`]: hexahedral blocks with their face and edge templates
//! - [`patch`]: named boundary face groups

pub mod block;
pub mod edge;
pub mod patch;
pub mod point;
pub mod vertex;

pub use block::{Axis, Block, BlockSettings, Face, FaceDir};
pub use edge::{Edge, EdgeKind, EdgeRegistry};
pub use patch::Patch;
pub use point::{BlockId, EdgeId, VertexId};
pub use vertex::{Vertex, VertexRegistry};
