//! MeshBlocksError: Unified error type for mesh-blocks public APIs
//!
//! Every failure is local to one mesh-construction session and surfaces
//! synchronously; none of them is retryable.

use crate::topology::block::Axis;
use crate::topology::point::BlockId;
use thiserror::Error;

/// Unified error type for block-mesh construction and export.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshBlocksError {
    /// A block was constructed from neither 8 corners nor a 2-point bounding box.
    #[error("incorrect number of points to construct a block: expected 8 or 2, found {found}")]
    InvalidShape { found: usize },
    /// `adjust_grading` was called with a block that does not share a face with
    /// `block` along `axis`.
    #[error("provided block {reference} is not a direct neighbour of block {block} along {axis}")]
    NotADirectNeighbour {
        block: BlockId,
        reference: BlockId,
        axis: Axis,
    },
    /// Two blocks of one neighbour chain carry different, fixed node counts.
    #[error(
        "nodes on edge mismatch: block {block} has {own} cells along {axis}, neighbour {neighbour} has {other}"
    )]
    NodesOnEdgeMismatch {
        block: BlockId,
        neighbour: BlockId,
        axis: Axis,
        own: u32,
        other: u32,
    },
    /// Two blocks of one neighbour chain carry different, fixed gradings.
    #[error(
        "grading mismatch: block {block} has grading {own} along {axis}, neighbour {neighbour} has {other}"
    )]
    GradingMismatch {
        block: BlockId,
        neighbour: BlockId,
        axis: Axis,
        own: f64,
        other: f64,
    },
    /// A block reached a stage that needs its node count along `axis`, but none
    /// was given or propagated.
    #[error("block {block} has no node count along {axis}")]
    UnresolvedNodes { block: BlockId, axis: Axis },
    /// A block reached export without a grading along `axis`.
    #[error("block {block} has no grading along {axis}")]
    UnresolvedGrading { block: BlockId, axis: Axis },
    /// The id does not name a block of this session.
    #[error("unknown block id {0}")]
    UnknownBlock(BlockId),
    /// The corners of a block collapse onto fewer than 8 distinct vertices.
    #[error("block {block} is degenerate: {distinct_corners} distinct corners")]
    DegenerateBlock {
        block: BlockId,
        distinct_corners: usize,
    },
    /// Internal registry or neighbour-table consistency check failed.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Writing the mesh descriptor failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshBlocksError {
    fn from(err: std::io::Error) -> Self {
        MeshBlocksError::Io(err.to_string())
    }
}

impl MeshBlocksError {
    /// `true` for the conformity failures raised by neighbour propagation.
    pub fn is_conformity(&self) -> bool {
        matches!(
            self,
            MeshBlocksError::NodesOnEdgeMismatch { .. } | MeshBlocksError::GradingMismatch { .. }
        )
    }

    /// `true` for unresolved node counts or gradings.
    pub fn is_export(&self) -> bool {
        matches!(
            self,
            MeshBlocksError::UnresolvedNodes { .. } | MeshBlocksError::UnresolvedGrading { .. }
        )
    }
}
