//! Consistency checks for a block-mesh session.
//!
//! These checks cover structure the builder maintains by construction:
//! registry indirection tables, reciprocal neighbour links and corner ids.
//! They are cheap enough to run before every export in debug builds through
//! [`debug_invariants!`](crate::debug_invariants).

use crate::algs::conformity::find_non_reciprocal;
use crate::mesh_error::MeshBlocksError;
use crate::topology::block::Block;
use crate::topology::edge::EdgeRegistry;
use crate::topology::vertex::VertexRegistry;
use itertools::Itertools;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshBlocksError>;
}

/// Runs a fallible check and panics on error when invariant checking is
/// enabled; expands to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Behavior for blocks whose corners collapse onto fewer than 8 vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateHandling {
    /// Skip the check.
    Ignore,
    /// Log a warning per degenerate block.
    Warn,
    /// Return an error for the first degenerate block.
    Error,
}

/// Toggles for [`validate_mesh`].
#[derive(Debug, Clone, Copy)]
pub struct MeshValidationOptions {
    /// Canonical tables of both registries point at matching instances.
    pub check_registries: bool,
    /// `A.neighbours[d] == B` implies `B.neighbours[d ^ 1] == A`.
    pub check_reciprocity: bool,
    /// Block ids equal their arena position and corners reference existing vertices.
    pub check_block_refs: bool,
    pub degenerate: DegenerateHandling,
}

impl Default for MeshValidationOptions {
    fn default() -> Self {
        Self {
            check_registries: true,
            check_reciprocity: true,
            check_block_refs: true,
            degenerate: DegenerateHandling::Warn,
        }
    }
}

impl MeshValidationOptions {
    /// Enable all checks, with degenerate blocks as errors.
    pub fn all() -> Self {
        Self {
            degenerate: DegenerateHandling::Error,
            ..Self::default()
        }
    }
}

fn violation(message: impl Into<String>) -> MeshBlocksError {
    MeshBlocksError::InvariantViolation(message.into())
}

/// Validates registries and blocks of one session.
pub fn validate_mesh(
    vertices: &VertexRegistry,
    edges: &EdgeRegistry,
    blocks: &[Block],
    options: MeshValidationOptions,
) -> Result<(), MeshBlocksError> {
    if options.check_registries {
        if !vertices.indirection_is_consistent() {
            return Err(violation("vertex registry canonical table is inconsistent"));
        }
        if !edges.indirection_is_consistent() {
            return Err(violation("edge registry canonical table is inconsistent"));
        }
    }

    if options.check_block_refs {
        let n_vertices = vertices.canonical_len();
        let n_edges = edges.canonical_len();
        for (i, block) in blocks.iter().enumerate() {
            if block.id().get() != i {
                return Err(violation(format!(
                    "block at position {i} carries id {}",
                    block.id()
                )));
            }
            if let Some(v) = block.corners().iter().find(|v| v.get() >= n_vertices) {
                return Err(violation(format!("block {i} references missing vertex {v}")));
            }
            if let Some(e) = block.edges().iter().find(|e| e.get() >= n_edges) {
                return Err(violation(format!("block {i} references missing edge {e}")));
            }
        }
    }

    if options.check_reciprocity {
        if let Some((block, dir)) = find_non_reciprocal(blocks) {
            return Err(violation(format!(
                "block {block} neighbour across {dir:?} does not link back"
            )));
        }
    }

    validate_degenerate(blocks, options.degenerate)
}

fn validate_degenerate(blocks: &[Block], handling: DegenerateHandling) -> Result<(), MeshBlocksError> {
    if handling == DegenerateHandling::Ignore {
        return Ok(());
    }
    for block in blocks {
        let distinct = block.corners().iter().unique().count();
        if distinct == 8 {
            continue;
        }
        match handling {
            DegenerateHandling::Warn => {
                log::warn!(
                    "Degenerate block detected: block={} distinct_corners={distinct}",
                    block.id()
                );
            }
            DegenerateHandling::Error => {
                return Err(MeshBlocksError::DegenerateBlock {
                    block: block.id(),
                    distinct_corners: distinct,
                });
            }
            DegenerateHandling::Ignore => {}
        }
    }
    Ok(())
}
