//! Face adjacency discovery and conformity propagation between blocks.
//!
//! Two blocks are neighbours when one face of each references the same 4
//! vertices. Along any axis, blocks chained through such faces share the
//! edges of the two orthogonal axes, so their cell counts (and gradings) along
//! those axes must agree. [`check_nodes`] and [`check_gradings`] walk the
//! chain of a block and reconcile the values:
//!
//! - a value defined on one side only is copied to the other side;
//! - two different defined values are an error when either block does not
//!   allow adjustment, otherwise the chain block takes the checking block's
//!   value.
//!
//! Gradings produced by the grading solver are *pinned*: propagation never
//! overwrites them from an unpinned block. Instead the unpinned side adopts
//! the pinned value, and two conflicting pinned values are an error.

use crate::mesh_error::MeshBlocksError;
use crate::topology::block::{Axis, Block, FaceDir};
use crate::topology::point::BlockId;
use hashbrown::HashSet;
use std::collections::VecDeque;
use std::fmt::Debug;

fn block_ref(blocks: &[Block], id: BlockId) -> Result<&Block, MeshBlocksError> {
    blocks.get(id.get()).ok_or(MeshBlocksError::UnknownBlock(id))
}

/// Links the block `id` with every earlier block it shares a face with.
///
/// Only blocks constructed before `id` are searched. On a match at own face
/// `d`, `id` records the other block under `d` and the other block records
/// `id` under `d ^ 1`. Returns the number of links made.
pub fn discover_neighbours(blocks: &mut [Block], id: BlockId) -> Result<usize, MeshBlocksError> {
    block_ref(blocks, id)?;
    let (earlier, rest) = blocks.split_at_mut(id.get());
    let current = &mut rest[0];

    let mut links = 0;
    for other in earlier.iter_mut() {
        let shared: Vec<FaceDir> = current.matching_faces(other).map(|(own, _)| own).collect();
        for own in shared {
            current.neighbours[own.index()] = Some(other.id());
            other.neighbours[own.opposite().index()] = Some(current.id());
            log::debug!(
                "block {} shares its {:?} face with block {}",
                current.id(),
                own,
                other.id()
            );
            links += 1;
        }
    }
    Ok(links)
}

/// All blocks transitively reachable from `start` through its min and max
/// faces along `axis`, in breadth-first order, `start` excluded.
pub fn axis_chain(
    blocks: &[Block],
    start: BlockId,
    axis: Axis,
) -> Result<Vec<BlockId>, MeshBlocksError> {
    block_ref(blocks, start)?;
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);
    let mut chain = Vec::new();

    while let Some(id) = queue.pop_front() {
        let block = block_ref(blocks, id)?;
        for dir in axis.faces() {
            if let Some(next) = block.neighbour(dir) {
                if visited.insert(next) {
                    chain.push(next);
                    queue.push_back(next);
                }
            }
        }
    }
    Ok(chain)
}

/// A per-axis block quantity that must agree across a neighbour chain.
trait ChainQuantity {
    type Value: Copy + PartialEq + Debug;

    fn get(block: &Block, axis: Axis) -> Option<Self::Value>;
    fn set(block: &mut Block, axis: Axis, value: Self::Value);
    fn adjustable(block: &Block) -> bool;
    fn pinned(_block: &Block, _axis: Axis) -> bool {
        false
    }
    fn mismatch(
        block: BlockId,
        neighbour: BlockId,
        axis: Axis,
        own: Self::Value,
        other: Self::Value,
    ) -> MeshBlocksError;
}

struct NodeCounts;

impl ChainQuantity for NodeCounts {
    type Value = u32;

    fn get(block: &Block, axis: Axis) -> Option<u32> {
        block.nodes[axis.index()]
    }

    fn set(block: &mut Block, axis: Axis, value: u32) {
        block.nodes[axis.index()] = Some(value);
    }

    fn adjustable(block: &Block) -> bool {
        block.allows_node_adjustment()
    }

    fn mismatch(block: BlockId, neighbour: BlockId, axis: Axis, own: u32, other: u32) -> MeshBlocksError {
        MeshBlocksError::NodesOnEdgeMismatch {
            block,
            neighbour,
            axis,
            own,
            other,
        }
    }
}

struct Gradings;

impl ChainQuantity for Gradings {
    type Value = f64;

    fn get(block: &Block, axis: Axis) -> Option<f64> {
        block.gradings[axis.index()]
    }

    fn set(block: &mut Block, axis: Axis, value: f64) {
        block.gradings[axis.index()] = Some(value);
    }

    fn adjustable(block: &Block) -> bool {
        block.allows_grading_adjustment()
    }

    fn pinned(block: &Block, axis: Axis) -> bool {
        block.is_grading_pinned(axis)
    }

    fn mismatch(block: BlockId, neighbour: BlockId, axis: Axis, own: f64, other: f64) -> MeshBlocksError {
        MeshBlocksError::GradingMismatch {
            block,
            neighbour,
            axis,
            own,
            other,
        }
    }
}

/// Reconciles `Q` along `axis` between the checking block `src` and `dst`.
/// Returns `true` when either block was written.
fn reconcile<Q: ChainQuantity>(
    blocks: &mut [Block],
    src: BlockId,
    dst: BlockId,
    axis: Axis,
) -> Result<bool, MeshBlocksError> {
    let (s, d) = (src.get(), dst.get());
    let own = Q::get(block_ref(blocks, src)?, axis);
    let other = Q::get(block_ref(blocks, dst)?, axis);

    match (own, other) {
        (None, None) => Ok(false),
        (Some(v), None) => {
            log::debug!("block {dst}: {axis} value {v:?} taken from block {src}");
            Q::set(&mut blocks[d], axis, v);
            Ok(true)
        }
        (None, Some(v)) => {
            log::debug!("block {src}: {axis} value {v:?} taken from block {dst}");
            Q::set(&mut blocks[s], axis, v);
            Ok(true)
        }
        (Some(a), Some(b)) if a == b => Ok(false),
        (Some(a), Some(b)) => {
            if !Q::adjustable(&blocks[s]) {
                return Err(Q::mismatch(src, dst, axis, a, b));
            }
            match (Q::pinned(&blocks[s], axis), Q::pinned(&blocks[d], axis)) {
                (true, true) => Err(Q::mismatch(src, dst, axis, a, b)),
                (false, true) => {
                    log::warn!(
                        "block {src}: {axis} value {a:?} replaced by {b:?} fixed on block {dst}"
                    );
                    Q::set(&mut blocks[s], axis, b);
                    Ok(true)
                }
                // a block that disallows adjustment is never overwritten
                _ if !Q::adjustable(&blocks[d]) => Err(Q::mismatch(src, dst, axis, a, b)),
                _ => {
                    log::warn!(
                        "block {dst}: {axis} value {b:?} replaced by {a:?} from block {src}"
                    );
                    Q::set(&mut blocks[d], axis, a);
                    Ok(true)
                }
            }
        }
    }
}

fn check_chain<Q: ChainQuantity>(blocks: &mut [Block], id: BlockId) -> Result<bool, MeshBlocksError> {
    let mut changed = false;
    for axis in Axis::ALL {
        for other in axis_chain(blocks, id, axis)? {
            for orth in axis.orthogonal() {
                changed |= reconcile::<Q>(blocks, id, other, orth)?;
            }
        }
    }
    Ok(changed)
}

/// Fails on the first pair of chained blocks whose defined `Q` values differ.
fn verify_chains<Q: ChainQuantity>(blocks: &[Block]) -> Result<(), MeshBlocksError> {
    for block in blocks {
        for axis in Axis::ALL {
            for other in axis_chain(blocks, block.id(), axis)? {
                let other_block = block_ref(blocks, other)?;
                for orth in axis.orthogonal() {
                    if let (Some(a), Some(b)) = (Q::get(block, orth), Q::get(other_block, orth)) {
                        if a != b {
                            return Err(Q::mismatch(block.id(), other, orth, a, b));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_block_changed(blocks: &mut [Block], id: BlockId) -> Result<bool, MeshBlocksError> {
    let nodes = check_chain::<NodeCounts>(blocks, id)?;
    let gradings = check_chain::<Gradings>(blocks, id)?;
    Ok(nodes || gradings)
}

/// Propagates and validates node counts across every neighbour chain of `id`.
pub fn check_nodes(blocks: &mut [Block], id: BlockId) -> Result<(), MeshBlocksError> {
    check_chain::<NodeCounts>(blocks, id).map(|_| ())
}

/// Propagates and validates gradings across every neighbour chain of `id`.
pub fn check_gradings(blocks: &mut [Block], id: BlockId) -> Result<(), MeshBlocksError> {
    check_chain::<Gradings>(blocks, id).map(|_| ())
}

/// [`check_nodes`] followed by [`check_gradings`].
pub fn check_block(blocks: &mut [Block], id: BlockId) -> Result<(), MeshBlocksError> {
    check_block_changed(blocks, id).map(|_| ())
}

/// Runs [`check_block`] on every block in construction order, repeating
/// whole passes until one changes nothing.
///
/// A later block may overwrite a value an earlier block already matched
/// against another chain, so a single pass is not enough. Passes are bounded;
/// whatever mismatch remains after the last pass is reported by
/// [`verify_all`].
pub fn check_all(blocks: &mut [Block]) -> Result<(), MeshBlocksError> {
    let max_passes = 2 * blocks.len() + 2;
    for pass in 1..=max_passes {
        let mut changed = false;
        for i in 0..blocks.len() {
            changed |= check_block_changed(blocks, BlockId::new(i))?;
        }
        if !changed {
            log::debug!("conformity settled after {pass} pass(es)");
            return Ok(());
        }
    }
    log::warn!("conformity did not settle after {max_passes} passes");
    verify_all(blocks)
}

/// Read-only check that every pair of chained blocks agrees on the node
/// counts and gradings both of them define.
pub fn verify_all(blocks: &[Block]) -> Result<(), MeshBlocksError> {
    verify_chains::<NodeCounts>(blocks)?;
    verify_chains::<Gradings>(blocks)
}

/// First neighbour link `(block, dir)` whose target does not point back under
/// `dir ^ 1`, if any.
pub fn find_non_reciprocal(blocks: &[Block]) -> Option<(BlockId, FaceDir)> {
    blocks.iter().find_map(|b| {
        FaceDir::ALL.into_iter().find_map(|dir| {
            let other = b.neighbour(dir)?;
            let back = blocks.get(other.get()).and_then(|o| o.neighbour(dir.opposite()));
            (back != Some(b.id())).then_some((b.id(), dir))
        })
    })
}
