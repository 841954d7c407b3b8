//! Grading solve between two face-adjacent blocks.
//!
//! For a block axis with `n` cells and expansion ratio `r` (last cell over
//! first cell, low to high end), the cells form a geometric progression with
//! common ratio `rG = r^(1/(1-n))` taken from the far end. The normalized
//! position of node `i` is
//!
//! ```text
//! λ(r, n, i) = (1 - rG^i) / (1 - rG^n)
//! ```
//!
//! so `λ(r, n, 1)` is the relative width of the cell next to the neighbour.
//! [`solve_ratio`] looks for the `r` that makes this width equal to the
//! neighbour's mean cell size.
//!
//! The search is a coarse scan over `r = 1/x`, `x = start + step·k`, that stops
//! at the first candidate which does not improve on the best residual so far.
//! It is not a root finder: the result is bounded by the step size and the
//! scan direction, and stays that way so generated meshes do not change.

use crate::mesh_error::MeshBlocksError;
use crate::topology::block::{Axis, Block};
use crate::topology::edge::EdgeRegistry;
use crate::topology::point::BlockId;

/// Scan parameters for [`solve_ratio`]; candidates are `1/x` for
/// `x = start, start + step, …` while `x < end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradingSearch {
    pub start: f64,
    pub step: f64,
    pub end: f64,
}

impl Default for GradingSearch {
    fn default() -> Self {
        Self {
            start: 0.001,
            step: 0.05,
            end: 500.0,
        }
    }
}

impl GradingSearch {
    /// Candidate ratios in scan order (largest ratio first).
    pub fn candidates(&self) -> impl Iterator<Item = f64> + '_ {
        (0usize..)
            .map(|k| self.start + self.step * k as f64)
            .take_while(|&x| x < self.end)
            .map(|x| 1.0 / x)
    }
}

/// Common ratio of the cell progression for expansion ratio `r` over `n` cells.
pub fn common_ratio(r: f64, n: u32) -> f64 {
    r.powf(1.0 / (1.0 - f64::from(n)))
}

/// Normalized position of node `i` on an edge with `n` cells and ratio `r`.
pub fn node_position(r: f64, n: u32, i: u32) -> f64 {
    let rg = common_ratio(r, n);
    if rg == 1.0 {
        return f64::from(i) / f64::from(n);
    }
    (1.0 - rg.powf(f64::from(i))) / (1.0 - rg.powf(f64::from(n)))
}

/// Scans for the expansion ratio whose first cell spans `target` of the edge.
///
/// `n` must be at least 2; a single cell has width 1 for every ratio.
pub fn solve_ratio(n: u32, target: f64, search: &GradingSearch) -> f64 {
    let residual = |r: f64| (node_position(r, n, 1) - target).abs();

    let mut best: Option<(f64, f64)> = None;
    for r in search.candidates() {
        let res = residual(r);
        match best {
            Some((_, best_res)) if !(res < best_res) => break,
            _ => best = Some((r, res)),
        }
    }
    best.map_or(1.0, |(r, _)| r)
}

/// Mean length of the 4 edges of `block` along `axis`.
pub fn mean_edge_length(block: &Block, axis: Axis, edges: &EdgeRegistry) -> f64 {
    block
        .axis_edges(axis)
        .iter()
        .map(|&e| edges.length(e))
        .sum::<f64>()
        / 4.0
}

/// Solves the grading of `blocks[id]` along `axis` against the direct
/// neighbour `reference` and returns it, without storing it.
///
/// The ratio is inverted when `reference` lies on the min side of `id`, since
/// gradings are expressed from the low to the high end of a block.
pub fn solve_grading(
    blocks: &[Block],
    edges: &EdgeRegistry,
    id: BlockId,
    reference: BlockId,
    axis: Axis,
    search: &GradingSearch,
) -> Result<f64, MeshBlocksError> {
    let own = blocks.get(id.get()).ok_or(MeshBlocksError::UnknownBlock(id))?;
    let other = blocks
        .get(reference.get())
        .ok_or(MeshBlocksError::UnknownBlock(reference))?;

    let dir = own
        .direction_of(reference)
        .filter(|d| d.axis() == axis)
        .ok_or(MeshBlocksError::NotADirectNeighbour {
            block: id,
            reference,
            axis,
        })?;

    let n_ref = other
        .node_count(axis)
        .ok_or(MeshBlocksError::UnresolvedNodes {
            block: reference,
            axis,
        })?;
    let n_own = own
        .node_count(axis)
        .ok_or(MeshBlocksError::UnresolvedNodes { block: id, axis })?;

    if n_own < 2 {
        log::debug!("block {id}: single cell along {axis}, grading 1");
        return Ok(1.0);
    }

    let l_ref = mean_edge_length(other, axis, edges);
    let l_own = mean_edge_length(own, axis, edges);
    let dx_ref = l_ref / f64::from(n_ref);

    let mut ratio = solve_ratio(n_own, dx_ref / l_own, search);
    if dir.is_min() {
        ratio = 1.0 / ratio;
    }
    log::debug!(
        "block {id}: grading {ratio:.6} along {axis} against block {reference} (dx {dx_ref:.6}, own mean cell {:.6})",
        l_own / f64::from(n_own)
    );
    Ok(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// First cell width of an edge of length `len` with `n` cells and
    /// expansion ratio `r`, measured from the low end.
    fn first_cell(len: f64, n: u32, r: f64) -> f64 {
        let g = r.powf(1.0 / f64::from(n - 1));
        len * (g - 1.0) / (g.powf(f64::from(n)) - 1.0)
    }

    #[test]
    fn default_scan_bounds() {
        let s = GradingSearch::default();
        let c: Vec<f64> = s.candidates().collect();
        assert_eq!(c[0], 1.0 / 0.001);
        assert!((c[1] - 1.0 / 0.051).abs() < 1e-12);
        assert_eq!(c.len(), 10_000);
        assert!(1.0 / c[c.len() - 1] < 500.0);
    }

    #[test]
    fn node_positions_span_unit_interval() {
        for r in [0.25, 0.5, 2.0, 7.0] {
            assert!((node_position(r, 8, 8) - 1.0).abs() < 1e-12);
            assert!(node_position(r, 8, 0).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_target_solves_near_one() {
        let r = solve_ratio(10, 0.1, &GradingSearch::default());
        assert!((r - 1.0).abs() < 0.01, "r = {r}");
    }

    #[test]
    fn unit_ratio_spaces_nodes_evenly() {
        assert_eq!(node_position(1.0, 4, 1), 0.25);
        assert_eq!(node_position(1.0, 4, 4), 1.0);
        // the scan passes through exactly 1 and must not stop there
        let s = GradingSearch {
            start: 0.5,
            step: 0.5,
            end: 10.0,
        };
        assert_eq!(s.candidates().nth(1), Some(1.0));
        assert_eq!(solve_ratio(10, 0.1, &s), 1.0);
        assert!(solve_ratio(10, 0.05, &s) < 1.0);
    }

    #[test]
    fn small_first_cell_needs_ratio_below_one() {
        // 10 cells, first cell 5% of the edge
        let r = solve_ratio(10, 0.05, &GradingSearch::default());
        assert!(r < 1.0);
        let rel = node_position(r, 10, 1);
        assert!((rel - 0.05).abs() < 0.002, "first cell {rel}");
    }

    #[test]
    fn unreachable_target_stops_at_scan_end() {
        let s = GradingSearch::default();
        let last = s.candidates().last().unwrap();
        let r = solve_ratio(10, 1e-9, &s);
        assert_eq!(r, last);
    }

    proptest! {
        #[test]
        fn solved_first_cell_tracks_target(n in 2u32..40, scale in 0.5f64..2.0) {
            let target = scale / f64::from(n);
            let r = solve_ratio(n, target, &GradingSearch::default());
            // low-end first cell of the mirrored ratio is the solved width
            let width = first_cell(1.0, n, 1.0 / r);
            prop_assert!((width - target).abs() / target < 0.1,
                "n={} target={} width={} r={}", n, target, width, r);
        }
    }
}
