//! Block-mesh generation sessions.
//!
//! A [`MeshBuilder`] owns every registry of one mesh: vertices, edges, blocks
//! and patches. Blocks are added one at a time; each new block is linked to
//! the earlier blocks it shares a face with and, by default, immediately
//! reconciled with its neighbour chains. [`MeshBuilder::assemble`] validates
//! the whole mesh and produces the records handed to a
//! [`CaseFileStore`](crate::io::CaseFileStore).
//!
//! Construction order matters: neighbour discovery only looks at blocks that
//! already exist, so values propagate from earlier to later blocks at
//! insertion time. `assemble` re-runs the checks on every block once all of
//! them exist.

mod builder;

pub use builder::MeshBuilder;

use crate::algs::grading::GradingSearch;

/// Session-wide options for a [`MeshBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshBuilderOptions {
    /// Reconcile node counts and gradings of each block with its neighbour
    /// chains as soon as it is added.
    pub check_on_insert: bool,
    /// Scan used by [`MeshBuilder::adjust_grading`].
    pub grading_search: GradingSearch,
}

impl Default for MeshBuilderOptions {
    fn default() -> Self {
        Self {
            check_on_insert: true,
            grading_search: GradingSearch::default(),
        }
    }
}

impl MeshBuilderOptions {
    /// Only check conformity on explicit calls and in `assemble`.
    pub fn deferred() -> Self {
        Self {
            check_on_insert: false,
            ..Self::default()
        }
    }
}

/// The 8 corners of the axis-aligned box spanned by `min` and `max`, in block
/// corner order: the bottom face counter-clockwise from `min`, then the top
/// face at `max[2]`.
pub fn bounding_box(min: [f64; 3], max: [f64; 3]) -> [[f64; 3]; 8] {
    [
        [min[0], min[1], min[2]],
        [max[0], min[1], min[2]],
        [max[0], max[1], min[2]],
        [min[0], max[1], min[2]],
        [min[0], min[1], max[2]],
        [max[0], min[1], max[2]],
        [max[0], max[1], max[2]],
        [min[0], max[1], max[2]],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_corner_order() {
        let c = bounding_box([0.0, 0.0, 0.0], [1.0, 2.0, 3.0]);
        assert_eq!(c[0], [0.0, 0.0, 0.0]);
        assert_eq!(c[1], [1.0, 0.0, 0.0]);
        assert_eq!(c[2], [1.0, 2.0, 0.0]);
        assert_eq!(c[3], [0.0, 2.0, 0.0]);
        for k in 0..4 {
            assert_eq!(c[k + 4][..2], c[k][..2]);
            assert_eq!(c[k + 4][2], 3.0);
        }
    }

    #[test]
    fn default_options_check_on_insert() {
        assert!(MeshBuilderOptions::default().check_on_insert);
        assert!(!MeshBuilderOptions::deferred().check_on_insert);
    }
}
