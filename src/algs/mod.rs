//! Block-mesh algorithms: adjacency and conformity propagation, grading solve.

pub mod conformity;
pub mod grading;

pub use conformity::{axis_chain, check_all, check_block, check_gradings, check_nodes, verify_all};
pub use grading::{GradingSearch, solve_grading, solve_ratio};
