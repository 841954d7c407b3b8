//! Strong, zero-cost handles for block-mesh entities.
//!
//! Vertices, edges and blocks live in arenas owned by a
//! [`MeshBuilder`](crate::mesh_generation::MeshBuilder) session. Each arena
//! hands out a transparent `usize` newtype so a vertex index can never be used
//! where a block index is expected.
//!
//! Ids are 0-based and follow creation order. For vertices this is also the
//! implicit index used by the emitted `hex (...)` and patch face lines.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Wraps a raw arena index.
            #[inline]
            pub const fn new(raw: usize) -> Self {
                $name(raw)
            }

            /// Returns the raw arena index.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        /// Prints only the raw index.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(id: $name) -> usize {
                id.0
            }
        }
    };
}

arena_handle!(
    /// Id of a canonical vertex. Duplicate instances share the id of the
    /// canonical vertex they alias.
    VertexId
);

arena_handle!(
    /// Id of a canonical directed edge.
    EdgeId
);

arena_handle!(
    /// Id of a block, assigned in construction order.
    BlockId
);

// -----------------------------------------------------------------------------
// Testing and assertions
// -----------------------------------------------------------------------------
