//! Vertex registry with exact-coordinate deduplication.
//!
//! Every corner passed to a block is resolved here. The first time a
//! coordinate is seen a canonical vertex with the next [`VertexId`] is created.
//! Later requests for the same coordinate append a *duplicate* instance that
//! carries the canonical id, so each block keeps its own instance list while
//! the emitted vertex list only contains canonical vertices.
//!
//! Coordinates are compared exactly, without tolerance. Two corners that
//! differ in the last bit are two vertices.

use crate::topology::point::VertexId;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Index of one vertex instance (canonical or duplicate) in the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexSlot(usize);

impl VertexSlot {
    /// Raw instance index.
    pub fn get(self) -> usize {
        self.0
    }
}

/// One vertex instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    id: VertexId,
    position: [f64; 3],
    duplicate: bool,
}

impl Vertex {
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    /// `true` when this instance aliases an earlier canonical vertex.
    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Vertex) -> f64 {
        distance(self.position, other.position)
    }
}

pub(crate) fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(p, q)| (q - p) * (q - p))
        .sum::<f64>()
        .sqrt()
}

/// Hash key matching `f64` equality: `-0.0` folds onto `0.0`.
/// Positions containing NaN have no key and therefore never deduplicate.
fn coordinate_key(position: [f64; 3]) -> Option<[u64; 3]> {
    if position.iter().any(|c| c.is_nan()) {
        return None;
    }
    Some(position.map(|c| if c == 0.0 { 0u64 } else { c.to_bits() }))
}

/// Append-only arena of vertex instances.
#[derive(Clone, Debug, Default)]
pub struct VertexRegistry {
    instances: Vec<Vertex>,
    /// `canonical[id]` is the instance slot of the canonical vertex `id`.
    canonical: Vec<usize>,
    lookup: HashMap<[u64; 3], VertexId>,
}

impl VertexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `position` to a vertex instance.
    ///
    /// Returns the slot of a fresh canonical vertex, or of a new duplicate
    /// instance carrying the id of the canonical vertex at the same position.
    pub fn get_or_create(&mut self, position: [f64; 3]) -> VertexSlot {
        let slot = self.instances.len();
        let key = coordinate_key(position);
        if let Some(&id) = key.as_ref().and_then(|k| self.lookup.get(k)) {
            let canonical = &self.instances[self.canonical[id.get()]];
            let alias = Vertex {
                id,
                position: canonical.position,
                duplicate: true,
            };
            self.instances.push(alias);
            return VertexSlot(slot);
        }

        let id = VertexId::new(self.canonical.len());
        self.instances.push(Vertex {
            id,
            position,
            duplicate: false,
        });
        self.canonical.push(slot);
        if let Some(k) = key {
            self.lookup.insert(k, id);
        }
        VertexSlot(slot)
    }

    /// The instance stored at `slot`.
    pub fn instance(&self, slot: VertexSlot) -> &Vertex {
        &self.instances[slot.0]
    }

    /// The canonical vertex for `id`, if it exists.
    pub fn canonical(&self, id: VertexId) -> Option<&Vertex> {
        self.canonical.get(id.get()).map(|&slot| &self.instances[slot])
    }

    /// Position of the canonical vertex `id`.
    pub fn position(&self, id: VertexId) -> Option<[f64; 3]> {
        self.canonical(id).map(Vertex::position)
    }

    /// All instances in creation order, duplicates included.
    pub fn instances(&self) -> &[Vertex] {
        &self.instances
    }

    /// Canonical vertices in creation order (equivalently, id order).
    pub fn canonical_vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.instances.iter().filter(|v| !v.duplicate)
    }

    /// Number of instances, duplicates included.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of canonical vertices.
    pub fn canonical_len(&self) -> usize {
        self.canonical.len()
    }

    /// Checks that every canonical slot points at a non-duplicate instance with
    /// the matching id, and that every duplicate aliases an existing canonical.
    pub(crate) fn indirection_is_consistent(&self) -> bool {
        let canonical_ok = self.canonical.iter().enumerate().all(|(id, &slot)| {
            self.instances
                .get(slot)
                .is_some_and(|v| !v.duplicate && v.id.get() == id)
        });
        let aliases_ok = self
            .instances
            .iter()
            .filter(|v| v.duplicate)
            .all(|v| self.canonical(v.id).is_some_and(|c| c.position == v.position));
        canonical_ok && aliases_ok
    }
}
