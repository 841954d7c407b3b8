//! Directed edge registry.
//!
//! Edges are keyed on the ordered `(start, end)` vertex-id pair: `(a, b)` and
//! `(b, a)` are distinct edges. Repeated pairs produce duplicate instances
//! carrying the canonical [`EdgeId`], mirroring
//! [`VertexRegistry`](crate::topology::vertex::VertexRegistry).

use crate::topology::point::{EdgeId, VertexId};
use crate::topology::vertex::{VertexRegistry, distance};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Curve type of an edge. Only straight lines are generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    #[default]
    Line,
}

impl EdgeKind {
    /// Keyword used for the edge type in the mesh dictionary.
    pub fn keyword(self) -> &'static str {
        match self {
            EdgeKind::Line => "line",
        }
    }
}

/// Index of one edge instance in the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeSlot(usize);

/// One edge instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: EdgeId,
    start: VertexId,
    end: VertexId,
    kind: EdgeKind,
    length: f64,
    duplicate: bool,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn end(&self) -> VertexId {
        self.end
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Euclidean distance between the endpoints, computed at creation.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }
}

/// Append-only arena of edge instances.
#[derive(Clone, Debug, Default)]
pub struct EdgeRegistry {
    instances: Vec<Edge>,
    canonical: Vec<usize>,
    lookup: HashMap<(VertexId, VertexId), EdgeId>,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the directed pair `(start, end)` to an edge instance.
    ///
    /// Endpoints unknown to `vertices` give a zero length; blocks only ever
    /// pass ids they obtained from the same registry.
    pub fn get_or_create(
        &mut self,
        start: VertexId,
        end: VertexId,
        vertices: &VertexRegistry,
    ) -> EdgeSlot {
        let slot = self.instances.len();
        if let Some(&id) = self.lookup.get(&(start, end)) {
            let mut alias = self.instances[self.canonical[id.get()]].clone();
            alias.duplicate = true;
            self.instances.push(alias);
            return EdgeSlot(slot);
        }

        let length = match (vertices.position(start), vertices.position(end)) {
            (Some(a), Some(b)) => distance(a, b),
            _ => 0.0,
        };
        let id = EdgeId::new(self.canonical.len());
        self.instances.push(Edge {
            id,
            start,
            end,
            kind: EdgeKind::default(),
            length,
            duplicate: false,
        });
        self.canonical.push(slot);
        self.lookup.insert((start, end), id);
        EdgeSlot(slot)
    }

    pub fn instance(&self, slot: EdgeSlot) -> &Edge {
        &self.instances[slot.0]
    }

    pub fn canonical(&self, id: EdgeId) -> Option<&Edge> {
        self.canonical.get(id.get()).map(|&slot| &self.instances[slot])
    }

    /// Length of the canonical edge `id`, `0.0` for unknown ids.
    pub fn length(&self, id: EdgeId) -> f64 {
        self.canonical(id).map_or(0.0, Edge::length)
    }

    pub fn instances(&self) -> &[Edge] {
        &self.instances
    }

    pub fn canonical_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.instances.iter().filter(|e| !e.duplicate)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn canonical_len(&self) -> usize {
        self.canonical.len()
    }

    pub(crate) fn indirection_is_consistent(&self) -> bool {
        self.canonical.iter().enumerate().all(|(id, &slot)| {
            self.instances
                .get(slot)
                .is_some_and(|e| !e.duplicate && e.id.get() == id)
        }) && self
            .instances
            .iter()
            .all(|e| self.lookup.get(&(e.start, e.end)) == Some(&e.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_vertices() -> (VertexRegistry, VertexId, VertexId) {
        let mut vertices = VertexRegistry::new();
        let a = vertices.get_or_create([0.0, 0.0, 0.0]);
        let b = vertices.get_or_create([0.0, 2.0, 0.0]);
        let (a, b) = (vertices.instance(a).id(), vertices.instance(b).id());
        (vertices, a, b)
    }

    #[test]
    fn length_is_computed_on_creation() {
        let (vertices, a, b) = two_vertices();
        let mut edges = EdgeRegistry::new();
        let e = edges.get_or_create(a, b, &vertices);
        assert_eq!(edges.instance(e).length(), 2.0);
        assert_eq!(edges.instance(e).kind(), EdgeKind::Line);
        assert_eq!(edges.instance(e).kind().keyword(), "line");
    }

    #[test]
    fn dedup_is_direction_sensitive() {
        let (vertices, a, b) = two_vertices();
        let mut edges = EdgeRegistry::new();
        let ab = edges.get_or_create(a, b, &vertices);
        let ba = edges.get_or_create(b, a, &vertices);
        let ab2 = edges.get_or_create(a, b, &vertices);

        assert_ne!(edges.instance(ab).id(), edges.instance(ba).id());
        assert!(!edges.instance(ba).is_duplicate());
        assert!(edges.instance(ab2).is_duplicate());
        assert_eq!(edges.instance(ab2).id(), edges.instance(ab).id());
        assert_eq!(edges.canonical_len(), 2);
        assert_eq!(edges.canonical_edges().count(), 2);
        assert!(edges.indirection_is_consistent());
    }
}
