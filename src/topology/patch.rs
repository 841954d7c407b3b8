//! Named groups of boundary faces.

use crate::topology::block::Face;
use serde::{Deserialize, Serialize};

/// Boundary-condition type used when none is given.
pub const DEFAULT_PATCH_TYPE: &str = "patch";

/// A boundary patch: a name, a boundary-condition type and the block faces it
/// is made of. Faces are held by value (vertex-id quadruples).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    name: String,
    kind: String,
    faces: Vec<Face>,
}

impl Patch {
    /// A patch of type [`DEFAULT_PATCH_TYPE`].
    pub fn new(name: impl Into<String>, faces: impl IntoIterator<Item = Face>) -> Self {
        Self::with_type(name, DEFAULT_PATCH_TYPE, faces)
    }

    pub fn with_type(
        name: impl Into<String>,
        kind: impl Into<String>,
        faces: impl IntoIterator<Item = Face>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            faces: faces.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boundary-condition type, e.g. `patch` or `wall`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn push_face(&mut self, face: Face) {
        self.faces.push(face);
    }
}
