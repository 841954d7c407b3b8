//! Unit cube centred on the origin with one patch over all six faces.
//!
//! ```text
//! cargo run --example unit_cube -- [case-dir]
//! ```
//!
//! Writes `<case-dir>/constant/polyMesh/blockMeshDict`; the case directory
//! defaults to `unitCube` under the system temp dir.

use mesh_blocks::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), MeshBlocksError> {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("unitCube"));

    let mut mesh = MeshBuilder::new();
    let cube = mesh.add_box(
        [-0.5, -0.5, -0.5],
        [0.5, 0.5, 0.5],
        BlockSettings::uniform([10, 10, 10], [1.0, 1.0, 1.0]),
    )?;

    let mut faces = Vec::with_capacity(6);
    for dir in FaceDir::ALL {
        faces.push(mesh.face(cube, dir)?);
    }
    mesh.add_patch(Patch::new("OUTSIDE", faces));

    let target = mesh.write(&CaseDirectory::new(root))?;
    println!("wrote {}", target.display());
    Ok(())
}
