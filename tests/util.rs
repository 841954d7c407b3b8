#![allow(dead_code)]
use mesh_blocks::io::{CaseFileStore, TemplateSlots};
use mesh_blocks::prelude::*;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Cell count and uniform grading on every axis.
pub fn uniform(n: u32) -> BlockSettings {
    BlockSettings::uniform([n, n, n], [1.0, 1.0, 1.0])
}

/// Axis-aligned box of unit size with its min corner at `origin`.
pub fn unit_box(
    mesh: &mut MeshBuilder,
    origin: [f64; 3],
    settings: BlockSettings,
) -> BlockId {
    let max = [origin[0] + 1.0, origin[1] + 1.0, origin[2] + 1.0];
    mesh.add_box(origin, max, settings).unwrap()
}

/// Width of the cell at the low end of an edge of length `len` with `n`
/// cells and expansion ratio `r` (last cell over first cell).
pub fn first_cell(len: f64, n: u32, r: f64) -> f64 {
    if n == 1 {
        return len;
    }
    let g = r.powf(1.0 / f64::from(n - 1));
    len * (g - 1.0) / (g.powf(f64::from(n)) - 1.0)
}

/// Width of the cell at the high end of the same edge.
pub fn last_cell(len: f64, n: u32, r: f64) -> f64 {
    first_cell(len, n, 1.0 / r)
}

/// In-memory case store recording every write.
#[derive(Default)]
pub struct MemoryStore {
    pub writes: RefCell<Vec<(PathBuf, String, TemplateSlots)>>,
}

impl CaseFileStore for MemoryStore {
    fn mesh_dict_path(&self) -> PathBuf {
        PathBuf::from("memory/constant/polyMesh/blockMeshDict")
    }

    fn write_template(
        &self,
        target: &Path,
        header: &str,
        slots: &TemplateSlots,
    ) -> Result<(), MeshBlocksError> {
        self.writes
            .borrow_mut()
            .push((target.to_path_buf(), header.to_string(), slots.clone()));
        Ok(())
    }
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mesh-blocks-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
