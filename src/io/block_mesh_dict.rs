//! `blockMeshDict` writer over a case directory.
//!
//! # Layout
//! The descriptor is written to `<case>/constant/polyMesh/blockMeshDict`.
//!
//! # Limitations
//! - Only straight edges: the `edges` list is always empty.
//! - Writing only; existing dictionaries are overwritten, never parsed.

use super::{CaseFileStore, TemplateSlots};
use crate::mesh_error::MeshBlocksError;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// FoamFile header placed before the slots.
pub const BLOCK_MESH_DICT_HEADER: &str = "FoamFile
{
    version     2.0;
    format      ascii;
    class       dictionary;
    object      blockMeshDict;
}

convertToMeters 1.0;
";

const FOOTER: &str =
    "// ************************************************************************* //";

fn write_list<W: Write>(writer: &mut W, name: &str, lines: &[String]) -> Result<(), MeshBlocksError> {
    writeln!(writer, "{name}")?;
    writeln!(writer, "(")?;
    for line in lines {
        writeln!(writer, "    {line}")?;
    }
    writeln!(writer, ");")?;
    writeln!(writer)?;
    Ok(())
}

/// Writes a complete `blockMeshDict`: header, vertices, blocks, an empty edge
/// list and patches.
pub fn write_block_mesh_dict<W: Write>(
    mut writer: W,
    header: &str,
    slots: &TemplateSlots,
) -> Result<(), MeshBlocksError> {
    writeln!(writer, "{}", header.trim_end())?;
    writeln!(writer)?;
    write_list(&mut writer, "vertices", &slots.vertices)?;
    write_list(&mut writer, "blocks", &slots.blocks)?;
    write_list(&mut writer, "edges", &[])?;
    write_list(&mut writer, "patches", &slots.patches)?;
    writeln!(writer, "{FOOTER}")?;
    writer.flush()?;
    Ok(())
}

/// A case directory on disk.
#[derive(Clone, Debug)]
pub struct CaseDirectory {
    root: PathBuf,
}

impl CaseDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<case>/constant/polyMesh`
    pub fn poly_mesh_dir(&self) -> PathBuf {
        self.root.join("constant").join("polyMesh")
    }
}

impl CaseFileStore for CaseDirectory {
    fn mesh_dict_path(&self) -> PathBuf {
        self.poly_mesh_dir().join("blockMeshDict")
    }

    fn write_template(
        &self,
        target: &Path,
        header: &str,
        slots: &TemplateSlots,
    ) -> Result<(), MeshBlocksError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(target)?;
        write_block_mesh_dict(BufWriter::new(file), header, slots)
    }
}
