use super::{MeshBuilderOptions, bounding_box};
use crate::algs::conformity;
use crate::algs::grading::solve_grading;
use crate::io::{
    BLOCK_MESH_DICT_HEADER, BlockMeshData, BlockRecord, CaseFileStore, PatchRecord,
};
use crate::mesh_error::MeshBlocksError;
use crate::topology::block::{Axis, Block, BlockSettings, Face, FaceDir};
use crate::topology::edge::EdgeRegistry;
use crate::topology::patch::Patch;
use crate::topology::point::{BlockId, EdgeId, VertexId};
use crate::topology::vertex::VertexRegistry;
use crate::validation::{DebugInvariants, MeshValidationOptions, validate_mesh};
use crate::debug_invariants;
use std::path::PathBuf;

/// One mesh-construction session.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    options: MeshBuilderOptions,
    vertices: VertexRegistry,
    edges: EdgeRegistry,
    blocks: Vec<Block>,
    patches: Vec<Patch>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MeshBuilderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &MeshBuilderOptions {
        &self.options
    }

    /// Adds a block from 8 corners or a 2-point bounding box.
    ///
    /// The block is linked with every earlier block it shares a face with.
    /// With `check_on_insert`, its node counts and gradings are then
    /// reconciled with its neighbour chains; a conformity error leaves the
    /// block registered.
    pub fn add_block(
        &mut self,
        points: &[[f64; 3]],
        settings: BlockSettings,
    ) -> Result<BlockId, MeshBlocksError> {
        let corners: [[f64; 3]; 8] = match points.len() {
            8 => {
                log::debug!("constructing block from 8 points");
                std::array::from_fn(|i| points[i])
            }
            2 => {
                log::debug!("constructing block from bounding box");
                bounding_box(points[0], points[1])
            }
            found => return Err(MeshBlocksError::InvalidShape { found }),
        };

        let corner_ids: [VertexId; 8] = corners.map(|p| {
            let slot = self.vertices.get_or_create(p);
            self.vertices.instance(slot).id()
        });
        let edge_ids: [EdgeId; 12] = Block::edge_endpoints(&corner_ids).map(|(s, e)| {
            let slot = self.edges.get_or_create(s, e, &self.vertices);
            self.edges.instance(slot).id()
        });

        let id = BlockId::new(self.blocks.len());
        self.blocks
            .push(Block::new(id, corner_ids, edge_ids, &settings));
        let links = conformity::discover_neighbours(&mut self.blocks, id)?;
        log::debug!("block {id} added with {links} neighbour link(s)");

        if self.options.check_on_insert {
            conformity::check_block(&mut self.blocks, id)?;
        }
        Ok(id)
    }

    /// Adds a block spanning the axis-aligned box `min`–`max`.
    pub fn add_box(
        &mut self,
        min: [f64; 3],
        max: [f64; 3],
        settings: BlockSettings,
    ) -> Result<BlockId, MeshBlocksError> {
        self.add_block(&[min, max], settings)
    }

    pub fn block(&self, id: BlockId) -> Result<&Block, MeshBlocksError> {
        self.blocks.get(id.get()).ok_or(MeshBlocksError::UnknownBlock(id))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Face `dir` of block `id`, for building patches.
    pub fn face(&self, id: BlockId, dir: FaceDir) -> Result<Face, MeshBlocksError> {
        Ok(self.block(id)?.face(dir))
    }

    pub fn vertices(&self) -> &VertexRegistry {
        &self.vertices
    }

    pub fn edges(&self) -> &EdgeRegistry {
        &self.edges
    }

    pub fn add_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn add_patches(&mut self, patches: impl IntoIterator<Item = Patch>) {
        self.patches.extend(patches);
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Reconciles node counts across the neighbour chains of `id`.
    pub fn check_nodes(&mut self, id: BlockId) -> Result<(), MeshBlocksError> {
        conformity::check_nodes(&mut self.blocks, id)
    }

    /// Reconciles gradings across the neighbour chains of `id`.
    pub fn check_gradings(&mut self, id: BlockId) -> Result<(), MeshBlocksError> {
        conformity::check_gradings(&mut self.blocks, id)
    }

    /// Reconciles node counts and gradings of every block, in construction order.
    pub fn check(&mut self) -> Result<(), MeshBlocksError> {
        conformity::check_all(&mut self.blocks)
    }

    /// Solves the grading of `id` along `axis` so its first cell next to
    /// `reference` matches the reference's mean cell size.
    ///
    /// The solved value is stored, pinned, and propagated to the neighbour
    /// chains of `id`. Returns the stored grading. On a conformity error the
    /// session is left as it was before the call.
    pub fn adjust_grading(
        &mut self,
        id: BlockId,
        reference: BlockId,
        axis: Axis,
    ) -> Result<f64, MeshBlocksError> {
        let ratio = solve_grading(
            &self.blocks,
            &self.edges,
            id,
            reference,
            axis,
            &self.options.grading_search,
        )?;
        let mut trial = self.blocks.clone();
        let block = &mut trial[id.get()];
        block.gradings[axis.index()] = Some(ratio);
        block.pinned_gradings[axis.index()] = true;
        conformity::check_block(&mut trial, id)?;
        self.blocks = trial;
        Ok(ratio)
    }

    /// Validates the whole mesh and collects the descriptor records.
    pub fn assemble(&mut self) -> Result<BlockMeshData, MeshBlocksError> {
        self.check()?;
        debug_invariants!(self.validate_invariants(), "MeshBuilder::assemble");

        let vertices = self
            .vertices
            .canonical_vertices()
            .map(|v| v.position())
            .collect();

        let mut blocks = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let mut nodes = [0u32; 3];
            let mut gradings = [0f64; 3];
            for axis in Axis::ALL {
                nodes[axis.index()] = block.node_count(axis).ok_or(
                    MeshBlocksError::UnresolvedNodes {
                        block: block.id(),
                        axis,
                    },
                )?;
                gradings[axis.index()] = block.grading(axis).ok_or(
                    MeshBlocksError::UnresolvedGrading {
                        block: block.id(),
                        axis,
                    },
                )?;
            }
            blocks.push(BlockRecord {
                corners: *block.corners(),
                nodes,
                gradings,
            });
        }

        let patches = self
            .patches
            .iter()
            .map(|p| PatchRecord {
                kind: p.kind().to_string(),
                name: p.name().to_string(),
                faces: p.faces().to_vec(),
            })
            .collect();

        Ok(BlockMeshData {
            vertices,
            blocks,
            patches,
        })
    }

    /// Assembles the mesh and writes it through `store`. Returns the target path.
    pub fn write<S: CaseFileStore>(&mut self, store: &S) -> Result<PathBuf, MeshBlocksError> {
        let data = self.assemble()?;
        let target = store.mesh_dict_path();
        store.write_template(&target, BLOCK_MESH_DICT_HEADER, &data.template_slots())?;
        log::info!(
            "wrote {} vertices, {} blocks, {} patches to {}",
            data.vertices.len(),
            data.blocks.len(),
            data.patches.len(),
            target.display()
        );
        Ok(target)
    }
}

impl DebugInvariants for MeshBuilder {
    fn debug_assert_invariants(&self) {
        debug_invariants!(self.validate_invariants(), "MeshBuilder");
    }

    fn validate_invariants(&self) -> Result<(), MeshBlocksError> {
        validate_mesh(
            &self.vertices,
            &self.edges,
            &self.blocks,
            MeshValidationOptions::default(),
        )
    }
}
