mod util;

use mesh_blocks::io::{BLOCK_MESH_DICT_HEADER, CaseDirectory};
use mesh_blocks::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;
use util::{MemoryStore, scratch_dir, uniform, unit_box};

fn unit_cube() -> (MeshBuilder, BlockId) {
    let mut mesh = MeshBuilder::new();
    let cube = mesh
        .add_box(
            [-0.5, -0.5, -0.5],
            [0.5, 0.5, 0.5],
            BlockSettings::uniform([10, 10, 10], [1.0, 1.0, 1.0]),
        )
        .unwrap();
    let faces = FaceDir::ALL.map(|d| mesh.face(cube, d).unwrap());
    mesh.add_patch(Patch::new("OUTSIDE", faces));
    (mesh, cube)
}

#[test]
fn unit_cube_exports_single_hex() {
    let (mut mesh, cube) = unit_cube();
    let data = mesh.assemble().unwrap();

    assert_eq!(data.vertices.len(), 8);
    assert_eq!(data.vertices[0], [-0.5, -0.5, -0.5]);
    assert_eq!(data.vertices[6], [0.5, 0.5, 0.5]);
    let distinct: HashSet<[u64; 3]> = data
        .vertices
        .iter()
        .map(|v| v.map(f64::to_bits))
        .collect();
    assert_eq!(distinct.len(), 8);

    assert_eq!(data.blocks.len(), 1);
    assert_eq!(
        data.blocks[0].to_string(),
        "hex (0 1 2 3 4 5 6 7) (10 10 10) simpleGrading (1.000000 1.000000 1.000000)"
    );

    let block = mesh.block(cube).unwrap();
    assert_eq!(block.faces().len(), 6);
    for face in block.faces() {
        let ids: HashSet<_> = face.vertices().into_iter().collect();
        assert_eq!(ids.len(), 4);
        assert!(ids.iter().all(|v| v.get() < 8));
    }
    assert!(block.neighbours().iter().all(Option::is_none));

    assert_eq!(data.patches.len(), 1);
    assert_eq!(data.patches[0].kind, "patch");
    assert_eq!(data.patches[0].name, "OUTSIDE");
    assert_eq!(data.patches[0].faces.len(), 6);
}

#[test]
fn shared_corner_is_emitted_once() {
    let mut mesh = MeshBuilder::new();
    unit_box(&mut mesh, [0.0, 0.0, 0.0], uniform(2));
    unit_box(&mut mesh, [1.0, 1.0, 1.0], uniform(2));

    let shared = mesh.block(BlockId::new(1)).unwrap().corners()[0];
    assert_eq!(shared, mesh.block(BlockId::new(0)).unwrap().corners()[6]);

    let instances: Vec<_> = mesh
        .vertices()
        .instances()
        .iter()
        .filter(|v| v.id() == shared)
        .collect();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances.iter().filter(|v| v.is_duplicate()).count(), 1);

    let data = mesh.assemble().unwrap();
    assert_eq!(data.vertices.len(), 15);
    assert_eq!(
        data.vertices.iter().filter(|&&v| v == [1.0, 1.0, 1.0]).count(),
        1
    );
    // corner-only contact is not face adjacency
    assert!(mesh.blocks().iter().all(|b| b.neighbours().iter().all(Option::is_none)));
}

#[test]
fn later_block_links_back_to_earlier() {
    let mut mesh = MeshBuilder::new();
    let a = unit_box(&mut mesh, [0.0, 0.0, 0.0], uniform(4));
    let b = unit_box(&mut mesh, [-1.0, 0.0, 0.0], uniform(4));
    let c = unit_box(&mut mesh, [0.0, 0.0, 1.0], uniform(4));

    let block_a = mesh.block(a).unwrap();
    assert_eq!(block_a.neighbour(FaceDir::XMin), Some(b));
    assert_eq!(block_a.neighbour(FaceDir::ZMax), Some(c));
    assert_eq!(mesh.block(b).unwrap().neighbour(FaceDir::XMax), Some(a));
    assert_eq!(mesh.block(c).unwrap().neighbour(FaceDir::ZMin), Some(a));
    assert_eq!(mesh.block(c).unwrap().direction_of(b), None);
    assert_eq!(mesh.validate_invariants(), Ok(()));
}

#[test]
fn explicit_corners_must_be_eight_or_two() {
    let mut mesh = MeshBuilder::new();
    for n in [0usize, 1, 3, 7, 9] {
        let points = vec![[0.0; 3]; n];
        let err = mesh.add_block(&points, uniform(1)).unwrap_err();
        assert_eq!(err, MeshBlocksError::InvalidShape { found: n });
    }
    assert!(mesh.blocks().is_empty());
}

#[test]
fn unresolved_values_fail_export() {
    let mut mesh = MeshBuilder::new();
    mesh.add_box(
        [0.0; 3],
        [1.0; 3],
        BlockSettings {
            nodes: [Some(2), Some(2), None],
            gradings: [Some(1.0); 3],
            ..BlockSettings::default()
        },
    )
    .unwrap();
    let err = mesh.assemble().unwrap_err();
    assert!(err.is_export());
    assert_eq!(
        err,
        MeshBlocksError::UnresolvedNodes {
            block: BlockId::new(0),
            axis: Axis::Z
        }
    );

    let mut mesh = MeshBuilder::new();
    mesh.add_box(
        [0.0; 3],
        [1.0; 3],
        BlockSettings {
            nodes: [Some(1); 3],
            ..BlockSettings::default()
        },
    )
    .unwrap();
    assert_eq!(
        mesh.assemble().unwrap_err(),
        MeshBlocksError::UnresolvedGrading {
            block: BlockId::new(0),
            axis: Axis::X
        }
    );
}

#[test]
fn write_hands_slots_to_store() {
    let (mut mesh, _) = unit_cube();
    let store = MemoryStore::default();
    let target = mesh.write(&store).unwrap();

    let writes = store.writes.borrow();
    assert_eq!(writes.len(), 1);
    let (path, header, slots) = &writes[0];
    assert_eq!(path, &target);
    assert_eq!(header, BLOCK_MESH_DICT_HEADER);
    assert_eq!(slots.vertices.len(), 8);
    assert_eq!(slots.vertices[0], "(-0.5 -0.5 -0.5)");
    assert_eq!(slots.blocks.len(), 1);
    assert_eq!(slots.patches[0], "patch OUTSIDE");
    assert_eq!(slots.patches[1], "(");
    assert_eq!(slots.patches[2], "    (4 7 3 0)");
    assert_eq!(slots.patches.last().map(String::as_str), Some(")"));
}

#[test]
fn case_directory_writes_block_mesh_dict() {
    let (mut mesh, _) = unit_cube();
    let root = scratch_dir("unit-cube");
    let case = CaseDirectory::new(&root);
    let target = mesh.write(&case).unwrap();

    assert_eq!(target, root.join("constant/polyMesh/blockMeshDict"));
    let text = std::fs::read_to_string(&target).unwrap();
    assert!(text.contains("object      blockMeshDict;"));
    assert!(text.contains(
        "    hex (0 1 2 3 4 5 6 7) (10 10 10) simpleGrading (1.000000 1.000000 1.000000)\n"
    ));
    assert!(text.contains("    patch OUTSIDE\n"));
    assert!(text.contains("        (4 5 6 7)\n"));
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn records_serialize_to_json() {
    let (mut mesh, _) = unit_cube();
    let data = mesh.assemble().unwrap();
    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["blocks"][0]["corners"][7], 7);
    assert_eq!(json["blocks"][0]["nodes"], serde_json::json!([10, 10, 10]));
    assert_eq!(json["patches"][0]["faces"][0]["vertices"], serde_json::json!([4, 7, 3, 0]));
    let back: BlockMeshData = serde_json::from_value(json).unwrap();
    assert_eq!(back, data);
}

const LATTICE: i32 = 3;

fn lattice_origin(cell: usize) -> [i32; 3] {
    let c = cell as i32;
    [c % LATTICE, (c / LATTICE) % LATTICE, c / (LATTICE * LATTICE)]
}

proptest! {
    #[test]
    fn neighbour_tables_are_reciprocal(
        order in Just((0..27usize).collect::<Vec<_>>()).prop_shuffle(),
        keep in prop::collection::vec(any::<bool>(), 27),
    ) {
        let mut mesh = MeshBuilder::new();
        let mut placed = Vec::new();
        for cell in order.into_iter().filter(|&c| keep[c]) {
            let o = lattice_origin(cell).map(f64::from);
            let id = mesh.add_box(o, [o[0] + 1.0, o[1] + 1.0, o[2] + 1.0], uniform(2)).unwrap();
            placed.push((lattice_origin(cell), id));
        }

        for block in mesh.blocks() {
            for dir in FaceDir::ALL {
                if let Some(other) = block.neighbour(dir) {
                    let back = mesh.block(other).unwrap().neighbour(dir.opposite());
                    prop_assert_eq!(back, Some(block.id()));
                }
            }
        }

        for &(pa, a) in &placed {
            for &(pb, b) in &placed {
                let diff: Vec<i32> = (0..3).map(|k| pb[k] - pa[k]).collect();
                let adjacent = diff.iter().map(|d| d.abs()).sum::<i32>() == 1;
                let dir = mesh.block(a).unwrap().direction_of(b);
                if adjacent {
                    let k = diff.iter().position(|&d| d != 0).unwrap();
                    let expected = FaceDir::from_index(2 * k + usize::from(diff[k] > 0)).unwrap();
                    prop_assert_eq!(dir, Some(expected));
                } else {
                    prop_assert_eq!(dir, None);
                }
            }
        }
        prop_assert!(mesh.validate_invariants().is_ok());
    }
}
