use std::fs;

use hamster_level::config::{BakeConfig, Rgb8};
use hamster_level::error::BakeError;
use serde_json::json;

mod common;

use common::{document, LevelReader, UNBOUNDED};

const FAKE_PNG: &[u8] = b"\x89PNG not really";

fn mall_document() -> String {
    let materials = json!([
        { "name": "Ramp", "pbrMetallicRoughness": { "baseColorFactor": [0.2, 0.2, 0.2, 1.0] } },
        { "name": "Flag", "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } }
    ]);
    let meshes = json!([
        { "name": "Ramp", "primitives": [{
            "attributes": { "POSITION": 0, "NORMAL": 1 }, "indices": 2, "material": 0 }] },
        { "name": "Flag", "primitives": [{
            "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 3 }, "indices": 2, "material": 1 }] }
    ]);
    let nodes = json!([
        { "name": "T:Ramp", "mesh": 0, "translation": [0.0, 1.0, 0.0] },
        { "name": "REF:FLAG.002", "mesh": 1, "translation": [1.0, 2.0, 3.0] },
        { "name": "Light_A", "translation": [0.0, 10.0, 0.0] },
        { "name": "Direction_A", "translation": [0.0, 0.0, -1.0] },
        { "name": "C:Path", "children": [5, 6] },
        { "name": "P2", "translation": [2.0, 0.0, 0.0] },
        { "name": "P1", "translation": [1.0, 0.0, 0.0] },
        { "name": "Start" }
    ]);
    let images = json!([
        { "name": "BlueChecker", "uri": common::data_uri("image/png", FAKE_PNG) }
    ]);
    document(materials, meshes, nodes, images)
}

#[test_log::test]
fn bakes_a_complete_level() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mall.gltf");
    fs::write(&input, mall_document()).unwrap();
    let output = dir.path().join("out").join("mall.lvl");

    let config = BakeConfig {
        background: Rgb8::new(255, 128, 0),
        ..Default::default()
    };
    let summary = hamster_level::bake_file(&input, &output, &config).unwrap();
    assert_eq!(summary.ref_points, 2);
    assert_eq!(summary.splines, 1);
    assert_eq!(summary.lights, 1);
    assert_eq!(summary.meshes, 1);
    assert_eq!(summary.vertices, 3);
    assert_eq!(summary.textures, 1);

    let mut level = LevelReader::new(fs::read(&output).unwrap());

    // reference points
    assert_eq!(level.i32(), 2);
    assert_eq!(level.string(), "FLAG");
    assert_eq!(level.floats::<3>(), [50.0, 100.0, -150.0]);
    assert_eq!(level.floats::<3>(), [0.0, 0.0, 0.0]);
    assert_eq!(level.i32(), 1);
    let flag = level.surface();
    assert_eq!(flag.ambient, [0.9921, 0.9921, 0.9921, 1.0]);
    assert_eq!(flag.specular, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(flag.power, 10.0);
    assert_eq!(flag.texture.as_deref(), Some("BlueChecker.bmp"));

    assert_eq!(level.string(), "Start");
    assert_eq!(level.floats::<3>(), [0.0, 0.0, 0.0]);
    assert_eq!(level.floats::<3>(), [0.0, 0.0, 0.0]);
    assert_eq!(level.i32(), 0);

    // splines
    assert_eq!(level.i32(), 1);
    assert_eq!(level.string(), "Path");
    assert_eq!(level.i32(), 2);
    assert_eq!(level.floats::<3>(), [50.0, 0.0, 0.0]);
    assert_eq!(level.floats::<3>(), [100.0, 0.0, 0.0]);

    // lights
    assert_eq!(level.i32(), 1);
    assert_eq!(level.i32(), 0);
    assert_eq!(level.floats::<3>(), [0.0, 500.0, 0.0]);
    assert_eq!(level.floats::<3>(), [0.0, 0.0, 50.0]);
    assert_eq!(level.floats::<3>(), [1.0, 1.0, 1.0]);

    // background + ambient
    let background = level.floats::<3>();
    assert_eq!(background[0], 1.0);
    assert!((background[1] - 0.50196).abs() < 1e-5);
    assert_eq!(background[2], 0.0);
    assert_eq!(level.floats::<3>(), [0.0, 0.0, 0.0]);

    // vertex pool, C B A
    assert_eq!(level.i32(), 3);
    assert_eq!(
        level.floats::<8>(),
        [0.0, 50.0, -50.0, 0.0, 1.0, 0.0, 1.0, 1.0]
    );
    assert_eq!(
        level.floats::<8>(),
        [50.0, 50.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]
    );
    assert_eq!(
        level.floats::<8>(),
        [0.0, 50.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]
    );
    assert_eq!(level.aabb(), UNBOUNDED);

    // meshes
    assert_eq!(level.i32(), 1);
    assert_eq!(level.aabb(), UNBOUNDED);
    assert_eq!(level.i32(), 0);
    assert_eq!(level.i32(), 1);
    assert_eq!(level.string(), "T:Ramp");
    let ramp = level.surface();
    assert_eq!(ramp.ambient, [1.0, 1.0, 1.0, 0.5]);
    assert_eq!(ramp.diffuse, [1.0, 1.0, 1.0, 0.5]);
    assert_eq!(ramp.specular, [0.0, 0.0, 0.0, 0.0]);
    assert_eq!(ramp.emissive, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(ramp.has_reflection, 0);
    assert_eq!(ramp.texture, None);
    assert_eq!(level.i32(), 1);
    assert_eq!((level.i32(), level.i32()), (1, 0));
    assert!(level.is_at_end());

    let exported = output.parent().unwrap().join("textures").join("BlueChecker.png");
    assert_eq!(fs::read(exported).unwrap(), FAKE_PNG);
}

#[test]
fn unpaired_light_leaves_destination_untouched() {
    let nodes = json!([
        { "name": "Light_A" },
        { "name": "Light_B" },
        { "name": "Direction_A" }
    ]);
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lights.gltf");
    fs::write(&input, document(json!([]), json!([]), nodes, json!([]))).unwrap();
    let output = dir.path().join("lights.lvl");
    fs::write(&output, b"old level").unwrap();

    let result = hamster_level::bake_file(&input, &output, &BakeConfig::default());
    assert!(matches!(
        result,
        Err(BakeError::LightDirectionMismatch {
            lights: 2,
            directions: 1
        })
    ));
    assert_eq!(fs::read(&output).unwrap(), b"old level");
    assert!(!dir.path().join("textures").exists());
}

#[test]
fn non_triangle_primitive_is_reported() {
    let meshes = json!([
        { "name": "Wire", "primitives": [{
            "attributes": { "POSITION": 0, "NORMAL": 1 }, "mode": 1 }] }
    ]);
    let nodes = json!([{ "name": "Fence.003", "mesh": 0 }]);
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fence.gltf");
    fs::write(&input, document(json!([]), meshes, nodes, json!([]))).unwrap();

    let err = hamster_level::bake_file(&input, &dir.path().join("fence.lvl"), &BakeConfig::default())
        .unwrap_err();
    match &err {
        BakeError::MalformedPrimitive { node, primitive, .. } => {
            assert_eq!(node, "Fence.003");
            assert_eq!(*primitive, 0);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(err.to_string().contains("Fence.003"));
    assert!(!dir.path().join("fence.lvl").exists());
}

#[test]
fn textures_can_be_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mall.gltf");
    fs::write(&input, mall_document()).unwrap();
    let output = dir.path().join("mall.lvl");

    let config = BakeConfig {
        export_textures: false,
        ..Default::default()
    };
    let summary = hamster_level::bake_file(&input, &output, &config).unwrap();
    assert_eq!(summary.textures, 0);
    assert!(output.exists());
    assert!(!dir.path().join("textures").exists());
}
