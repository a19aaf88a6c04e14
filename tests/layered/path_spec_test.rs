/*!
 * PathSpec Tests
 * Chain construction, structural identity and serialization
 */

use layered_vfs::path::serializer::{from_json, to_json};
use layered_vfs::{EncodingMethod, LayerKind, PathSpec, VfsError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn test_root_and_parent_rules() {
    let image = PathSpec::os("/evidence/disk.qcow2").unwrap();
    assert!(PathSpec::layer(LayerKind::Qcow, &image).is_ok());

    assert!(matches!(
        PathSpec::builder(LayerKind::Qcow).build(),
        Err(VfsError::InvalidSpec(_))
    ));
    assert!(matches!(
        PathSpec::builder(LayerKind::Os)
            .location("/x")
            .parent(image.clone())
            .build(),
        Err(VfsError::InvalidSpec(_))
    ));
}

#[test]
fn test_structurally_equal_chains_share_identity() {
    let build = || {
        let image = PathSpec::os("/evidence/disk.qcow2").unwrap();
        let qcow = PathSpec::layer(LayerKind::Qcow, &image).unwrap();
        PathSpec::vshadow_store(1, &qcow).unwrap()
    };
    let a = build();
    let b = build();
    assert_eq!(a, b);
    assert_eq!(a.structural_hash(), b.structural_hash());
    assert_eq!(a.to_string(), b.to_string());

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_comparable_form() {
    let image = PathSpec::os("/evidence/disk.qcow2").unwrap();
    let qcow = PathSpec::layer(LayerKind::Qcow, &image).unwrap();
    let store = PathSpec::vshadow_location("/vss2", &qcow).unwrap();
    assert_eq!(
        store.to_string(),
        "type: OS, location: /evidence/disk.qcow2\ntype: QCOW\ntype: VSHADOW, location: /vss2\n"
    );
}

#[test]
fn test_json_revalidates_chain() {
    let image = PathSpec::fake("/blob").unwrap();
    let encoded = PathSpec::encoded_stream(EncodingMethod::Base64, &image).unwrap();
    let json = to_json(&encoded).unwrap();
    assert_eq!(from_json(&json).unwrap(), encoded);

    let orphan = r#"{"type":"VSHADOW","store_index":0}"#;
    assert!(from_json(orphan).is_err());
}

fn location_strategy() -> impl Strategy<Value = String> {
    "/[a-z]{1,8}(/[a-z0-9]{1,8}){0,2}"
}

proptest! {
    #[test]
    fn prop_distinct_chains_are_unequal(a in location_strategy(), b in location_strategy(), i in 0u32..8, j in 0u32..8) {
        let left = PathSpec::vshadow_store(i, &PathSpec::fake(a.clone()).unwrap()).unwrap();
        let right = PathSpec::vshadow_store(j, &PathSpec::fake(b.clone()).unwrap()).unwrap();
        prop_assert_eq!(left == right, a == b && i == j);
    }
}
