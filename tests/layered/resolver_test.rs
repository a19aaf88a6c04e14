/*!
 * Resolver Tests
 * Cache hits, capability checks and failure propagation
 */

use layered_vfs::{LayerKind, PathSpec, VfsError};

use crate::common::{Fixture, IMAGE_LOCATION};

#[test]
fn test_nested_chain_shares_parent() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file(IMAGE_LOCATION, &b"0123456789abcdef"[..]);
    let image = PathSpec::fake(IMAGE_LOCATION).unwrap();
    let low = PathSpec::data_range(0, 8, &image).unwrap();
    let high = PathSpec::data_range(8, 8, &image).unwrap();

    let low_stream = fixture.resolver.open_byte_stream(&low).unwrap();
    let high_stream = fixture.resolver.open_byte_stream(&high).unwrap();
    assert!(!low_stream.shares_instance(&high_stream));

    let streams = fixture.resolver.context().byte_streams();
    assert_eq!(streams.ref_count(&image), Some(2));
    assert_eq!(streams.len(), 3);

    low_stream.release().unwrap();
    assert_eq!(streams.ref_count(&image), Some(1));
    high_stream.release().unwrap();
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_dropped_handle_releases() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file("/a", &b"abc"[..]);
    let spec = PathSpec::fake("/a").unwrap();
    {
        let _stream = fixture.resolver.open_byte_stream(&spec).unwrap();
        assert!(!fixture.resolver.context().is_empty());
    }
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_unsupported_leaf_kind() {
    let fixture = Fixture::new();
    let image = PathSpec::os("/evidence/disk.qcow2").unwrap();
    let qcow = PathSpec::layer(LayerKind::Qcow, &image).unwrap();

    assert!(matches!(
        fixture.resolver.open_byte_stream(&qcow),
        Err(VfsError::UnsupportedKind {
            kind: LayerKind::Qcow,
            ..
        })
    ));
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_backing_failure_names_failing_layer() {
    let fixture = Fixture::new();
    let missing = PathSpec::fake("/missing").unwrap();
    let range = PathSpec::data_range(0, 4, &missing).unwrap();

    match fixture.resolver.open_byte_stream(&range) {
        Err(VfsError::BackingResource { kind, path_spec, .. }) => {
            assert_eq!(kind, LayerKind::Fake);
            assert_eq!(path_spec, missing.to_string());
        }
        other => panic!("expected a backing resource error, got {other:?}"),
    }
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_file_system_opens_are_shared() {
    let (fixture, image) = Fixture::with_store_image(2);
    let spec = PathSpec::vshadow_location("/", &image).unwrap();

    let first = fixture.resolver.open_file_system(&spec).unwrap();
    let second = fixture.resolver.open_file_system(&spec).unwrap();
    assert!(first.shares_instance(&second));
    assert_eq!(fixture.resolver.context().file_systems().ref_count(&spec), Some(2));

    first.release().unwrap();
    assert!(second.is_open());
    second.release().unwrap();
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_released_holder_leaves_file_system_open_for_others() {
    let (fixture, image) = Fixture::with_store_image(2);
    let spec = PathSpec::vshadow_location("/", &image).unwrap();
    let file_systems = fixture.resolver.context().file_systems();

    let first = fixture.resolver.open_file_system(&spec).unwrap();
    let second = fixture.resolver.open_file_system(&spec).unwrap();
    first.release().unwrap();

    let root = second.get_root_file_entry().unwrap();
    assert_eq!(second.sub_file_entries(&root).unwrap().len(), 2);

    let third = fixture.resolver.open_file_system(&spec).unwrap();
    assert!(third.shares_instance(&second));
    assert!(third.is_open());
    assert!(third.get_root_file_entry().unwrap().is_root());
    assert_eq!(file_systems.ref_count(&spec), Some(2));

    second.release().unwrap();
    third.release().unwrap();
    assert!(fixture.resolver.context().is_empty());
}
