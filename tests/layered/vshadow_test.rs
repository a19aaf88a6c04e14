/*!
 * Store Volume File System Tests
 * Lookup by index and location, entry enumeration and lifecycle
 */

use layered_vfs::vfs::vshadow::{store_location, store_name};
use layered_vfs::{FileSystem, PathSpec, StreamReader, VShadowFileSystem, VfsError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Read;

use crate::common::{store_data, Fixture};

fn open_fs(store_count: usize) -> (Fixture, VShadowFileSystem, PathSpec) {
    let (fixture, image) = Fixture::with_store_image(store_count);
    let fs = VShadowFileSystem::new(
        fixture.resolver.clone(),
        fixture.builtins.store_decoder(),
    );
    fs.open(&PathSpec::vshadow_location("/", &image).unwrap())
        .unwrap();
    (fixture, fs, image)
}

/// Lookup result, checked against the exists query
fn lookup(fs: &VShadowFileSystem, spec: &PathSpec) -> Option<String> {
    let entry = fs.get_file_entry_by_path_spec(spec).unwrap();
    assert_eq!(
        fs.file_entry_exists_by_path_spec(spec).unwrap(),
        entry.is_some()
    );
    entry.map(|e| e.name().to_string())
}

#[test]
fn test_two_store_scenario() {
    let (fixture, fs, image) = open_fs(2);

    let by_index = fs
        .get_file_entry_by_path_spec(&PathSpec::vshadow_store(1, &image).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(by_index.name(), "vss2");
    assert_eq!(by_index.store_index(), Some(1));

    let by_location = fs
        .get_file_entry_by_path_spec(&PathSpec::vshadow_location("/vss2", &image).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(by_location, by_index);

    assert_eq!(lookup(&fs, &PathSpec::vshadow_store(9, &image).unwrap()), None);
    for location in ["/vss0", "/vss9"] {
        assert_eq!(
            lookup(&fs, &PathSpec::vshadow_location(location, &image).unwrap()),
            None
        );
    }

    fs.close().unwrap();
    let result = fs.get_file_entry_by_path_spec(&PathSpec::vshadow_store(0, &image).unwrap());
    assert!(matches!(result, Err(VfsError::NotOpen(_))));
    assert!(matches!(fs.get_root_file_entry(), Err(VfsError::NotOpen(_))));

    fs.close().unwrap();
    assert!(!fs.is_open());
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_malformed_locations_are_absent() {
    let (_fixture, fs, image) = open_fs(3);
    for location in ["/vss01", "/vss", "/VSS1", "vss1", "/vss1/", "/vss+1", "/vss-1", "/vss 1", "/other"] {
        let spec = PathSpec::vshadow_location(location, &image).unwrap();
        assert_eq!(lookup(&fs, &spec), None, "location {location:?}");
    }
    fs.close().unwrap();
}

#[test]
fn test_lookup_without_address_is_invalid() {
    let (_fixture, fs, image) = open_fs(1);
    let bare = PathSpec::layer(layered_vfs::LayerKind::VShadow, &image).unwrap();
    assert!(matches!(
        fs.get_file_entry_by_path_spec(&bare),
        Err(VfsError::InvalidSpec(_))
    ));
    assert!(fs.file_entry_exists_by_path_spec(&bare).is_err());
    fs.close().unwrap();
}

#[test]
fn test_root_entry() {
    let (_fixture, fs, image) = open_fs(2);
    let root = fs.get_root_file_entry().unwrap();
    assert_eq!(root.name(), "");
    assert_eq!(root.store_index(), None);
    assert!(root.is_root() && root.is_virtual() && root.is_dir());

    let by_location = fs
        .get_file_entry_by_path_spec(&PathSpec::vshadow_location("/", &image).unwrap())
        .unwrap();
    assert_eq!(by_location, Some(root));
    fs.close().unwrap();
}

#[test]
fn test_double_open_fails() {
    let (_fixture, fs, image) = open_fs(1);
    let spec = PathSpec::vshadow_location("/", &image).unwrap();
    assert!(matches!(fs.open(&spec), Err(VfsError::AlreadyOpen(_))));
    assert!(fs.is_open());
    fs.close().unwrap();
}

#[test]
fn test_corrupt_volume_fails_open() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file("/junk.img", &b"not a store table at all"[..]);
    let image = PathSpec::fake("/junk.img").unwrap();
    let fs = VShadowFileSystem::new(fixture.resolver.clone(), fixture.builtins.store_decoder());

    let result = fs.open(&PathSpec::vshadow_location("/", &image).unwrap());
    assert!(matches!(result, Err(VfsError::BackingResource { .. })));
    assert!(!fs.is_open());
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_entries_open_store_streams() {
    let (fixture, fs, _image) = open_fs(3);
    let root = fs.get_root_file_entry().unwrap();
    assert!(matches!(
        root.open_byte_stream(&fixture.resolver),
        Err(VfsError::IsADirectory(_))
    ));

    let entries = fs.sub_file_entries(&root).unwrap();
    assert_eq!(entries.len(), 3);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.name(), store_name(i as u32));
        assert_eq!(entry.stat().size, store_data(i).len() as u64);

        let stream = entry.open_byte_stream(&fixture.resolver).unwrap();
        let mut data = Vec::new();
        StreamReader::new(stream).read_to_end(&mut data).unwrap();
        assert_eq!(data, store_data(i));
    }

    fs.close().unwrap();
    assert!(fixture.resolver.context().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_index_and_location_lookup(store_count in 0usize..12, candidate in 0u32..16) {
        let (_fixture, fs, image) = open_fs(store_count);
        let in_range = (candidate as usize) < store_count;

        let by_index = lookup(&fs, &PathSpec::vshadow_store(candidate, &image).unwrap());
        prop_assert_eq!(by_index.is_some(), in_range);

        let location = store_location(candidate);
        let by_location = lookup(&fs, &PathSpec::vshadow_location(location, &image).unwrap());
        prop_assert_eq!(&by_location, &by_index);
        if in_range {
            prop_assert_eq!(by_location, Some(format!("vss{}", candidate + 1)));
        }

        let past_end = format!("/vss{}", store_count + 1);
        prop_assert_eq!(lookup(&fs, &PathSpec::vshadow_location(past_end, &image).unwrap()), None);
        prop_assert_eq!(lookup(&fs, &PathSpec::vshadow_location("/vss0", &image).unwrap()), None);

        fs.close().unwrap();
    }
}
