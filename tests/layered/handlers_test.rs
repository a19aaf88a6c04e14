/*!
 * Built-in Handler Tests
 * Host files, ranges, encodings, mounts and store streams
 */

use layered_vfs::{EncodingMethod, LayerKind, PathSpec, StreamReader, VfsError};
use pretty_assertions::assert_eq;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::common::{store_data, Fixture};

fn read_all(fixture: &Fixture, spec: &PathSpec) -> Vec<u8> {
    let stream = fixture.resolver.open_byte_stream(spec).unwrap();
    let mut data = Vec::new();
    StreamReader::new(stream).read_to_end(&mut data).unwrap();
    data
}

#[test]
fn test_os_file() {
    let fixture = Fixture::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"host file contents").unwrap();
    file.flush().unwrap();

    let location = file.path().to_str().unwrap().to_string();
    let spec = PathSpec::os(location).unwrap();
    assert_eq!(read_all(&fixture, &spec), b"host file contents");

    let range = PathSpec::data_range(5, 4, &spec).unwrap();
    assert_eq!(read_all(&fixture, &range), b"file");
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_os_missing_and_directory() {
    let fixture = Fixture::new();
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("absent.raw");
    let spec = PathSpec::os(missing.to_str().unwrap()).unwrap();
    assert!(fixture.resolver.open_byte_stream(&spec).unwrap_err().is_backing());

    let spec = PathSpec::os(dir.path().to_str().unwrap()).unwrap();
    assert!(fixture.resolver.open_byte_stream(&spec).is_err());
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_data_range_bounds() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file("/blob", &b"0123456789"[..]);
    let blob = PathSpec::fake("/blob").unwrap();

    let tail = PathSpec::data_range(6, 4, &blob).unwrap();
    let mut reader = StreamReader::new(fixture.resolver.open_byte_stream(&tail).unwrap());
    reader.seek(SeekFrom::Start(2)).unwrap();
    let mut buf = [0u8; 8];
    let read = reader.read(&mut buf).unwrap();
    assert_eq!(&buf[..read], b"89");
    drop(reader);

    let past_end = PathSpec::data_range(8, 4, &blob).unwrap();
    match fixture.resolver.open_byte_stream(&past_end) {
        Err(VfsError::BackingResource { kind, .. }) => assert_eq!(kind, LayerKind::DataRange),
        other => panic!("expected a backing resource error, got {other:?}"),
    }

    let overflow = PathSpec::data_range(u64::MAX, 2, &blob).unwrap();
    assert!(fixture.resolver.open_byte_stream(&overflow).is_err());
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_encoded_streams() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file("/hex", &b"6c61796572\n6564"[..]);
    fixture.builtins.fake().add_file("/b64", &b"bGF5ZXJlZA==\n"[..]);
    fixture.builtins.fake().add_file("/bad", &b"not hex"[..]);

    let hex = PathSpec::encoded_stream(EncodingMethod::Base16, &PathSpec::fake("/hex").unwrap()).unwrap();
    let b64 = PathSpec::encoded_stream(EncodingMethod::Base64, &PathSpec::fake("/b64").unwrap()).unwrap();
    assert_eq!(read_all(&fixture, &hex), b"layered");
    assert_eq!(read_all(&fixture, &b64), b"layered");

    let bad = PathSpec::encoded_stream(EncodingMethod::Base16, &PathSpec::fake("/bad").unwrap()).unwrap();
    match fixture.resolver.open_byte_stream(&bad) {
        Err(VfsError::BackingResource { kind, .. }) => assert_eq!(kind, LayerKind::EncodedStream),
        other => panic!("expected a backing resource error, got {other:?}"),
    }
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_encoded_stream_releases_parent_early() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file("/hex", &b"414243"[..]);
    let parent = PathSpec::fake("/hex").unwrap();
    let spec = PathSpec::encoded_stream(EncodingMethod::Base16, &parent).unwrap();

    let stream = fixture.resolver.open_byte_stream(&spec).unwrap();
    assert!(!fixture.resolver.context().byte_streams().contains(&parent));
    assert_eq!(stream.size().unwrap(), 3);
    stream.release().unwrap();
}

#[test]
fn test_mounted_chain() {
    let fixture = Fixture::new();
    fixture.builtins.fake().add_file("/disk.img", &b"....payload...."[..]);
    let target = PathSpec::data_range(4, 7, &PathSpec::fake("/disk.img").unwrap()).unwrap();
    fixture.builtins.mounts().mount("evidence", target).unwrap();

    let mounted = PathSpec::mount("evidence").unwrap();
    assert_eq!(read_all(&fixture, &mounted), b"payload");

    assert!(fixture.resolver.open_byte_stream(&PathSpec::mount("other").unwrap()).is_err());
    assert!(fixture.resolver.open_file_system(&mounted).is_err());
    assert!(fixture.resolver.context().is_empty());
}

#[test]
fn test_store_streams_by_index_and_location() {
    let (fixture, image) = Fixture::with_store_image(2);

    let by_index = PathSpec::vshadow_store(1, &image).unwrap();
    let by_location = PathSpec::vshadow_location("/vss2", &image).unwrap();
    assert_eq!(read_all(&fixture, &by_index), store_data(1));
    assert_eq!(read_all(&fixture, &by_location), store_data(1));

    for spec in [
        PathSpec::vshadow_store(2, &image).unwrap(),
        PathSpec::vshadow_location("/vss3", &image).unwrap(),
        PathSpec::vshadow_location("/", &image).unwrap(),
    ] {
        assert!(fixture.resolver.open_byte_stream(&spec).is_err());
    }
    assert!(fixture.resolver.context().is_empty());
}
