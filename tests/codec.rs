use std::fs;
use std::io::Cursor;

use pbseries::codec::{self, ReadError};
use pbseries::{
    escape, load, save, unescape, Header, LoadError, PayloadType, ReadCursor, Reader, Synthetic,
    Writer,
};
use pbseries_test_support::{random_bytes, setup_tracing, write_fixture};
use pretty_assertions::assert_eq;
use rstest::rstest;
use temp_dir::TempDir;

#[test]
fn escape_round_trip() {
    for seed in 0..20 {
        let bytes = random_bytes(seed, 500);
        let escaped = escape(&bytes);
        assert!(!escaped.contains(&b'\n'));
        assert!(!escaped.contains(&b'\r'));
        assert_eq!(unescape(&escaped), bytes);
    }
}

#[test]
fn escape_known_bytes() {
    assert_eq!(
        escape(&[0x1b, 0x0a, 0x0d, 0x41]),
        [0x1b, 0x01, 0x1b, 0x02, 0x1b, 0x03, 0x41]
    );
}

#[rstest]
#[case(PayloadType::ScalarString)]
#[case(PayloadType::ScalarShort)]
#[case(PayloadType::ScalarFloat)]
#[case(PayloadType::ScalarEnum)]
#[case(PayloadType::ScalarByte)]
#[case(PayloadType::ScalarInt)]
#[case(PayloadType::ScalarDouble)]
#[case(PayloadType::WaveformString)]
#[case(PayloadType::WaveformShort)]
#[case(PayloadType::WaveformFloat)]
#[case(PayloadType::WaveformEnum)]
#[case(PayloadType::WaveformByte)]
#[case(PayloadType::WaveformInt)]
#[case(PayloadType::WaveformDouble)]
#[case(PayloadType::V4GenericBytes)]
fn every_payload_type_survives_save_and_load(#[case] payload_type: PayloadType) {
    setup_tracing();
    let test_dir = TempDir::new().unwrap();
    // indices 10, 13 and 27 put bytes that need escaping in the byte payloads
    let store = Synthetic::new()
        .payload_type(payload_type)
        .element_count(3)
        .samples(30)
        .start(100)
        .nano_gap(123)
        .build()
        .unwrap();
    let path = write_fixture(&test_dir, payload_type.tag_name(), &store);

    let loaded = load(&path).unwrap();
    assert_eq!(loaded, store);
}

#[rstest]
fn chunked_read_matches_single_read(#[values(1, 3, 7, 50, 51, 1000)] chunk_size: usize) {
    setup_tracing();
    let test_dir = TempDir::new().unwrap();
    let store = Synthetic::new().samples(50).build().unwrap();
    let path = write_fixture(&test_dir, "chunked", &store);

    let mut reader = Reader::builder().chunk_size(chunk_size).open(&path).unwrap();
    let mut samples = Vec::new();
    let mut chunks = 0;
    while let Some(chunk) = reader.next_chunk().unwrap() {
        assert!(chunk.len() <= chunk_size);
        samples.extend(chunk);
        chunks += 1;
    }
    assert_eq!(chunks, 50usize.div_ceil(chunk_size));
    assert_eq!(samples, store.samples());
    assert!(reader.cursor().is_drained());
    assert!(reader.next_chunk().unwrap().is_none());
}

#[test]
fn reader_requires_payload_type() {
    let test_dir = TempDir::new().unwrap();
    let store = Synthetic::new().samples(2).build().unwrap();
    let path = write_fixture(&test_dir, "typed", &store);

    let err = Reader::builder()
        .with_payload_type(PayloadType::ScalarInt)
        .open(&path)
        .unwrap_err();
    assert!(matches!(
        err,
        pbseries::builder::Error::PayloadTypeMismatch {
            expected: PayloadType::ScalarInt,
            in_file: PayloadType::ScalarDouble,
        }
    ));

    let reader = Reader::builder()
        .with_payload_type(PayloadType::ScalarDouble)
        .open(&path)
        .unwrap();
    assert_eq!(reader.header().pvname, "test");
}

#[test]
fn append_adds_samples_only() {
    let test_dir = TempDir::new().unwrap();
    let store = Synthetic::new().samples(10).build().unwrap();
    let (header, samples) = store.clone().into_parts();
    let path = test_dir.child("append.pb");

    save(&path, &header, &samples[..4], false).unwrap();
    save(&path, &header, &samples[4..], true).unwrap();
    assert_eq!(load(&path).unwrap(), store);

    let in_one_go = test_dir.child("in_one_go.pb");
    save(&in_one_go, &header, &samples, false).unwrap();
    assert_eq!(fs::read(&path).unwrap(), fs::read(&in_one_go).unwrap());
}

#[test]
fn writer_writes_header_once() {
    let test_dir = TempDir::new().unwrap();
    let store = Synthetic::new().samples(9).build().unwrap();
    let path = test_dir.child("writer.pb");

    let mut writer = Writer::new(&path, store.header().clone());
    assert!(!writer.header_written());
    for chunk in store.samples().chunks(4) {
        writer.write_chunk(chunk).unwrap();
    }
    assert!(writer.header_written());
    assert_eq!(load(&path).unwrap(), store);
}

#[test]
fn save_truncates_existing_file() {
    let test_dir = TempDir::new().unwrap();
    let long = Synthetic::new().samples(10).build().unwrap();
    let short = Synthetic::new().samples(2).build().unwrap();
    let path = write_fixture(&test_dir, "truncate", &long);
    save(&path, short.header(), short.samples(), false).unwrap();
    assert_eq!(load(&path).unwrap(), short);
}

#[test]
fn missing_file() {
    let test_dir = TempDir::new().unwrap();
    let err = load(test_dir.child("does_not_exist.pb")).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
}

#[test]
fn unknown_payload_type_in_header() {
    let mut header = Header::new("test", 2024, PayloadType::ScalarInt);
    header.r#type = 99;
    let mut bytes = Vec::new();
    codec::write_chunk(&mut bytes, Some(&header), &[]).unwrap();

    let mut cursor = ReadCursor::unbounded();
    let err = codec::read_chunk(Cursor::new(bytes), &mut cursor).unwrap_err();
    assert!(matches!(err, ReadError::UnknownPayloadType(99)));
}

#[test]
fn wrong_kind_of_sample_names_line() {
    let doubles = Synthetic::new().samples(3).build().unwrap();
    let strings = Synthetic::new()
        .payload_type(PayloadType::WaveformString)
        .samples(1)
        .build()
        .unwrap();

    let mut bytes = Vec::new();
    codec::write_chunk(&mut bytes, Some(doubles.header()), doubles.samples()).unwrap();
    codec::write_chunk(&mut bytes, None, strings.samples()).unwrap();

    let mut cursor = ReadCursor::unbounded();
    let err = codec::read_chunk(Cursor::new(bytes), &mut cursor).unwrap_err();
    assert!(
        matches!(
            err,
            ReadError::Sample {
                line: 5,
                payload_type: PayloadType::ScalarDouble,
                ..
            }
        ),
        "got: {err:?}"
    );
}
