use std::fs;

use pbseries::text::{write_text, COLUMN_TITLES};
use pbseries::{render_line, PayloadType, Sample, Synthetic};
use pretty_assertions::assert_eq;
use rstest::rstest;
use temp_dir::TempDir;

#[rstest]
#[case(PayloadType::ScalarString, "12")]
#[case(PayloadType::ScalarShort, "12")]
#[case(PayloadType::ScalarFloat, "12.0")]
#[case(PayloadType::ScalarInt, "12")]
#[case(PayloadType::ScalarDouble, "12.0")]
#[case(PayloadType::ScalarByte, r"b'\x0c'")]
#[case(PayloadType::WaveformShort, "[12, 12]")]
#[case(PayloadType::WaveformDouble, "[12.0, 12.0]")]
#[case(PayloadType::WaveformString, r#"["12", "12"]"#)]
fn value_column(#[case] payload_type: PayloadType, #[case] val: &str) {
    let sample = Sample::from_index(payload_type, 86_400 + 59, 7, 12, 2);
    let line = render_line(&sample, 2021).unwrap();
    assert_eq!(
        line,
        format!("2021-01-02 00:00:59       86459            7    {val}")
    );
}

#[test]
fn text_file_layout() {
    let test_dir = TempDir::new().unwrap();
    let store = Synthetic::new()
        .pvname("SR-DI-DCCT-01:SIGNAL")
        .payload_type(PayloadType::ScalarInt)
        .year(2023)
        .start(31_535_998)
        .samples(3)
        .build()
        .unwrap();
    let path = test_dir.child("dump.txt");
    write_text(&path, &store).unwrap();

    let text = fs::read_to_string(path).unwrap();
    let expected = [
        "SR-DI-DCCT-01:SIGNAL, SCALAR_INT, 2023",
        COLUMN_TITLES,
        "2023-12-31 23:59:58    31535998            0    0",
        "2023-12-31 23:59:59    31535999            0    1",
        "2024-01-01 00:00:00    31536000            0    2",
    ];
    assert_eq!(text.lines().collect::<Vec<_>>(), expected);
    assert!(text.ends_with('\n'));
}
