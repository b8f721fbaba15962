use std::collections::BTreeSet;
use std::path::Path;

use pdh_reader::data::xml::parse_document;
use pdh_reader::{list_available, PdhError, PdhReader};
use tempfile::TempDir;

const HEADER_LINES: usize = 5;
const FOOTER_LINES: usize = 496;

/// Indented XML footer of exactly `FOOTER_LINES` lines.
fn footer_lines() -> Vec<String> {
    let mut lines = vec![
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string(),
        "<fileinfo>".to_string(),
        "  <parameter id=\"Sample\">lysozyme</parameter>".to_string(),
        "  <group id=\"Channels\">".to_string(),
    ];
    let mut channel = 0;
    while lines.len() + 2 < FOOTER_LINES {
        lines.push(format!("    <channel index=\"{channel}\"/>"));
        channel += 1;
    }
    lines.push("  </group>".to_string());
    lines.push("</fileinfo>".to_string());
    lines
}

fn rows(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| (0.01 + k as f64 * 0.005, 1000.0 / (1.0 + k as f64)))
        .collect()
}

fn write_pdh(dir: &Path, name: &str, data: &[(f64, f64)], footer: &[String]) {
    let mut content = String::new();
    for h in 0..HEADER_LINES {
        content.push_str(&format!("header line {h}\n"));
    }
    for (q, i) in data {
        content.push_str(&format!("{q:.6e}   {i:.6e}   {:.6e}\n", 0.01));
    }
    for line in footer {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(dir.join(format!("{name}.pdh")), content).unwrap();
}

#[test]
fn round_trip_on_well_formed_file() {
    let dir = TempDir::new().unwrap();
    let data = rows(40);
    let footer = footer_lines();
    write_pdh(dir.path(), "lysozyme", &data, &footer);

    let reader = PdhReader::open(dir.path()).unwrap();

    let table = reader.get_data("lysozyme").unwrap();
    assert_eq!(table.len(), data.len());
    for (record, (q, i)) in table.iter().zip(&data) {
        assert!((record.scattering_vector - q).abs() < 1e-9);
        assert!((record.counts_per_area - i).abs() / i < 1e-6);
    }

    let metadata = reader.get_metadata("lysozyme").unwrap();
    let expected = parse_document(&footer.join("\n")).unwrap();
    assert_eq!(metadata, expected);
    assert_eq!(
        metadata.root.child("group").unwrap().children_named("channel").count(),
        FOOTER_LINES - 6
    );
}

#[test]
fn row_count_is_lines_minus_header_and_footer() {
    let dir = TempDir::new().unwrap();
    for n in [0, 1, 17] {
        write_pdh(dir.path(), &format!("n{n}"), &rows(n), &footer_lines());
    }

    let reader = PdhReader::open(dir.path()).unwrap();
    for n in [0, 1, 17] {
        let table = reader.get_data(&format!("n{n}")).unwrap();
        assert_eq!(table.len(), n);
    }
}

#[test]
fn file_shorter_than_window_gives_empty_table() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("short.pdh"), "a\nb\n1.0   2.0\n<root/>\n").unwrap();

    let reader = PdhReader::open(dir.path()).unwrap();
    assert!(reader.get_data("short").unwrap().is_empty());
    assert_eq!(reader.get_metadata("short").unwrap().root.name, "root");
}

#[test]
fn single_file_directory_lists_its_stem() {
    let dir = TempDir::new().unwrap();
    write_pdh(dir.path(), "sample", &rows(3), &footer_lines());

    let names = list_available(dir.path()).unwrap();
    assert_eq!(names, BTreeSet::from(["sample".to_string()]));
}

#[test]
fn unknown_name_is_reported() {
    let dir = TempDir::new().unwrap();
    write_pdh(dir.path(), "sample", &rows(3), &footer_lines());

    let reader = PdhReader::open(dir.path()).unwrap();
    let err = reader.get_data("missing").unwrap_err();
    assert!(matches!(err, PdhError::UnknownFile { ref name } if name == "missing"));
}

#[test]
fn inline_tag_on_data_row_is_not_metadata() {
    let dir = TempDir::new().unwrap();
    let mut footer = footer_lines();
    // replace a channel line with a data-shaped line carrying a tag
    footer[10] = "1.0   2.0<tag>".to_string();
    write_pdh(dir.path(), "inline", &rows(2), &footer);

    let reader = PdhReader::open(dir.path()).unwrap();
    let metadata = reader.get_metadata("inline").unwrap();
    let channels = metadata.root.child("group").unwrap().children_named("channel").count();
    assert_eq!(channels, FOOTER_LINES - 7);
    assert!(metadata.root.descendants().iter().all(|e| e.name != "tag"));
}

#[test]
fn unclosed_tag_in_footer_names_the_line() {
    let dir = TempDir::new().unwrap();
    let mut footer = footer_lines();
    footer[20] = "    <channel index=\"broken\">".to_string();
    write_pdh(dir.path(), "broken", &rows(4), &footer);

    let reader = PdhReader::open(dir.path()).unwrap();
    let err = reader.get_metadata("broken").unwrap_err();
    match err {
        PdhError::MetadataParse { line, .. } => {
            // 5 header lines, 4 data rows, then footer[20]
            let open_line = HEADER_LINES + 4 + 20 + 1;
            assert_eq!(line, open_line);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_directory_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let err = PdhReader::open(&dir.path().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, PdhError::DirectoryNotFound { .. }));
    assert!(err.is_filesystem());
}
