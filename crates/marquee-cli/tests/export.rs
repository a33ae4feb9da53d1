//! Export round trips through the filesystem.

use chrono::{Local, TimeZone};
use marquee::{EnrichmentRecord, EntityStub, MergedRecord};
use marquee_cli::export::{export, write_csv, write_json};

fn records() -> Vec<MergedRecord> {
    let shawshank = MergedRecord::new(
        0,
        EntityStub {
            title: "The Shawshank Redemption".into(),
            detail_ref: "/title/tt0111161/".into(),
            detail_url: Some("https://www.imdb.com/title/tt0111161/".into()),
            rating: Some(9.3),
            vote_count: Some(3_000_000),
            genres: vec!["Drama".into()],
            runtime: Some("PT2H22M".into()),
            description: Some("Two imprisoned men, over a number of years.".into()),
        },
        EnrichmentRecord {
            director: Some("Frank Darabont".into()),
            top_actors: vec!["Tim Robbins".into(), "Morgan Freeman".into()],
            certificate: Some("R".into()),
            metascore: Some("82".into()),
            release_info: Some("October 14, 1994".into()),
            awards: Some("21 wins & 43 nominations".into()),
            budget: Some("$25,000,000 (estimated)".into()),
            box_office: Some("$29,332,133".into()),
        },
    );
    let degraded = MergedRecord::new(
        1,
        EntityStub {
            title: "The Godfather".into(),
            detail_ref: "/title/tt0068646/".into(),
            genres: vec!["Crime".into(), "Drama".into()],
            ..Default::default()
        },
        EnrichmentRecord::default(),
    );
    vec![shawshank, degraded]
}

/// Test 1: Export writes both files with shared stem.
#[test]
fn test_01_export_writes_both_files_with_shared_stem() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("data");
    let now = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

    let paths = export(&out, "top_250", &records(), &now).unwrap();

    assert!(paths.json.ends_with("top_250_20260102_0304.json"));
    assert!(paths.csv.ends_with("top_250_20260102_0304.csv"));
    assert!(paths.json.exists());
    assert!(paths.csv.exists());
}

/// Test 2: JSON export reads back identically.
#[test]
fn test_02_json_export_reads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let input = records();

    write_json(&path, &input).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<MergedRecord> = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed, input);
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(raw[1]["director"].is_null());
    assert_eq!(raw[0]["top_actors"][1], "Morgan Freeman");
}

/// Test 3: CSV export flattens lists and blanks absent fields.
#[test]
fn test_03_csv_export_flattens_lists_and_blanks_absent_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");

    write_csv(&path, &records()).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "rank");
    assert_eq!(headers.len(), 17);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(&rows[0][col("title")], "The Shawshank Redemption");
    assert_eq!(&rows[0][col("top_actors")], "Tim Robbins, Morgan Freeman");
    assert_eq!(&rows[0][col("box_office")], "$29,332,133");
    assert_eq!(&rows[0][col("rating")], "9.3");

    assert_eq!(&rows[1][col("rank")], "2");
    assert_eq!(&rows[1][col("genres")], "Crime, Drama");
    assert_eq!(&rows[1][col("director")], "");
    assert_eq!(&rows[1][col("top_actors")], "");
    assert_eq!(&rows[1][col("rating")], "");
}
