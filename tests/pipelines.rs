use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use dnaclad::config::{EnumerateArgs, GroupArgs, ListArgs};
use dnaclad::error::DnacladError;
use dnaclad::io::groups::GroupsData;
use dnaclad::io::matches::MatchesData;
use dnaclad::pipelines::grouping::write_groups;
use dnaclad::pipelines::listing::run_listing;
use dnaclad::pipelines::{EnumerationPipeline, GroupingPipeline};
use dnaclad::utils::telemetry::{Stage, TelemetryBlackboard};

// --- Helpers ---

const MATCH_HEADER: &str =
    "Name,Match name,Chromosome,Start Location,End Location,Centimorgans,Matching SNPs";

fn csv_file(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Create temp file");
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn matches_file() -> NamedTempFile {
    csv_file(
        MATCH_HEADER,
        &[
            "me,Cousin Ann,7,1000000,9000000,18.5,4200",
            "me,Cousin Ann,7,1000000,3000000,6.1,1500",
            "me,Uncle Bo,7,7000000,9000000,5.2,1300",
            "me,Uncle Bo,12,500000,900000,3.0,700",
            "me,Distant Cy,7,2500000,2504000,0.9,120",
        ],
    )
}

// --- Enumeration ---

#[test]
fn enumerate_profiles_from_csv() {
    let file = matches_file();
    let args = EnumerateArgs {
        matches: vec![file.path().to_path_buf()],
        max_depth: 10,
        max_paths: 2,
        min_match_depth: 3,
        female: false,
        combinations: Some(25),
    };
    let telemetry = TelemetryBlackboard::new();
    let pipeline = EnumerationPipeline::from_args(&args, Some(telemetry.clone())).unwrap();
    let report = pipeline.run().unwrap();

    let ids: Vec<&str> = report.profiles.iter().map(|p| p.profile.as_str()).collect();
    assert_eq!(ids, vec!["Cousin Ann", "Uncle Bo", "Distant Cy"]);
    assert!(report.profiles.iter().all(|p| p.path_sets == 188));
    assert_eq!(report.profiles[0].segments, 2);
    assert_eq!(report.combinations, Some(25));
    assert_eq!(telemetry.stage(), Stage::Enumerating);
    assert_eq!(telemetry.segments_loaded(), 5);

    let mut out = Vec::new();
    report.write_to(&mut out).unwrap();
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("Total path sets = 564"));
}

#[test]
fn enumerate_rejects_bad_budget() {
    let file = matches_file();
    let args = EnumerateArgs {
        matches: vec![file.path().to_path_buf()],
        max_depth: 10,
        max_paths: 0,
        min_match_depth: 2,
        female: true,
        combinations: None,
    };
    let err = EnumerationPipeline::from_args(&args, None).err().unwrap();
    assert!(matches!(err, DnacladError::InvalidParameters { .. }));
}

// --- Grouping ---

#[test]
fn group_with_labels_to_file() {
    let matches = matches_file();
    let groups = csv_file(
        "Group ID,Description,Chromosome,Start,End",
        &["g-ann, Ann's great-grandparents ,7,1000000,9000000"],
    );
    let out = NamedTempFile::new().unwrap();
    let args = GroupArgs {
        matches: vec![matches.path().to_path_buf()],
        groups: Some(groups.path().to_path_buf()),
        out: Some(out.path().to_path_buf()),
    };

    let summary = GroupingPipeline::new(&args, None).run().unwrap();
    assert_eq!(summary.segments, 5);
    // chromosome 7 cluster plus the lone chromosome 12 segment
    assert_eq!(summary.top_level_groups, 2);

    let text = std::fs::read_to_string(out.path()).unwrap();
    let first_row = text.lines().nth(1).unwrap();
    assert_eq!(
        first_row,
        "7,g-ann,1000000,9000000,Ann's great-grandparents,1000000,9000000,Cousin Ann"
    );
    assert!(text.lines().any(|l| l.starts_with("12,,500000,900000,,")));
}

#[test]
fn group_rows_only_cover_loaded_segments() {
    let file = matches_file();
    let data = MatchesData::from_files(&[file.path()]).unwrap();
    let mut out = Vec::new();
    let summary = write_groups(&data, Some(&GroupsData::new()), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), summary.rows + 1);
    assert!(summary.emitted_groups >= summary.top_level_groups);
}

#[test]
fn duplicate_group_regions_are_rejected() {
    let groups = csv_file(
        "Group ID,Description,Chromosome,Start,End",
        &["a,first,7,1,2", "b,second,7,1,2"],
    );
    let err = GroupsData::from_file(groups.path()).unwrap_err();
    assert!(matches!(err, DnacladError::InvalidData { .. }));
}

// --- Listing ---

#[test]
fn list_range_on_chromosome() {
    let file = matches_file();
    let args = ListArgs {
        matches: file.path().to_path_buf(),
        chromosome: "7".to_string(),
        start: 2000000,
        end: 2600000,
        min_length: 5000,
    };
    let mut out = Vec::new();
    let count = run_listing(&args, &mut out).unwrap();
    assert_eq!(count, 2);
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Cousin Ann (1000000 - 9000000) [8000000]");
    assert_eq!(lines[1], "Cousin Ann (1000000 - 3000000) [2000000]");
    assert_eq!(lines.last(), Some(&"Total number of matches = 2"));
}

#[test]
fn malformed_match_file_reports_line() {
    let file = csv_file(MATCH_HEADER, &["me,Ann,7,1,2,1.0,10", "me,Ann,7,one,2,1.0,10"]);
    let err = MatchesData::from_files(&[file.path()]).unwrap_err();
    match err {
        DnacladError::Parse { file: path, line, .. } => {
            assert_eq!(path, PathBuf::from(file.path()));
            assert_eq!(line, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}
