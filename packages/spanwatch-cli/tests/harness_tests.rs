//! Evaluation harness integration tests

mod common;

use common::*;
use pretty_assertions::assert_eq;
use spanwatch_cli::{evaluate_root, Group, RESULTS_HEADER};
use spanwatch_report::{CSV_HEADER, CSV_NAME};
use tempfile::TempDir;

#[test]
fn test_safe_and_unsafe_groups_are_scored() {
    let root = TempDir::new().unwrap();
    write_crate(root.path(), "safe", "write_log", &["/var/log/app.log"]);
    write_crate(root.path(), "unsafe", "write_mem", &["/tmp/x", "/proc/self/mem"]);
    write_crate(root.path(), "unsafe", "write_tmp", &["/tmp/y"]);

    let summary = evaluate_root(root.path(), &analyzer(), false).unwrap();

    let scored: Vec<(Group, &str, bool, &str)> = summary
        .outcomes
        .iter()
        .map(|o| (o.group, o.name.as_str(), o.hit, o.result_label()))
        .collect();
    assert_eq!(
        scored,
        vec![
            (Group::Safe, "write_log", false, "PASS"),
            (Group::Unsafe, "write_mem", true, "PASS"),
            (Group::Unsafe, "write_tmp", false, "FAIL"),
        ]
    );
    assert_eq!(summary.passed(), 2);
    assert_eq!(summary.total(), 3);
}

#[test]
fn test_missing_group_and_sites_file() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("unsafe").join("empty_crate")).unwrap();

    let summary = evaluate_root(root.path(), &analyzer(), false).unwrap();

    assert_eq!(summary.total(), 1);
    assert!(!summary.outcomes[0].hit);
    assert!(!summary.all_passed());
}

#[test]
fn test_results_and_span_tables_written() {
    let root = TempDir::new().unwrap();
    write_crate(root.path(), "unsafe", "write_mem", &["/proc/self/mem"]);

    let summary = evaluate_root(root.path(), &analyzer(), true).unwrap();
    let results = root.path().join("results.csv");
    summary.write_results(&results).unwrap();

    assert_eq!(
        std::fs::read_to_string(&results).unwrap(),
        format!("{}\nunsafe,write_mem,true,PASS\n", RESULTS_HEADER)
    );

    let spans = std::fs::read_to_string(root.path().join("unsafe/write_mem").join(CSV_NAME)).unwrap();
    let lines: Vec<&str> = spans.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines[1], "std::fs::write,/proc/self/mem,1,src/main.rs:1:5: 1:30,SAT");
}

#[test]
fn test_results_quote_crate_names() {
    let root = TempDir::new().unwrap();
    write_crate(root.path(), "safe", "log,rotate", &["/var/log/app.log"]);

    let summary = evaluate_root(root.path(), &analyzer(), false).unwrap();
    let results = root.path().join("results.csv");
    summary.write_results(&results).unwrap();

    assert_eq!(
        std::fs::read_to_string(&results).unwrap(),
        format!("{}\nsafe,\"log,rotate\",false,PASS\n", RESULTS_HEADER)
    );
}

#[test]
fn test_corrupt_batch_is_an_error() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("safe").join("broken");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("sites.json"), "{not json").unwrap();

    assert!(evaluate_root(root.path(), &analyzer(), false).is_err());
}
