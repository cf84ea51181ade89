//! Full battery through the run pipeline: file on disk → window → dispatch → summary.

use std::fs;

use bitprobe_core::{
    Registry, RunConfig, StaticCatalog, TestStatus, generate_report, run_selected_tests,
};

fn pseudo_random_text(n: usize) -> String {
    let mut out = String::with_capacity(n);
    let mut state: u64 = 0xdeadbeef;
    while out.len() < n {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let byte = (state >> 33) as u8;
        out.push_str(&format!("{byte:08b}"));
    }
    out.truncate(n);
    out
}

fn all_tests() -> Vec<String> {
    Registry::canonical()
        .names()
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn canonical_battery_runs_on_pseudo_random_data() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.txt");
    fs::write(&input, pseudo_random_text(100_000)).unwrap();

    let report = run_selected_tests(
        &RunConfig {
            input_file: input,
            bit_length: 100_000,
            tests: all_tests(),
            offset: 0,
        },
        &Registry::canonical(),
        &bitprobe_tests::catalog(),
    )
    .unwrap();

    assert_eq!(report.results.len(), 15);
    assert_eq!(report.summary.error_count, 0, "{}", report.transcript);
    assert!(
        report.summary.pass_count >= 12,
        "only {} passed\n{}",
        report.summary.pass_count,
        report.transcript
    );
    let serial = report.results.iter().find(|r| r.name == "serial").unwrap();
    assert!(matches!(
        &serial.outcome,
        bitprobe_core::Outcome::Value(v) if v.auxiliary.as_ref().map(Vec::len) == Some(1)
    ));
    assert!(generate_report(&report).contains("| random_excursions_variant |"));
}

#[test]
fn short_window_turns_into_per_test_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("short.txt");
    fs::write(&input, pseudo_random_text(2_000)).unwrap();

    let report = run_selected_tests(
        &RunConfig {
            input_file: input,
            bit_length: 1_000_000,
            tests: vec!["frequency".into(), "rank".into(), "runs".into()],
            offset: 500,
        },
        &Registry::canonical(),
        &bitprobe_tests::catalog(),
    )
    .unwrap();

    assert_eq!(report.loaded_length, 1_500);
    let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
    assert_eq!(statuses[1], TestStatus::Error);
    assert_ne!(statuses[0], TestStatus::Error);
    assert_ne!(statuses[2], TestStatus::Error);
    assert!(report.transcript.contains("insufficient data: need 38912 bits, got 1500"));
}

#[test]
fn removed_module_only_fails_its_tests() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.txt");
    fs::write(&input, pseudo_random_text(20_000)).unwrap();

    let mut catalog: StaticCatalog = bitprobe_tests::catalog();
    catalog.remove("runs");

    let report = run_selected_tests(
        &RunConfig {
            input_file: input,
            bit_length: 20_000,
            tests: vec!["frequency".into(), "runs".into(), "cumulative_sums".into()],
            offset: 0,
        },
        &Registry::canonical(),
        &catalog,
    )
    .unwrap();

    let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
    assert_eq!(statuses[1], TestStatus::Error);
    assert_ne!(statuses[0], TestStatus::Error);
    assert_ne!(statuses[2], TestStatus::Error);
    assert!(report.transcript.contains("Available modules:"));
}
