use std::fs;

use lrutrace::replay::write_history_csv;
use lrutrace::{load_trace, replay, Limits, Outcome};
use tempfile::TempDir;

#[test]
fn test_replay_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.json");
    fs::write(
        &path,
        r#"{
            "operations": ["LRUCache", "put", "put", "get", "put", "get", "put", "get", "get", "get"],
            "values": [[2], [1, 1], [2, 2], [1], [3, 3], [2], [4, 4], [1], [3], [4]]
        }"#,
    )
    .unwrap();

    let ops = load_trace(&path).unwrap();
    let report = replay(Limits::demo(), &ops).unwrap();

    assert_eq!(
        &report.outputs[1..],
        &[
            Outcome::Done,
            Outcome::Done,
            Outcome::Value(1),
            Outcome::Done,
            Outcome::NotFound,
            Outcome::Done,
            Outcome::NotFound,
            Outcome::Value(3),
            Outcome::Value(4),
        ]
    );
}

#[test]
fn test_update_trace_miss_rate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("update.json");
    fs::write(
        &path,
        r#"[
            {"op": "new", "capacity": 2},
            {"op": "put", "key": 1, "value": 1},
            {"op": "put", "key": 1, "value": 2},
            {"op": "get", "key": 1}
        ]"#,
    )
    .unwrap();

    let report = replay(Limits::unrestricted(), &load_trace(&path).unwrap()).unwrap();

    assert_eq!(report.outputs[3], Outcome::Value(2));
    assert!((report.miss_rate - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.history, vec![100.0, 50.0, 100.0 / 3.0]);
}

#[test]
fn test_history_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");

    let file = fs::File::create(&path).unwrap();
    write_history_csv(file, &[100.0, 50.0, 100.0 / 3.0]).unwrap();

    let csv = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, vec!["op,miss_rate", "1,100.0000", "2,50.0000", "3,33.3333"]);
}

#[test]
fn test_missing_trace_file() {
    let dir = TempDir::new().unwrap();
    let err = load_trace(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("failed to read trace"));
}
