#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const OWNER: &str = "worker-1";

/// Three records in March 2024 (one still open), one in February and one
/// belonging to another worker.
pub const FIXTURE: &str = r#"{
  "locations": [
    {"id": "loc-a", "owner_id": "worker-1", "name": "Site A", "address": "Rua Augusta 1",
     "latitude": 38.7100, "longitude": -9.1366, "radius_m": 150},
    {"id": "loc-d", "owner_id": "worker-1", "name": "Depot",
     "latitude": 38.7500, "longitude": -9.2000, "radius_m": 80, "active": false}
  ],
  "records": [
    {"id": "r1", "owner_id": "worker-1", "location_id": "loc-a",
     "start": "2024-03-01T08:00:00Z", "end": "2024-03-01T16:30:00Z", "location_name": "Site A"},
    {"id": "r2", "owner_id": "worker-1", "location_id": "loc-d",
     "start": "2024-03-02T09:00:00Z", "end": "2024-03-02T12:00:00Z", "location_name": "Depot"},
    {"id": "r3", "owner_id": "worker-1", "location_id": "loc-a",
     "start": "2024-03-04T07:30:00Z", "end": null, "location_name": "Site A"},
    {"id": "r4", "owner_id": "worker-1", "location_id": null,
     "start": "2024-02-28T08:00:00Z", "end": "2024-02-28T10:00:00Z"},
    {"id": "x1", "owner_id": "worker-2", "location_id": null,
     "start": "2024-03-01T08:00:00Z", "end": "2024-03-01T09:00:00Z"}
  ]
}"#;

pub fn tk() -> Command {
    cargo_bin_cmd!("timekeeper")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timekeeper.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `tk --test --db <db> --owner worker-1 --tz utc <args...>`
pub fn tk_as_owner(db_path: &str, args: &[&str]) -> Command {
    let mut cmd = tk();
    cmd.args(["--test", "--db", db_path, "--owner", OWNER, "--tz", "utc"])
        .args(args);
    cmd
}

/// Initialize the DB and import the fixture.
pub fn init_db_with_data(name: &str) -> String {
    let db_path = setup_test_db(name);

    tk().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    let fixture = temp_out(name, "json");
    fs::write(&fixture, FIXTURE).expect("write fixture");

    tk_as_owner(&db_path, &["import", &fixture])
        .assert()
        .success();

    db_path
}
