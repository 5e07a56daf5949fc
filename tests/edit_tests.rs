use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_data, tk_as_owner};

#[test]
fn test_edit_start_keeps_first_original() {
    let db_path = init_db_with_data("edit_start_twice");

    tk_as_owner(&db_path, &["edit", "r1", "start", "08:15"])
        .assert()
        .success()
        .stdout(contains("2024-03-01 08:15  (original 2024-03-01 08:00)"));

    tk_as_owner(&db_path, &["edit", "r1", "start", "2024-03-01 08:10"])
        .assert()
        .success()
        .stdout(contains("2024-03-01 08:10  (original 2024-03-01 08:00)"));

    // 08:10 → 16:30 plus 09:00 → 12:00
    tk_as_owner(&db_path, &["stats", "--period", "2024-03"])
        .assert()
        .success()
        .stdout(contains("11h 20min").and(contains("1 edited")));
}

#[test]
fn test_edit_end_with_reason() {
    let db_path = init_db_with_data("edit_end_reason");

    tk_as_owner(
        &db_path,
        &["edit", "r2", "out", "2024-03-02T12:30:00Z", "--reason", "forgot to clock out"],
    )
    .assert()
    .success()
    .stdout(contains("original 2024-03-02 12:00").and(contains("forgot to clock out")));

    tk_as_owner(&db_path, &["log", "--print"])
        .assert()
        .success()
        .stdout(contains("forgot to clock out"));
}

#[test]
fn test_edit_request_id_replay() {
    let db_path = init_db_with_data("edit_replay");
    let args = ["edit", "r1", "end", "17:00", "--request-id", "req-42"];

    tk_as_owner(&db_path, &args).assert().success();
    tk_as_owner(&db_path, &args).assert().success();

    tk_as_owner(&db_path, &["edit", "r1", "end", "17:05", "--request-id", "req-42"])
        .assert()
        .failure()
        .stderr(contains("req-42"));
}

#[test]
fn test_edit_rejects_bad_input() {
    let db_path = init_db_with_data("edit_bad_input");

    tk_as_owner(&db_path, &["edit", "r1", "lunch", "12:00"])
        .assert()
        .failure()
        .stderr(contains("Invalid field 'lunch'"));

    tk_as_owner(&db_path, &["edit", "r1", "start", ""])
        .assert()
        .failure()
        .stderr(contains("Missing value for field 'start'"));

    tk_as_owner(&db_path, &["edit", "r1", "start", "yesterday"])
        .assert()
        .failure()
        .stderr(contains("Invalid timestamp"));

    tk_as_owner(&db_path, &["edit", "r1", "end", "07:00"])
        .assert()
        .failure()
        .stderr(contains("must be after clock-in"));

    tk_as_owner(&db_path, &["edit", "r3", "end", "17:00"])
        .assert()
        .failure()
        .stderr(contains("still in progress"));
}

#[test]
fn test_edit_unknown_or_foreign_record() {
    let db_path = init_db_with_data("edit_not_found");

    tk_as_owner(&db_path, &["edit", "nope", "start", "2024-03-01T08:00:00Z"])
        .assert()
        .failure()
        .stderr(contains("Record not found: nope"));

    // x1 exists but belongs to worker-2
    tk_as_owner(&db_path, &["edit", "x1", "start", "2024-03-01T08:05:00Z"])
        .assert()
        .failure()
        .stderr(contains("Record not found: x1"));
}
