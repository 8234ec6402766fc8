use predicates::prelude::*;

use super::support::Library;

#[test]
fn test_ingest_reports_counts() {
    let library = Library::new();

    library
        .cmd()
        .arg("ingest")
        .arg(library.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingested 4 records"))
        .stdout(predicate::str::contains("4 new, 0 updated"));
}

#[test]
fn test_ingest_json_report() {
    let library = Library::new();

    let report = library.json(&["ingest", library.root().to_str().unwrap(), "--batch-size", "1"]);

    assert_eq!(report["records_written"], 4);
    assert_eq!(report["batches_committed"], 4);
    assert_eq!(report["bulk"], true);
    assert_eq!(report["scan"]["containers"], 1);
}

#[test]
fn test_ingest_twice_updates_in_place() {
    let library = Library::new();
    library.ingest();

    let report = library.json(&["ingest", library.root().to_str().unwrap(), "--no-bulk"]);

    assert_eq!(report["books_inserted"], 0);
    assert_eq!(report["books_updated"], 4);
    assert_eq!(report["bulk"], false);
    assert_eq!(library.json(&["stats"])["stats"]["books"], 4);
}

#[test]
fn test_ingest_missing_root_is_data_error() {
    let library = Library::new();

    library
        .cmd()
        .args(["ingest", "/nonexistent/shelfdex/library"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("library root not found"));
}

#[test]
fn test_ingest_rejects_zero_batch_size() {
    let library = Library::new();

    library
        .cmd()
        .arg("ingest")
        .arg(library.root())
        .args(["--batch-size", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_reindex_counts_documents() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .arg("reindex")
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 4 books"));
}
