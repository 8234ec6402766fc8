use predicates::prelude::*;

use super::support::Library;

#[test]
fn test_show_book() {
    let library = Library::new();
    library.ingest();
    let id = library.book_id("empire");

    library
        .cmd()
        .args(["show", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foundation and Empire"))
        .stdout(predicate::str::contains("author:   Asimov Isaac"))
        .stdout(predicate::str::contains("series:   The Foundation #2"))
        .stdout(predicate::str::contains("[sf]"));
}

#[test]
fn test_show_missing_book_is_data_error() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .args(["show", "999999"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_show_missing_book_json_envelope() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .args(["--format", "json", "show", "999999"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"not_found\""));
}

#[test]
fn test_authors_by_prefix() {
    let library = Library::new();
    library.ingest();

    let authors = library.json(&["authors", "--prefix", "as"]);
    assert_eq!(authors.as_array().unwrap().len(), 1);
    assert_eq!(authors[0]["last_name"], "Asimov");
    assert_eq!(authors[0]["books"], 2);

    let cyrillic = library.json(&["authors", "--prefix", "лем"]);
    assert_eq!(cyrillic[0]["last_name"], "Лем");
}

#[test]
fn test_author_letters() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .args(["authors", "--letters"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A  1"))
        .stdout(predicate::str::contains("S  1"))
        .stdout(predicate::str::contains("Л  1"));
}

#[test]
fn test_books_by_series_in_order() {
    let library = Library::new();
    library.ingest();

    let series = library.json(&["series"]);
    let id = series[0]["id"].as_i64().unwrap();

    let books = library.json(&["books", "--series", &id.to_string()]);
    assert_eq!(books[0]["title"], "Foundation");
    assert_eq!(books[1]["title"], "Foundation and Empire");
}

#[test]
fn test_books_for_unknown_author_is_data_error() {
    let library = Library::new();
    library.ingest();

    library.cmd().args(["books", "--author", "999999"]).assert().code(3);
}

#[test]
fn test_genres_listing() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .arg("genres")
        .assert()
        .success()
        .stdout(predicate::str::contains("Социальная фантастика [sf_social] (1)"));
}

#[test]
fn test_stats() {
    let library = Library::new();
    library.ingest();

    let stats = library.json(&["stats"]);
    assert_eq!(stats["stats"]["books"], 4);
    assert_eq!(stats["stats"]["authors"], 3);
    assert_eq!(stats["stats"]["series"], 1);
    assert_eq!(stats["search_index"], "incremental");
}
