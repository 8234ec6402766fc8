use predicates::prelude::*;

use super::support::Library;

#[test]
fn test_search_by_author() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .args(["search", "asimov"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foundation - Asimov Isaac (The Foundation #1)"))
        .stdout(predicate::str::contains("Foundation and Empire"))
        .stdout(predicate::str::contains("Roadside Picnic").not());
}

#[test]
fn test_search_prefix_of_last_term() {
    let library = Library::new();
    library.ingest();

    let hits = library.json(&["search", "roadside pic"]);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["title"], "Roadside Picnic");
}

#[test]
fn test_search_field_scope() {
    let library = Library::new();
    library.ingest();

    // "Foundation" is both a title and a series name
    let by_series = library.json(&["search", "foundation", "--field", "series"]);
    assert_eq!(by_series.as_array().unwrap().len(), 2);

    let by_author = library.json(&["search", "foundation", "--field", "author"]);
    assert!(by_author.as_array().unwrap().is_empty());
}

#[test]
fn test_search_cyrillic_and_genre_name() {
    let library = Library::new();
    library.ingest();

    assert_eq!(library.json(&["search", "солярис"])[0]["title"], "Солярис");
    let by_genre = library.json(&["search", "детективная", "--field", "genre"]);
    assert_eq!(by_genre.as_array().unwrap().len(), 1);
}

#[test]
fn test_search_language_filter() {
    let library = Library::new();
    library.ingest();

    assert_eq!(library.json(&["search", "asimov", "--lang", "RU"]).as_array().unwrap().len(), 2);
    assert!(library.json(&["search", "asimov", "--lang", "en"]).as_array().unwrap().is_empty());
}

#[test]
fn test_search_limit_and_offset() {
    let library = Library::new();
    library.ingest();

    let first = library.json(&["search", "foundation", "--limit", "1"]);
    let second = library.json(&["search", "foundation", "--limit", "1", "--offset", "1"]);
    assert_eq!(first.as_array().unwrap().len(), 1);
    assert_eq!(second.as_array().unwrap().len(), 1);
    assert_ne!(first[0]["id"], second[0]["id"]);
}

#[test]
fn test_search_zero_limit_is_usage_error() {
    let library = Library::new();
    library.ingest();

    library.cmd().args(["search", "asimov", "--limit", "0"]).assert().code(2);
}

#[test]
fn test_search_punctuation_only_is_empty() {
    let library = Library::new();
    library.ingest();

    library
        .cmd()
        .args(["search", "\"*()"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results"));
}
