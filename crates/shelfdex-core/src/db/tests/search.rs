use super::{temp_db, write};
use crate::db::*;
use crate::error::ShelfdexError;
use crate::testutil::{record, with_genres, with_series};

fn titles(results: &[BookSummary]) -> Vec<&str> {
    results.iter().map(|b| b.title.as_str()).collect()
}

fn asimov_catalog(db: &Database) {
    write(
        db,
        &[
            with_series(
                record("Foundation", ("Isaac", "", "Asimov"), "1"),
                "The Foundation",
                1,
            ),
            with_series(
                record("Foundation's Edge", ("Isaac", "", "Asimov"), "2"),
                "The Foundation",
                4,
            ),
            with_genres(
                record("Solaris", ("Stanisław", "", "Lem"), "3"),
                &["sf_detective"],
            ),
        ],
    );
}

#[test]
fn test_empty_query_returns_nothing() {
    let (_dir, db) = temp_db();
    asimov_catalog(&db);

    assert!(db.search(&SearchQuery::new(""), "ru").unwrap().is_empty());
    assert!(db.search(&SearchQuery::new("  \t"), "ru").unwrap().is_empty());
    assert!(db.search(&SearchQuery::new("\"*()"), "ru").unwrap().is_empty());
}

#[test]
fn test_zero_limit_is_invalid() {
    let (_dir, db) = temp_db();
    let mut query = SearchQuery::new("foundation");
    query.limit = 0;

    let err = db.search(&query, "ru").unwrap_err();
    assert!(matches!(err, ShelfdexError::InvalidValue { .. }));
}

#[test]
fn test_incremental_index_follows_writes() {
    let (_dir, db) = temp_db();
    assert_eq!(db.search_index_mode().unwrap(), IndexMode::Incremental);
    asimov_catalog(&db);

    // Unscoped: matches the author field
    let results = db.search(&SearchQuery::new("asimov"), "ru").unwrap();
    assert_eq!(titles(&results), vec!["Foundation", "Foundation's Edge"]);
    assert_eq!(results[0].authors, "Asimov Isaac");
    assert_eq!(results[0].series.as_deref(), Some("The Foundation"));
    assert_eq!(results[1].ser_no, Some(4));

    // Trailing term is a prefix
    let results = db.search(&SearchQuery::new("found"), "ru").unwrap();
    assert_eq!(results.len(), 2);
}

fn hits(db: &Database, text: &str, field: SearchField) -> usize {
    let query = SearchQuery::new(text).in_fields(&[field]);
    db.search(&query, "ru").unwrap().len()
}

#[test]
fn test_incremental_index_follows_relinking_and_soft_delete() {
    let (_dir, db) = temp_db();
    let solaris = |author: (&str, &str, &str), series: &str, genre: &str| {
        with_genres(with_series(record("Solaris", author, "3"), series, 1), &[genre])
    };

    write(&db, &[solaris(("Stanisław", "", "Lem"), "Lem Collected", "sf_detective")]);
    assert_eq!(hits(&db, "lem", SearchField::Author), 1);

    // Same natural key: links are replaced, documents follow
    let outcome = write(&db, &[solaris(("Philip", "K", "Dick"), "Dick Novels", "sf_cyberpunk")]);
    assert_eq!(outcome.updated, 1);

    assert_eq!(hits(&db, "lem", SearchField::Author), 0);
    assert_eq!(hits(&db, "dick", SearchField::Author), 1);
    assert_eq!(hits(&db, "collected", SearchField::Series), 0);
    assert_eq!(hits(&db, "novels", SearchField::Series), 1);
    assert_eq!(hits(&db, "detektivnaya", SearchField::Genre), 0);
    assert_eq!(hits(&db, "kiberpank", SearchField::Genre), 1);

    let mut deleted = solaris(("Philip", "K", "Dick"), "Dick Novels", "sf_cyberpunk");
    deleted.deleted = true;
    write(&db, &[deleted.clone()]);
    assert_eq!(hits(&db, "solaris", SearchField::Title), 0);
    assert_eq!(hits(&db, "dick", SearchField::Author), 0);

    deleted.deleted = false;
    write(&db, &[deleted]);
    assert_eq!(hits(&db, "solaris", SearchField::Title), 1);
    assert_eq!(hits(&db, "dick", SearchField::Author), 1);
    assert_eq!(hits(&db, "kiberpank", SearchField::Genre), 1);
}

#[test]
fn test_field_scope_restricts_match() {
    let (_dir, db) = temp_db();
    asimov_catalog(&db);

    let by_title = SearchQuery::new("asimov").in_fields(&[SearchField::Title]);
    assert!(db.search(&by_title, "ru").unwrap().is_empty());

    let either = SearchQuery::new("asimov").in_fields(&[SearchField::Title, SearchField::Author]);
    assert_eq!(db.search(&either, "ru").unwrap().len(), 2);
}

#[test]
fn test_genre_scope_matches_transliteration() {
    let (_dir, db) = temp_db();
    asimov_catalog(&db);

    let query = SearchQuery::new("Detektivnaya").in_fields(&[SearchField::Genre]);
    let results = db.search(&query, "ru").unwrap();
    assert_eq!(titles(&results), vec!["Solaris"]);
    assert_eq!(results[0].genres, "Детективная фантастика");

    let wrong_field = SearchQuery::new("Detektivnaya").in_fields(&[SearchField::Title]);
    assert!(db.search(&wrong_field, "ru").unwrap().is_empty());
}

#[test]
fn test_empty_language_counts_as_default() {
    let (_dir, db) = temp_db();
    let mut unset = record("Dune", ("Frank", "", "Herbert"), "1");
    unset.lang = String::new();
    let mut english = record("Dune Messiah", ("Frank", "", "Herbert"), "2");
    english.lang = "en".to_string();
    write(&db, &[unset, english]);

    let russian = SearchQuery::new("herbert").in_languages(&["ru"]);
    assert_eq!(titles(&db.search(&russian, "ru").unwrap()), vec!["Dune"]);

    let both = SearchQuery::new("herbert").in_languages(&["RU", "en"]);
    assert_eq!(db.search(&both, "ru").unwrap().len(), 2);

    let english_only = SearchQuery::new("herbert").in_languages(&["en"]);
    assert_eq!(titles(&db.search(&english_only, "ru").unwrap()), vec!["Dune Messiah"]);
}

#[test]
fn test_soft_deleted_books_are_not_found() {
    let (_dir, db) = temp_db();
    let mut gone = record("Vanished", ("Ghost", "", "Writer"), "1");
    gone.deleted = true;
    write(&db, &[gone]);

    assert!(db.search(&SearchQuery::new("vanished"), "ru").unwrap().is_empty());
    db.rebuild_search_index().unwrap();
    assert!(db.search(&SearchQuery::new("writer"), "ru").unwrap().is_empty());
}

#[test]
fn test_rebuild_converges_after_suspension() {
    let (_dir, db) = temp_db();
    db.suspend_search_index().unwrap();
    asimov_catalog(&db);

    assert_eq!(db.search_index_mode().unwrap(), IndexMode::Suspended);
    assert!(db.search(&SearchQuery::new("asimov"), "ru").unwrap().is_empty());

    let documents = db.rebuild_search_index().unwrap();
    assert_eq!(documents, 3);
    assert_eq!(db.search_index_mode().unwrap(), IndexMode::Incremental);

    for term in [
        "Foundation's Edge",
        "Asimov",
        "The Foundation",
        "Детективная",
        "fantastika",
        "sf_detective",
        "Solaris",
    ] {
        let results = db.search(&SearchQuery::new(term), "ru").unwrap();
        assert!(!results.is_empty(), "no match for {:?}", term);
    }
}

#[test]
fn test_pagination() {
    let (_dir, db) = temp_db();
    asimov_catalog(&db);

    let mut query = SearchQuery::new("foundation");
    query.limit = 1;
    let first = db.search(&query, "ru").unwrap();
    query.offset = 1;
    let second = db.search(&query, "ru").unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first[0].id, second[0].id);
}
