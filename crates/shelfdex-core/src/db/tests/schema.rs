use super::{count, temp_db, write};
use crate::db::schema::{force_set_schema_version, CURRENT_SCHEMA_VERSION};
use crate::db::*;
use crate::testutil::record;

#[test]
fn test_new_database_is_current() {
    let (_dir, db) = temp_db();
    assert_eq!(db.get_schema_version().unwrap(), CURRENT_SCHEMA_VERSION as i64);
    assert_eq!(db.search_index_mode().unwrap(), IndexMode::Incremental);
}

#[test]
fn test_reopen_keeps_catalog() {
    let (dir, db) = temp_db();
    write(&db, &[record("Solaris", ("Stanisław", "", "Lem"), "1")]);
    drop(db);

    let db = Database::open(&dir.path().join(DB_FILE)).unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM books"), 1);
}

#[test]
fn test_schema_version_mismatch_recreates() {
    let (dir, db) = temp_db();
    write(&db, &[record("Solaris", ("Stanisław", "", "Lem"), "1")]);
    force_set_schema_version(db.conn(), CURRENT_SCHEMA_VERSION + 1).unwrap();
    drop(db);

    let db = Database::open(&dir.path().join(DB_FILE)).unwrap();
    assert_eq!(db.get_schema_version().unwrap(), CURRENT_SCHEMA_VERSION as i64);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM books"), 0);
    assert_eq!(db.secondary_indexes().unwrap().len(), SECONDARY_INDEXES.len());
}
