mod schema;
mod search;

use tempfile::TempDir;

use crate::config::{IdAssignment, DEFAULT_MAX_PARAMS};
use crate::db::*;
use crate::inpx::Record;

pub(super) fn temp_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join(DB_FILE)).unwrap();
    (dir, db)
}

pub(super) fn write(db: &Database, records: &[Record]) -> BatchOutcome {
    let caches = EntityCaches::new();
    let options = WriterOptions {
        max_params: DEFAULT_MAX_PARAMS,
        id_assignment: IdAssignment::Contiguous,
    };
    BatchWriter::new(db, &caches, options)
        .write_batch(records)
        .unwrap()
}

pub(super) fn count(db: &Database, sql: &str) -> i64 {
    db.conn().query_row(sql, [], |row| row.get(0)).unwrap()
}

pub(super) fn book_id(db: &Database, title: &str) -> i64 {
    db.conn()
        .query_row("SELECT id FROM books WHERE title = ?1", [title], |row| row.get(0))
        .unwrap()
}
