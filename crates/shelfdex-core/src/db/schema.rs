//! SQLite database schema for shelfdex

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Result of schema creation
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaCreateResult {
    /// Schema present and current
    Ok,
    /// Schema was (re)created from scratch; the catalog is empty
    Created,
}

const TABLES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    lang TEXT NOT NULL DEFAULT '',
    archive TEXT NOT NULL,
    file_name TEXT NOT NULL,
    format TEXT NOT NULL DEFAULT '',
    size INTEGER NOT NULL DEFAULT 0,
    date_added TEXT,
    lib_id INTEGER NOT NULL DEFAULT 0,
    lib_rate INTEGER NOT NULL DEFAULT 0,
    deleted INTEGER NOT NULL DEFAULT 0,
    UNIQUE (archive, file_name)
);

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    middle_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    UNIQUE (last_name, first_name, middle_name)
);

CREATE TABLE IF NOT EXISTS genres (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL DEFAULT '',
    translit TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS series (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS keywords (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS book_authors (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, author_id)
);

CREATE TABLE IF NOT EXISTS book_genres (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, genre_id)
);

CREATE TABLE IF NOT EXISTS book_series (
    book_id INTEGER PRIMARY KEY REFERENCES books(id) ON DELETE CASCADE,
    series_id INTEGER NOT NULL REFERENCES series(id) ON DELETE CASCADE,
    ser_no INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS book_keywords (
    book_id INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    keyword_id INTEGER NOT NULL REFERENCES keywords(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, keyword_id)
);

CREATE VIRTUAL TABLE IF NOT EXISTS books_fts USING fts5(
    title,
    author,
    series,
    genre,
    tokenize='unicode61 remove_diacritics 2'
);

CREATE TABLE IF NOT EXISTS index_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Indexes that carry no uniqueness and may be dropped during bulk import
pub const SECONDARY_INDEXES: &[(&str, &str)] = &[
    ("idx_books_title", "books(title COLLATE NOCASE)"),
    ("idx_books_lang", "books(lang)"),
    ("idx_authors_last_name", "authors(last_name COLLATE NOCASE)"),
    ("idx_series_name", "series(name COLLATE NOCASE)"),
    ("idx_book_authors_author", "book_authors(author_id)"),
    ("idx_book_genres_genre", "book_genres(genre_id)"),
    ("idx_book_series_series", "book_series(series_id, ser_no)"),
    ("idx_book_keywords_keyword", "book_keywords(keyword_id)"),
];

pub const FTS_MODE_KEY: &str = "fts_mode";

/// Search document field expressions; `{book}` is the book id reference
pub const AUTHOR_DOC_SQL: &str = "COALESCE((SELECT group_concat(trim(a.last_name || ' ' || a.first_name || ' ' || a.middle_name), ' ; ') \
     FROM book_authors ba JOIN authors a ON a.id = ba.author_id WHERE ba.book_id = {book}), '')";
pub const SERIES_DOC_SQL: &str = "COALESCE((SELECT s.name FROM book_series bs \
     JOIN series s ON s.id = bs.series_id WHERE bs.book_id = {book}), '')";
pub const GENRE_DOC_SQL: &str = "COALESCE((SELECT group_concat(g.code || ', ' || g.name || ', ' || g.translit, ' ; ') \
     FROM book_genres bg JOIN genres g ON g.id = bg.genre_id WHERE bg.book_id = {book}), '')";

pub fn doc_expr(template: &str, book: &str) -> String {
    template.replace("{book}", book)
}

pub fn create_index_sql(name: &str, target: &str) -> String {
    format!("CREATE INDEX IF NOT EXISTS {} ON {}", name, target)
}

/// Incremental search-document triggers, active only while
/// `index_meta.fts_mode` is `incremental`
fn triggers_sql() -> String {
    let incremental = format!(
        "(SELECT value FROM index_meta WHERE key = '{}') = 'incremental'",
        FTS_MODE_KEY
    );
    let refresh = |column: &str, template: &str, book: &str| {
        format!(
            "UPDATE books_fts SET {column} = {expr} WHERE rowid = {book};",
            expr = doc_expr(template, book)
        )
    };
    let link_triggers = |table: &str, column: &str, template: &str| {
        format!(
            "CREATE TRIGGER IF NOT EXISTS {table}_ai AFTER INSERT ON {table} WHEN {incremental}
             BEGIN {insert} END;
             CREATE TRIGGER IF NOT EXISTS {table}_ad AFTER DELETE ON {table} WHEN {incremental}
             BEGIN {delete} END;",
            insert = refresh(column, template, "NEW.book_id"),
            delete = refresh(column, template, "OLD.book_id"),
        )
    };

    format!(
        "CREATE TRIGGER IF NOT EXISTS books_ai AFTER INSERT ON books
         WHEN NEW.deleted = 0 AND {incremental}
         BEGIN
           INSERT INTO books_fts(rowid, title, author, series, genre) VALUES (NEW.id, NEW.title, '', '', '');
         END;
         CREATE TRIGGER IF NOT EXISTS books_au AFTER UPDATE OF title, deleted ON books WHEN {incremental}
         BEGIN
           DELETE FROM books_fts WHERE rowid = OLD.id;
           INSERT INTO books_fts(rowid, title, author, series, genre)
             SELECT NEW.id, NEW.title, {author}, {series}, {genre} WHERE NEW.deleted = 0;
         END;
         CREATE TRIGGER IF NOT EXISTS books_ad AFTER DELETE ON books WHEN {incremental}
         BEGIN
           DELETE FROM books_fts WHERE rowid = OLD.id;
         END;
         {authors}
         {series_links}
         {genres}
         CREATE TRIGGER IF NOT EXISTS genres_au AFTER UPDATE OF name, translit ON genres WHEN {incremental}
         BEGIN
           UPDATE books_fts SET genre = {genre_doc}
             WHERE rowid IN (SELECT book_id FROM book_genres WHERE genre_id = NEW.id);
         END;",
        author = doc_expr(AUTHOR_DOC_SQL, "NEW.id"),
        series = doc_expr(SERIES_DOC_SQL, "NEW.id"),
        genre = doc_expr(GENRE_DOC_SQL, "NEW.id"),
        authors = link_triggers("book_authors", "author", AUTHOR_DOC_SQL),
        series_links = link_triggers("book_series", "series", SERIES_DOC_SQL),
        genres = link_triggers("book_genres", "genre", GENRE_DOC_SQL),
        genre_doc = doc_expr(GENRE_DOC_SQL, "books_fts.rowid"),
    )
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    for table in [
        "book_keywords",
        "book_series",
        "book_genres",
        "book_authors",
        "keywords",
        "series",
        "genres",
        "authors",
        "books",
        "books_fts",
        "index_meta",
    ] {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
    }
    Ok(())
}

fn create_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(TABLES_SQL)?;
    for (name, target) in SECONDARY_INDEXES {
        conn.execute(&create_index_sql(name, target), [])?;
    }
    conn.execute_batch(&triggers_sql())?;
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('schema_version', ?1)",
        [&CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO index_meta (key, value) VALUES (?1, 'incremental')",
        [FTS_MODE_KEY],
    )?;
    Ok(())
}

pub fn create_schema(conn: &Connection) -> Result<SchemaCreateResult> {
    let current_version: Option<i32> = conn
        .query_row(
            "SELECT value FROM index_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok();

    let result = match current_version {
        None => {
            create_all(conn)?;
            SchemaCreateResult::Created
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => SchemaCreateResult::Ok,
        Some(v) => {
            drop_all_tables(conn)?;
            create_all(conn)?;
            tracing::warn!(
                "Database schema changed from version {} to {}; catalog must be re-ingested",
                v,
                CURRENT_SCHEMA_VERSION
            );
            SchemaCreateResult::Created
        }
    };

    Ok(result)
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}
