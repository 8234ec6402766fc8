//! Unicode case folding exposed to SQL
//!
//! SQLite's `lower()` and `NOCASE` fold ASCII only; `fold_case(text)` applies
//! full Unicode lowercasing so Cyrillic and mixed-case names compare equal.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::error::Result;
use crate::map_db_err;

pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Register `fold_case` on a connection; NULL stays NULL
pub(crate) fn register(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|t| fold_case(&t)))
        },
    )
    .map_err(|e| map_db_err!("register fold_case", e))?;
    Ok(())
}
