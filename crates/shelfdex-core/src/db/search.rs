//! Ranked full-text search over book search documents

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::read::{summary_from_row, SUMMARY_COLUMNS, SUMMARY_JOINS};
use super::{BookSummary, Database};
use crate::error::{Result, ShelfdexError};

/// Search document fields a query can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Series,
    Genre,
}

impl SearchField {
    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Series => "series",
            SearchField::Genre => "genre",
        }
    }
}

impl FromStr for SearchField {
    type Err = ShelfdexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "series" => Ok(SearchField::Series),
            "genre" => Ok(SearchField::Genre),
            other => Err(ShelfdexError::invalid_value("search field", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Empty means every field
    pub fields: Vec<SearchField>,
    /// Empty means every language
    pub languages: Vec<String>,
    pub limit: usize,
    pub offset: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: Vec::new(),
            languages: Vec::new(),
            limit: crate::config::DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }

    pub fn in_fields(mut self, fields: &[SearchField]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    pub fn in_languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_lowercase()).collect();
        self
    }
}

fn special_chars() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(r"[^\p{L}\p{N}\s_]+") {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to compile query sanitizer regex");
            None
        }
    })
    .as_ref()
}

/// Reduce free text to plain terms: query-syntax characters become
/// whitespace and runs of whitespace collapse. `None` when nothing is left.
pub fn sanitize_query(text: &str) -> Option<String> {
    let stripped: String = match special_chars() {
        Some(re) => re.replace_all(text, " ").into_owned(),
        None => text
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
            .collect(),
    };
    let terms: Vec<&str> = stripped.split_whitespace().collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

/// FTS5 expression for sanitized terms: every term quoted, the last one a
/// prefix match, optionally restricted to a column set
fn match_expression(sanitized: &str, fields: &[SearchField]) -> String {
    let terms: Vec<&str> = sanitized.split(' ').collect();
    let last = terms.len() - 1;
    let expr = terms
        .iter()
        .enumerate()
        .map(|(i, term)| {
            if i == last {
                format!("\"{}\"*", term)
            } else {
                format!("\"{}\"", term)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if fields.is_empty() {
        return expr;
    }

    let mut columns: Vec<&str> = fields.iter().map(|f| f.column()).collect();
    columns.sort_unstable();
    columns.dedup();
    format!("{{{}}} : ({})", columns.join(" "), expr)
}

impl Database {
    /// Ranked search. Books without a language count as `default_language`.
    #[tracing::instrument(skip(self), fields(text = %query.text))]
    pub fn search(&self, query: &SearchQuery, default_language: &str) -> Result<Vec<BookSummary>> {
        if query.limit == 0 {
            crate::bail_invalid!("limit", 0);
        }
        let Some(sanitized) = sanitize_query(&query.text) else {
            return Ok(Vec::new());
        };

        let mut params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(match_expression(&sanitized, &query.fields))];

        let mut lang_clause = String::new();
        if !query.languages.is_empty() {
            lang_clause = format!(
                " AND COALESCE(NULLIF(b.lang, ''), ?) IN ({})",
                vec!["?"; query.languages.len()].join(", ")
            );
            params.push(Box::new(default_language.to_lowercase()));
            for lang in &query.languages {
                params.push(Box::new(lang.clone()));
            }
        }
        params.push(Box::new(query.limit as i64));
        params.push(Box::new(query.offset as i64));

        let sql = format!(
            "SELECT {}, bm25(books_fts) AS rank
             FROM books_fts JOIN books b ON b.id = books_fts.rowid {}
             WHERE books_fts MATCH ? AND b.deleted = 0{}
             ORDER BY rank, authors COLLATE NOCASE, s.name COLLATE NOCASE, bs.ser_no,
                      b.title COLLATE NOCASE
             LIMIT ? OFFSET ?",
            SUMMARY_COLUMNS, SUMMARY_JOINS, lang_clause
        );

        let mut stmt = self.conn().prepare(&sql).map_err(|e| {
            ShelfdexError::Store(format!(
                "failed to prepare search query for '{}': {}",
                query.text, e
            ))
        })?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let results = stmt
            .query_map(param_refs.as_slice(), summary_from_row)
            .map_err(|e| {
                ShelfdexError::Store(format!(
                    "failed to execute search query for '{}': {}",
                    query.text, e
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(results = results.len(), "search complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_collapses_and_strips() {
        assert_eq!(
            sanitize_query("  \"foo\"  bar*(baz) ").as_deref(),
            Some("foo bar baz")
        );
        assert_eq!(sanitize_query("Foundation's Edge").as_deref(), Some("Foundation s Edge"));
        assert_eq!(sanitize_query("Мастер и Маргарита").as_deref(), Some("Мастер и Маргарита"));
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_query(""), None);
        assert_eq!(sanitize_query("   \t "), None);
        assert_eq!(sanitize_query("*:^\"()"), None);
    }

    #[test]
    fn test_match_expression_unscoped() {
        assert_eq!(match_expression("isaac asim", &[]), "\"isaac\" \"asim\"*");
    }

    #[test]
    fn test_match_expression_scoped() {
        assert_eq!(
            match_expression(
                "detek",
                &[SearchField::Title, SearchField::Genre, SearchField::Title]
            ),
            "{genre title} : (\"detek\"*)"
        );
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("Author".parse::<SearchField>().unwrap(), SearchField::Author);
        assert!("body".parse::<SearchField>().is_err());
    }
}
