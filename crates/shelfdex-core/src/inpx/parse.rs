//! `.inp` line parser

use chrono::NaiveDate;

use super::{AuthorName, Record, SeriesRef};
use crate::error::{Result, ShelfdexError};

/// Separates fields of one line
pub const FIELD_SEPARATOR: char = '\x04';
/// Separates authors and genres within a field
pub const LIST_SEPARATOR: char = ':';
/// Separates the parts of one author
pub const ITEM_SEPARATOR: char = ',';

/// A known `.inp` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Author,
    Genre,
    Title,
    Series,
    SerNo,
    File,
    Size,
    LibId,
    Del,
    Ext,
    Date,
    Lang,
    LibRate,
    Keywords,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "AUTHOR" => Some(Field::Author),
            "GENRE" => Some(Field::Genre),
            "TITLE" => Some(Field::Title),
            "SERIES" => Some(Field::Series),
            "SERNO" => Some(Field::SerNo),
            "FILE" => Some(Field::File),
            "SIZE" => Some(Field::Size),
            "LIBID" => Some(Field::LibId),
            "DEL" => Some(Field::Del),
            "EXT" => Some(Field::Ext),
            "DATE" => Some(Field::Date),
            "LANG" => Some(Field::Lang),
            "LIBRATE" => Some(Field::LibRate),
            "KEYWORDS" => Some(Field::Keywords),
            _ => None,
        }
    }
}

/// Field order of the lines in an index stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<Option<Field>>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        use Field::*;
        Self {
            fields: [
                Author, Genre, Title, Series, SerNo, File, Size, LibId, Del, Ext, Date, Lang,
                LibRate, Keywords,
            ]
            .into_iter()
            .map(Some)
            .collect(),
        }
    }
}

impl FieldSchema {
    /// Parse a `structure.info` body such as `AUTHOR;GENRE;TITLE;...`
    ///
    /// Unknown names keep their position but are ignored when reading lines.
    pub fn from_structure(structure: &str) -> Option<Self> {
        let fields: Vec<Option<Field>> = structure
            .trim()
            .trim_end_matches(';')
            .split(';')
            .map(Field::from_name)
            .collect();

        if fields.iter().any(|f| *f == Some(Field::Title)) {
            Some(Self { fields })
        } else {
            None
        }
    }
}

/// Parse one index line into a record.
///
/// Numeric fields are lenient: a value that does not parse reads as zero.
/// A line without a single field separator is malformed.
pub fn parse_line(line: &str, schema: &FieldSchema) -> Result<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !line.contains(FIELD_SEPARATOR) {
        return Err(ShelfdexError::invalid_value("index line", truncate(line)));
    }

    let mut record = Record::default();
    let mut series_name = String::new();
    let mut series_number = 0;
    let mut ext = String::new();

    for (field, raw) in schema.fields.iter().zip(line.split(FIELD_SEPARATOR)) {
        let Some(field) = field else { continue };
        let raw = raw.trim();
        match field {
            Field::Author => record.authors = parse_authors(raw),
            Field::Genre => record.genres = split_list(raw),
            Field::Title => record.title = raw.to_string(),
            Field::Series => series_name = raw.to_string(),
            Field::SerNo => series_number = parse_int(raw),
            Field::File => record.file_name = raw.to_string(),
            Field::Size => record.size = parse_int(raw),
            Field::LibId => record.lib_id = parse_int(raw),
            Field::Del => record.deleted = parse_int(raw) == 1,
            Field::Ext => ext = raw.to_string(),
            Field::Date => record.date_added = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok(),
            Field::Lang => record.lang = raw.to_lowercase(),
            Field::LibRate => record.lib_rate = parse_int(raw),
            Field::Keywords => record.keywords = parse_keywords(raw),
        }
    }

    if !ext.is_empty() {
        record.file_name = format!("{}.{}", record.file_name, ext);
    }
    record.format = ext;

    if !series_name.is_empty() {
        record.series = Some(SeriesRef {
            name: series_name,
            number: series_number,
        });
    }

    Ok(record)
}

fn parse_int(raw: &str) -> i64 {
    raw.parse().unwrap_or(0)
}

/// Split an outer list, trimming one trailing separator first
fn split_list(raw: &str) -> Vec<String> {
    let raw = raw.strip_suffix(LIST_SEPARATOR).unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Authors are `last,first,middle` items; items with fewer parts are dropped
fn parse_authors(raw: &str) -> Vec<AuthorName> {
    split_list(raw)
        .iter()
        .filter_map(|item| {
            let parts: Vec<&str> = item.split(ITEM_SEPARATOR).map(str::trim).collect();
            if parts.len() < 3 {
                return None;
            }
            let author = AuthorName::new(parts[1], parts[2], parts[0]);
            (author != AuthorName::default()).then_some(author)
        })
        .collect()
}

/// Keywords are comma separated, or whitespace separated when no comma appears
fn parse_keywords(raw: &str) -> Vec<String> {
    let words: Vec<&str> = if raw.contains(',') {
        raw.split(',').collect()
    } else {
        raw.split_whitespace().collect()
    };
    words
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn truncate(line: &str) -> String {
    line.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(fields: &[&str]) -> String {
        fields.join("\x04")
    }

    #[test]
    fn test_parse_full_line() {
        let raw = line(&[
            "Asimov,Isaac,:Silverberg,Robert,:",
            "sf:sf_detective:",
            "Foundation",
            "The Foundation",
            "1",
            "12345",
            "524288",
            "12345",
            "0",
            "fb2",
            "2010-03-14",
            "EN",
            "5",
            "robots, empire",
        ]);
        let record = parse_line(&raw, &FieldSchema::default()).unwrap();

        assert_eq!(record.title, "Foundation");
        assert_eq!(
            record.authors,
            vec![
                AuthorName::new("Isaac", "", "Asimov"),
                AuthorName::new("Robert", "", "Silverberg"),
            ]
        );
        assert_eq!(record.genres, vec!["sf", "sf_detective"]);
        assert_eq!(
            record.series,
            Some(SeriesRef {
                name: "The Foundation".to_string(),
                number: 1
            })
        );
        assert_eq!(record.file_name, "12345.fb2");
        assert_eq!(record.format, "fb2");
        assert_eq!(record.size, 524288);
        assert_eq!(record.lib_id, 12345);
        assert!(!record.deleted);
        assert_eq!(record.date_added, NaiveDate::from_ymd_opt(2010, 3, 14));
        assert_eq!(record.lang, "en");
        assert_eq!(record.lib_rate, 5);
        assert_eq!(record.keywords, vec!["robots", "empire"]);
    }

    #[test]
    fn test_short_author_entries_dropped() {
        let raw = line(&["Anonymous:Asimov,Isaac,:", "", "Title"]);
        let record = parse_line(&raw, &FieldSchema::default()).unwrap();
        assert_eq!(record.authors, vec![AuthorName::new("Isaac", "", "Asimov")]);
    }

    #[test]
    fn test_empty_lists_are_not_errors() {
        let raw = line(&["", "", "Untitled", "", "", "1"]);
        let record = parse_line(&raw, &FieldSchema::default()).unwrap();
        assert!(record.authors.is_empty());
        assert!(record.genres.is_empty());
        assert!(record.keywords.is_empty());
        assert!(record.series.is_none());
    }

    #[test]
    fn test_lenient_numbers_and_missing_fields() {
        let raw = line(&["", "", "Title", "Saga", "x", "f", "big", "?", "yes"]);
        let record = parse_line(&raw, &FieldSchema::default()).unwrap();
        assert_eq!(record.series.unwrap().number, 0);
        assert_eq!(record.size, 0);
        assert_eq!(record.lib_id, 0);
        assert!(!record.deleted);
        assert_eq!(record.file_name, "f");
        assert!(record.date_added.is_none());
    }

    #[test]
    fn test_deleted_flag() {
        let mut fields = vec![""; 14];
        fields[2] = "Gone";
        fields[8] = "1";
        let record = parse_line(&line(&fields), &FieldSchema::default()).unwrap();
        assert!(record.deleted);

        fields[8] = "2";
        let record = parse_line(&line(&fields), &FieldSchema::default()).unwrap();
        assert!(!record.deleted);
    }

    #[test]
    fn test_keywords_whitespace_separated() {
        let mut fields = vec![""; 14];
        fields[2] = "T";
        fields[13] = "space  opera\tclassic";
        let record = parse_line(&line(&fields), &FieldSchema::default()).unwrap();
        assert_eq!(record.keywords, vec!["space", "opera", "classic"]);

        fields[13] = "space opera, classic";
        let record = parse_line(&line(&fields), &FieldSchema::default()).unwrap();
        assert_eq!(record.keywords, vec!["space opera", "classic"]);
    }

    #[test]
    fn test_line_without_separator_is_malformed() {
        let err = parse_line("just some text", &FieldSchema::default()).unwrap_err();
        assert!(matches!(err, ShelfdexError::InvalidValue { .. }));
    }

    #[test]
    fn test_trailing_carriage_return() {
        let raw = format!("{}\r", line(&["", "", "Title", "", "", "f", "", "", "", "fb2"]));
        let record = parse_line(&raw, &FieldSchema::default()).unwrap();
        assert_eq!(record.file_name, "f.fb2");
    }

    #[test]
    fn test_structure_info_reorders_fields() {
        let schema = FieldSchema::from_structure("TITLE;AUTHOR;FOLDER;FILE;EXT;").unwrap();
        let raw = line(&["Solaris", "Lem,Stanislaw,:", "ignored", "99", "epub"]);
        let record = parse_line(&raw, &schema).unwrap();
        assert_eq!(record.title, "Solaris");
        assert_eq!(record.authors, vec![AuthorName::new("Stanislaw", "", "Lem")]);
        assert_eq!(record.file_name, "99.epub");
    }

    #[test]
    fn test_structure_without_title_rejected() {
        assert!(FieldSchema::from_structure("AUTHOR;GENRE").is_none());
    }
}
