//! Shared output helpers

use serde::Serialize;
use shelfdex_core::db::BookSummary;
use shelfdex_core::error::Result;
use shelfdex_core::format::human_size;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line book rendering for listings
pub fn book_line(book: &BookSummary) -> String {
    let mut line = format!("{:>8}  {}", book.id, book.title);
    if !book.authors.is_empty() {
        line.push_str(&format!(" - {}", book.authors));
    }
    if let Some(series) = &book.series {
        match book.ser_no {
            Some(n) if n > 0 => line.push_str(&format!(" ({} #{})", series, n)),
            _ => line.push_str(&format!(" ({})", series)),
        }
    }
    line.push_str(&format!(
        " [{}, {}, {}]",
        if book.lang.is_empty() { "-" } else { &book.lang },
        book.format,
        human_size(book.size)
    ));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BookSummary {
        BookSummary {
            id: 7,
            title: "Foundation".to_string(),
            lang: "en".to_string(),
            archive: "fb2-000001.zip".to_string(),
            file_name: "101.fb2".to_string(),
            format: "fb2".to_string(),
            size: 2048,
            date_added: None,
            lib_id: 101,
            lib_rate: 0,
            series: Some("The Foundation".to_string()),
            ser_no: Some(1),
            authors: "Asimov Isaac".to_string(),
            genres: String::new(),
        }
    }

    #[test]
    fn test_book_line() {
        assert_eq!(
            book_line(&summary()),
            "       7  Foundation - Asimov Isaac (The Foundation #1) [en, fb2, 2.0 KB]"
        );
    }

    #[test]
    fn test_book_line_without_series_number() {
        let mut book = summary();
        book.ser_no = Some(0);
        book.authors.clear();
        book.lang.clear();
        assert_eq!(
            book_line(&book),
            "       7  Foundation (The Foundation) [-, fb2, 2.0 KB]"
        );
    }
}
