//! Fixture helpers shared by unit tests

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::inpx::{AuthorName, Record, SeriesRef};

/// Write an `.inpx` container with the given `(entry name, body)` pairs
pub fn write_inpx(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, body) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Create an empty file standing in for a content archive
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap();
}

/// Render an index line in the default field order
pub fn inp_line(
    author: &str,
    genre: &str,
    title: &str,
    series: &str,
    ser_no: i64,
    file: &str,
) -> String {
    let ser_no = ser_no.to_string();
    let author = format!("{}:", author);
    let genre = if genre.is_empty() {
        String::new()
    } else {
        format!("{}:", genre)
    };
    [
        author.as_str(),
        genre.as_str(),
        title,
        series,
        ser_no.as_str(),
        file,
        "1024",
        file,
        "0",
        "fb2",
        "2012-05-01",
        "ru",
        "0",
        "",
    ]
    .join("\x04")
}

/// A ready-to-write record
pub fn record(title: &str, author: (&str, &str, &str), file: &str) -> Record {
    Record {
        title: title.to_string(),
        authors: vec![AuthorName::new(author.0, author.1, author.2)],
        file_name: format!("{}.fb2", file),
        archive: "lib/fb2-000001.zip".to_string(),
        format: "fb2".to_string(),
        size: 1024,
        lang: "ru".to_string(),
        ..Record::default()
    }
}

pub fn with_series(mut record: Record, name: &str, number: i64) -> Record {
    record.series = Some(SeriesRef {
        name: name.to_string(),
        number,
    });
    record
}

pub fn with_genres(mut record: Record, genres: &[&str]) -> Record {
    record.genres = genres.iter().map(|g| g.to_string()).collect();
    record
}
