use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub fn shelfdex() -> Command {
    cargo_bin_cmd!("shelfdex")
}

/// Index line in the default field order
pub fn inp_line(
    author: &str,
    genre: &str,
    title: &str,
    series: &str,
    ser_no: u32,
    file: &str,
) -> String {
    let author = format!("{}:", author);
    let genre = format!("{}:", genre);
    let ser_no = ser_no.to_string();
    [
        author.as_str(),
        genre.as_str(),
        title,
        series,
        ser_no.as_str(),
        file,
        "2048",
        file,
        "0",
        "fb2",
        "2015-03-14",
        "ru",
        "0",
        "",
    ]
    .join("\x04")
}

/// A library directory with one `.inpx` container and its archives,
/// plus a database path beside it
pub struct Library {
    dir: TempDir,
}

impl Library {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let library = Self { dir };

        let first = [
            inp_line("Asimov,Isaac,", "sf", "Foundation", "The Foundation", 1, "101"),
            inp_line("Asimov,Isaac,", "sf", "Foundation and Empire", "The Foundation", 2, "102"),
            inp_line("Лем,Станислав,", "sf_detective", "Солярис", "", 0, "103"),
        ]
        .join("\r\n");
        let second = inp_line("Strugatsky,Arkady,", "sf_social", "Roadside Picnic", "", 0, "201");
        library.write_inpx(&[("fb2-000001.inp", &first), ("fb2-000002.inp", &second)]);
        library.touch("fb2-000001.zip");
        library.touch("fb2-000002.zip");
        library
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("library")
    }

    pub fn db(&self) -> PathBuf {
        self.dir.path().join("catalog.db")
    }

    fn write_inpx(&self, entries: &[(&str, &String)]) {
        fs::create_dir_all(self.root()).unwrap();
        let file = File::create(self.root().join("library.inpx")).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    fn touch(&self, name: &str) {
        File::create(self.root().join(name)).unwrap();
    }

    /// `shelfdex --db <catalog>` with further arguments to follow
    pub fn cmd(&self) -> Command {
        let mut cmd = shelfdex();
        cmd.arg("--db").arg(self.db());
        cmd
    }

    pub fn ingest(&self) {
        self.cmd().arg("ingest").arg(self.root()).assert().success();
    }

    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.cmd().args(["--format", "json"]).args(args).output().unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// ID of the first search hit for `text`
    pub fn book_id(&self, text: &str) -> i64 {
        self.json(&["search", text])[0]["id"].as_i64().unwrap()
    }
}
