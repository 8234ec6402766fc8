//! Archive index scanner
//!
//! Walks a library tree once, opens every `.inpx` container and streams the
//! records of each `.inp` stream whose content archive exists on disk.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crossbeam::channel::Sender;
use crossbeam::select;
use walkdir::WalkDir;
use zip::ZipArchive;

use super::{parse_line, FieldSchema, Record, INDEX_EXTENSION, STREAM_EXTENSION};
use crate::cancel::CancelToken;
use crate::error::{Result, ShelfdexError};
use crate::trace_time;

const STRUCTURE_ENTRY: &str = "structure.info";

/// Files found by one walk of the library tree
#[derive(Debug, Default)]
pub struct Discovery {
    pub containers: Vec<PathBuf>,
    pub archives: HashSet<PathBuf>,
}

/// Counters reported when a scan ends
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScanSummary {
    pub containers: usize,
    pub streams: usize,
    pub streams_skipped: usize,
    pub records: usize,
    pub malformed: usize,
    pub untitled: usize,
    /// Cancelled, or the consumer went away before the scan finished
    pub stopped_early: bool,
}

enum Flow {
    Continue,
    Stop,
}

/// Producer half of the ingest pipeline
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    archive_extensions: Vec<String>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, archive_extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            archive_extensions: archive_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Enumerate the tree once, classifying files by extension
    pub fn discover(&self) -> Result<Discovery> {
        if !self.root.is_dir() {
            return Err(ShelfdexError::LibraryNotFound(self.root.clone()));
        }

        let mut discovery = Discovery::default();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
                continue;
            };
            let ext = ext.to_lowercase();
            if ext == INDEX_EXTENSION {
                discovery.containers.push(entry.path().to_path_buf());
            } else if self.archive_extensions.contains(&ext) {
                discovery.archives.insert(entry.path().to_path_buf());
            }
        }
        discovery.containers.sort();

        tracing::debug!(
            containers = discovery.containers.len(),
            archives = discovery.archives.len(),
            "Library discovered"
        );
        Ok(discovery)
    }

    /// Scan every container, publishing records on `tx`.
    ///
    /// `tx` is dropped on return, which closes the channel for the consumer.
    #[tracing::instrument(skip_all, fields(root = %self.root.display()))]
    pub fn run(&self, tx: Sender<Record>, cancel: &CancelToken) -> Result<ScanSummary> {
        let start = Instant::now();
        let discovery = self.discover()?;
        let mut summary = ScanSummary::default();

        for container in &discovery.containers {
            summary.containers += 1;
            let flow =
                self.scan_container(container, &discovery.archives, &tx, cancel, &mut summary)?;
            if let Flow::Stop = flow {
                summary.stopped_early = true;
                tracing::info!(container = %container.display(), "Scan stopped early");
                break;
            }
        }

        trace_time!(start, "scan", records = summary.records);
        tracing::info!(
            containers = summary.containers,
            streams = summary.streams,
            skipped = summary.streams_skipped,
            records = summary.records,
            malformed = summary.malformed,
            "Scan finished"
        );
        Ok(summary)
    }

    fn scan_container(
        &self,
        path: &Path,
        archives: &HashSet<PathBuf>,
        tx: &Sender<Record>,
        cancel: &CancelToken,
        summary: &mut ScanSummary,
    ) -> Result<Flow> {
        let file = File::open(path).map_err(|e| ShelfdexError::container(path, e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| ShelfdexError::container(path, e))?;
        let schema = read_schema(&mut zip);
        let dir = path.parent().unwrap_or(&self.root).to_path_buf();

        let mut streams: Vec<(usize, String)> = Vec::new();
        for i in 0..zip.len() {
            let entry = zip.by_index(i).map_err(|e| ShelfdexError::container(path, e))?;
            if let Some(stem) = stream_stem(entry.name()) {
                streams.push((i, stem));
            }
        }

        for (index, stem) in streams {
            summary.streams += 1;
            let Some(archive) = self.resolve_archive(&dir, &stem, archives) else {
                tracing::debug!(stream = %stem, "No content archive, skipping stream");
                summary.streams_skipped += 1;
                continue;
            };
            let archive = self.relative(&archive);

            let entry = zip
                .by_index(index)
                .map_err(|e| ShelfdexError::container(path, e))?;
            let flow = publish_stream(entry, &schema, &archive, tx, cancel, summary)
                .map_err(|e| ShelfdexError::container(path, e))?;
            if let Flow::Stop = flow {
                return Ok(Flow::Stop);
            }
        }

        Ok(Flow::Continue)
    }

    /// Find `<stem>.<ext>` next to the container, trying extensions in order
    fn resolve_archive(
        &self,
        dir: &Path,
        stem: &str,
        archives: &HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        self.archive_extensions
            .iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|candidate| archives.contains(candidate))
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn stream_stem(name: &str) -> Option<String> {
    let path = Path::new(name);
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case(STREAM_EXTENSION) {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn read_schema<R: Read + std::io::Seek>(zip: &mut ZipArchive<R>) -> FieldSchema {
    let mut body = String::new();
    let read = zip
        .by_name(STRUCTURE_ENTRY)
        .ok()
        .and_then(|mut entry| entry.read_to_string(&mut body).ok());

    match read.and_then(|_| FieldSchema::from_structure(&body)) {
        Some(schema) => {
            tracing::debug!(structure = %body.trim(), "Using container field order");
            schema
        }
        None => FieldSchema::default(),
    }
}

/// Parse one stream line by line and publish each record
fn publish_stream(
    entry: impl Read,
    schema: &FieldSchema,
    archive: &str,
    tx: &Sender<Record>,
    cancel: &CancelToken,
    summary: &mut ScanSummary,
) -> std::io::Result<Flow> {
    let mut reader = BufReader::new(entry);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(Flow::Continue);
        }
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }

        let mut record = match parse_line(&line, schema) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(archive, error = %e, "Malformed index line");
                summary.malformed += 1;
                continue;
            }
        };
        if record.title.is_empty() {
            summary.untitled += 1;
            continue;
        }
        record.archive = archive.to_string();

        if let Flow::Stop = publish(record, tx, cancel) {
            return Ok(Flow::Stop);
        }
        summary.records += 1;
    }
}

/// Send unless cancelled; a blocked send wakes up on cancellation
fn publish(record: Record, tx: &Sender<Record>, cancel: &CancelToken) -> Flow {
    if cancel.is_cancelled() {
        return Flow::Stop;
    }
    select! {
        send(tx, record) -> res => match res {
            Ok(()) => Flow::Continue,
            Err(_) => Flow::Stop,
        },
        recv(cancel.signal()) -> _ => {
            cancel.rearm();
            Flow::Stop
        },
    }
}
