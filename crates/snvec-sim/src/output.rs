//! JSON-lines event segments.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use snvec_core::{io_error, ErrorInfo, FinalStateEvent, SnError, SubrunKey};
use snvec_gen::EventSink;

/// Sink writing events to numbered `.jsonl` segments of bounded size.
pub struct SegmentedJsonWriter {
    dir: PathBuf,
    prefix: String,
    events_per_file: usize,
    current: Option<(PathBuf, BufWriter<File>)>,
    in_segment: usize,
    next_index: usize,
    outputs: Vec<PathBuf>,
    written: u64,
}

impl SegmentedJsonWriter {
    pub fn new(dir: &Path, prefix: &str, events_per_file: usize) -> Self {
        Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
            events_per_file: events_per_file.max(1),
            current: None,
            in_segment: 0,
            next_index: 0,
            outputs: Vec::new(),
            written: 0,
        }
    }

    /// Segment file names relative to the output directory.
    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    fn rotate(&mut self) -> Result<(), SnError> {
        self.close()?;
        let name = PathBuf::from(format!("{}_{:06}.jsonl", self.prefix, self.next_index));
        let path = self.dir.join(&name);
        let file = File::create(&path).map_err(|err| io_error(&path, err))?;
        self.current = Some((path, BufWriter::new(file)));
        self.outputs.push(name);
        self.next_index += 1;
        self.in_segment = 0;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SnError> {
        if let Some((path, mut writer)) = self.current.take() {
            writer.flush().map_err(|err| io_error(&path, err))?;
        }
        Ok(())
    }
}

impl EventSink for SegmentedJsonWriter {
    fn accept(&mut self, event: FinalStateEvent) -> Result<(), SnError> {
        if self.current.is_none() || self.in_segment >= self.events_per_file {
            self.rotate()?;
        }
        if let Some((path, writer)) = self.current.as_mut() {
            write_line(writer, path, &event)?;
        }
        self.in_segment += 1;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SnError> {
        self.close()
    }
}

/// Writes all events of one subrun to `{prefix}_r{run:06}_{subrun:06}.jsonl`.
///
/// Returns the file name relative to `dir`. An empty subrun still gets a file.
pub fn write_subrun_segment(
    dir: &Path,
    prefix: &str,
    key: SubrunKey,
    events: &[FinalStateEvent],
) -> Result<PathBuf, SnError> {
    let name = PathBuf::from(format!("{prefix}_r{:06}_{:06}.jsonl", key.run, key.subrun));
    let path = dir.join(&name);
    fs::create_dir_all(dir).map_err(|err| io_error(dir, err))?;
    let file = File::create(&path).map_err(|err| io_error(&path, err))?;
    let mut writer = BufWriter::new(file);
    for event in events {
        write_line(&mut writer, &path, event)?;
    }
    writer.flush().map_err(|err| io_error(&path, err))?;
    Ok(name)
}

fn write_line<W: Write>(writer: &mut W, path: &Path, event: &FinalStateEvent) -> Result<(), SnError> {
    serde_json::to_writer(&mut *writer, event).map_err(|err| {
        SnError::Serde(
            ErrorInfo::new("event-serialize", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    writer.write_all(b"\n").map_err(|err| io_error(path, err))
}
