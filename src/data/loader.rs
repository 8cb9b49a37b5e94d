use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use super::model::RawRecord;
use crate::error::{PipelineError, Result};

/// Columns per row: `timestamp_ms, label, value`.
const COLUMNS: usize = 3;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A benchmark log on disk.
///
/// Layout, no header row:
/// ```text
/// 0,Throughput,10485760
/// 1000,Throughput,11534336
/// ```
/// `open` only checks that the file can be read; rows are parsed lazily by
/// [`SeriesLoader::records`], which starts from the top of the file every
/// time it is called.
#[derive(Debug, Clone)]
pub struct SeriesLoader {
    path: PathBuf,
}

impl SeriesLoader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        reader_for(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> Result<Records> {
        Ok(Records {
            path: self.path.clone(),
            rows: reader_for(&self.path)?.into_records(),
            default_label: None,
            skipped_lines: Vec::new(),
            done: false,
        })
    }
}

fn reader_for(path: &Path) -> Result<csv::Reader<LineCounter<File>>> {
    let file = File::open(path).map_err(|e| PipelineError::SourceUnreadable {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    Ok(ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(LineCounter::new(file)))
}

/// Pass-through reader that notes where every `\n` is.
///
/// The csv reader drops blank lines and only reports the position where it
/// started looking for a record, so row numbers are taken from here instead.
struct LineCounter<R> {
    inner: R,
    offset: u64,
    /// Newlines not yet passed by a [`LineCounter::line_at`] query.
    newlines: VecDeque<u64>,
    passed: usize,
}

impl<R> LineCounter<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            newlines: VecDeque::new(),
            passed: 0,
        }
    }

    /// 1-based line holding the byte at `offset`. Offsets must not decrease
    /// between calls.
    fn line_at(&mut self, offset: u64) -> usize {
        while self.newlines.front().is_some_and(|&nl| nl < offset) {
            self.newlines.pop_front();
            self.passed += 1;
        }
        self.passed + 1
    }
}

impl<R: Read> Read for LineCounter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let start = self.offset;
        self.newlines.extend(
            buf[..n]
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| start + i as u64),
        );
        self.offset += n as u64;
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Record iterator
// ---------------------------------------------------------------------------

/// Lazy iterator over the valid rows of one log.
///
/// Malformed rows are logged and skipped. The only error it yields is an
/// I/O failure part way through the file, after which it stops.
pub struct Records {
    path: PathBuf,
    rows: StringRecordsIntoIter<LineCounter<File>>,
    default_label: Option<String>,
    skipped_lines: Vec<usize>,
    done: bool,
}

impl Records {
    /// Column 1 of the first row with the right number of columns.
    pub fn default_label(&self) -> Option<&str> {
        self.default_label.as_deref()
    }

    /// Rows dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }

    /// 1-based file line of every dropped row.
    pub fn skipped_lines(&self) -> &[usize] {
        &self.skipped_lines
    }

    fn skip(&mut self, row: usize, err: PipelineError) {
        log::warn!("{}: skipping {err}", self.path.display());
        self.skipped_lines.push(row);
    }

    /// File line of the record just read, taken from its last byte. A row
    /// ends with its terminator or at end of file, so that byte is on the
    /// row's own line either way.
    fn last_line(&mut self) -> usize {
        let end = self.rows.reader().position().byte();
        self.rows
            .reader_mut()
            .get_mut()
            .line_at(end.saturating_sub(1))
    }
}

impl Iterator for Records {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let result = self.rows.next()?;

            let (record, row) = match result {
                Ok(record) => (record, self.last_line()),
                Err(e) if e.is_io_error() => {
                    self.done = true;
                    return Some(Err(PipelineError::SourceUnreadable {
                        path: self.path.clone(),
                        source: e,
                    }));
                }
                Err(e) => {
                    let row = self.last_line();
                    self.skip(
                        row,
                        PipelineError::MalformedRow {
                            row,
                            reason: e.to_string(),
                        },
                    );
                    continue;
                }
            };

            if record.len() == COLUMNS && self.default_label.is_none() {
                self.default_label = Some(record[1].to_string());
            }

            match parse_row(&record, row) {
                Ok(raw) => return Some(Ok(raw)),
                Err(e) => self.skip(row, e),
            }
        }
        None
    }
}

fn parse_row(record: &StringRecord, row: usize) -> Result<RawRecord> {
    if record.len() != COLUMNS {
        return Err(PipelineError::MalformedRow {
            row,
            reason: format!("expected {COLUMNS} columns, found {}", record.len()),
        });
    }
    Ok(RawRecord {
        time_ms: parse_float(&record[0], row, "timestamp")?,
        label: record[1].to_string(),
        value: parse_float(&record[2], row, "value")?,
    })
}

fn parse_float(s: &str, row: usize, col: &str) -> Result<f64> {
    s.trim().parse::<f64>().map_err(|_| PipelineError::MalformedRow {
        row,
        reason: format!("{col} '{s}' is not a number"),
    })
}
