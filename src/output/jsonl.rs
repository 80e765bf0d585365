//! JSON Lines article sink
//!
//! Each record becomes one line of JSON followed by `\n`. The writer is flushed
//! after every line so that an interrupted run leaves only complete lines behind.

use crate::output::traits::{ArticleSink, SinkResult};
use crate::output::ArticleRecord;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Writes article records as JSON Lines to any `Write` implementation
#[derive(Debug)]
pub struct JsonlSink<W: Write> {
    writer: W,
    written: u64,
}

impl JsonlSink<File> {
    /// Opens the output file once for the whole run
    ///
    /// The file is created if missing. Existing content is kept (append mode)
    /// unless `overwrite` is set, in which case it is truncated.
    pub fn open(path: &Path, overwrite: bool) -> SinkResult<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if overwrite {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }

        let file = options.open(path)?;
        tracing::debug!(
            "Opened output file {} ({})",
            path.display(),
            if overwrite { "truncate" } else { "append" }
        );
        Ok(Self::new(file))
    }
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Gives back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Borrows the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> ArticleSink for JsonlSink<W> {
    fn write(&mut self, record: &ArticleRecord) -> SinkResult<()> {
        // Encode the whole line before touching the writer
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.written
    }
}
