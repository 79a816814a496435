use crate::config::SINK_BUFFER_SIZE;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Append-style writer for the cleaned corpus.
///
/// One line per qualifying post, `{text} ({timestamp})`, followed by a
/// single summary line at the end of the stream. Any write failure is fatal
/// for the run.
pub struct CorpusSink {
    writer: BufWriter<File>,
    path: String,
}

impl CorpusSink {
    pub fn create(path: &str) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?;
        Ok(Self {
            writer: BufWriter::with_capacity(SINK_BUFFER_SIZE, file),
            path: path.to_string(),
        })
    }

    pub fn write_post(&mut self, text: &str, timestamp: &str) -> Result<()> {
        writeln!(self.writer, "{} ({})", text, timestamp)
            .with_context(|| format!("Failed to write to output file: {}", self.path))
    }

    /// Writes the trailing summary line and flushes the buffer.
    pub fn finish(mut self, escaped_posts: u64) -> Result<()> {
        writeln!(self.writer, "{} posts contained unicode.", escaped_posts)
            .with_context(|| format!("Failed to write summary to: {}", self.path))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush output file: {}", self.path))
    }
}
