use crate::models::Post;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use tracing::debug;

/// Wire shape of one input line. Everything is optional so a partial record
/// can be classified rather than rejected by the decoder.
#[derive(Deserialize)]
struct RawRecord {
    text: Option<String>,
    created_at: Option<String>,
    lang: Option<String>,
}

/// Lazy pull-based reader over a JSONL post stream.
///
/// Blank keep-alive lines are skipped silently. Lines that fail to decode,
/// or decode without a `text` field, are malformed: counted and skipped,
/// never fatal. An I/O error mid-stream is yielded as `Err` and should abort
/// the run.
pub struct PostReader {
    lines: Lines<BufReader<File>>,
    skipped: u64,
}

impl PostReader {
    pub fn open(path: &str) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            skipped: 0,
        })
    }

    /// Malformed lines seen so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Iterator for PostReader {
    type Item = Result<Post>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(
                        anyhow::Error::new(e).context("Failed to read from input stream")
                    ))
                }
            };

            // Keep-alive newlines carry no record
            if line.trim().is_empty() {
                continue;
            }

            let record: RawRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(e) => {
                    self.skipped += 1;
                    debug!(error = %e, "Skipping malformed record");
                    continue;
                }
            };

            let Some(text) = record.text else {
                self.skipped += 1;
                debug!("Skipping record without a text field");
                continue;
            };

            return Some(Ok(Post {
                text,
                timestamp: record.created_at.unwrap_or_default(),
                language: record.lang,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader_for(content: &str) -> (NamedTempFile, PostReader) {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();
        let reader = PostReader::open(tmp.path().to_str().unwrap()).unwrap();
        (tmp, reader)
    }

    #[test]
    fn reads_valid_records() {
        let (_tmp, mut reader) = reader_for(
            "{\"text\": \"hello\", \"created_at\": \"Thu Oct 29 17:51:01 +0000 2015\", \"lang\": \"en\"}\n",
        );
        let post = reader.next().unwrap().unwrap();
        assert_eq!(post.text, "hello");
        assert_eq!(post.timestamp, "Thu Oct 29 17:51:01 +0000 2015");
        assert_eq!(post.language.as_deref(), Some("en"));
        assert!(reader.next().is_none());
    }

    #[test]
    fn skips_blank_keepalive_lines() {
        let (_tmp, mut reader) = reader_for("\n\n{\"text\": \"a\"}\n\n{\"text\": \"b\"}\n");
        assert_eq!(reader.next().unwrap().unwrap().text, "a");
        assert_eq!(reader.next().unwrap().unwrap().text, "b");
        assert!(reader.next().is_none());
        assert_eq!(reader.skipped(), 0);
    }

    #[test]
    fn counts_malformed_lines() {
        let (_tmp, mut reader) = reader_for("not json at all\n{\"text\": \"ok\"}\n{broken\n");
        assert_eq!(reader.next().unwrap().unwrap().text, "ok");
        assert!(reader.next().is_none());
        assert_eq!(reader.skipped(), 2);
    }

    #[test]
    fn record_without_text_is_malformed() {
        let (_tmp, mut reader) = reader_for("{\"created_at\": \"now\"}\n{\"text\": \"ok\"}\n");
        assert_eq!(reader.next().unwrap().unwrap().text, "ok");
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn missing_timestamp_defaults_to_empty() {
        let (_tmp, mut reader) = reader_for("{\"text\": \"no time\"}\n");
        let post = reader.next().unwrap().unwrap();
        assert_eq!(post.timestamp, "");
        assert_eq!(post.language, None);
    }

    #[test]
    fn open_fails_for_missing_file() {
        assert!(PostReader::open("/nonexistent/posts.txt").is_err());
    }
}
