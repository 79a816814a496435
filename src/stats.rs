/// Counters collected during one pipeline run.
///
/// The pipeline is single-threaded, so these are plain integers threaded
/// through the driver rather than process-wide state.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    /// Records successfully decoded from the source
    pub records_read: u64,
    /// Lines that were not valid records (skipped, never fatal)
    pub malformed_records: u64,
    /// Posts skipped because the language filter excluded them
    pub lang_filtered: u64,
    /// Posts whose text was empty once non-latin characters were removed
    pub non_latin_skipped: u64,
    /// Posts whose text contained escaped unicode content
    pub posts_with_escapes: u64,
    /// Posts excluded from the corpus as blank or punctuation-only
    pub posts_filtered: u64,
    /// Posts appended to the cleaned corpus
    pub posts_written: u64,
    /// Posts that contributed at least one co-occurrence edge
    pub graph_posts: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that reached the normalizer (read minus early skips).
    pub fn posts_processed(&self) -> u64 {
        self.records_read - self.lang_filtered - self.non_latin_skipped
    }
}
