use crate::config::PROGRESS_INTERVAL;
use crate::graph::HashtagGraph;
use crate::models::{CleanedPost, Post};
use crate::normalize;
use crate::report;
use crate::sink::CorpusSink;
use crate::source::PostReader;
use crate::stats::RunStats;
use anyhow::Result;
use indicatif::ProgressBar;
use tracing::{debug, info};

/// Options for one pipeline run.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub input: String,
    /// Corpus destination; `None` builds the graph without writing text
    pub output: Option<String>,
    /// Directory for the graph CSV export
    pub graph_dir: Option<String>,
    /// Stop after this many decoded records
    pub limit: Option<u64>,
    /// Only process records carrying this language code
    pub lang: Option<String>,
    /// Process and count, but write nothing
    pub dry_run: bool,
}

/// Everything a run leaves behind once the stream is exhausted.
pub struct RunOutcome {
    pub stats: RunStats,
    pub graph: HashtagGraph,
}

/// Per-record state threaded through the run: the co-occurrence graph and
/// the counters. Owned by the driver, mutated synchronously one record at a
/// time.
#[derive(Default)]
pub struct PipelineState {
    graph: HashtagGraph,
    stats: RunStats,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &HashtagGraph {
        &self.graph
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Cleans one post, folds its hashtags into the graph, and decides
    /// whether the cleaned text belongs in the corpus.
    ///
    /// Hashtag ingestion and the escape counter are independent of the
    /// corpus filter: a blank or punctuation-only post still contributes
    /// both before this returns `None`.
    pub fn process(&mut self, post: &Post) -> Option<CleanedPost> {
        let latin = normalize::retain_basic_latin(&post.text);
        if latin.is_empty() {
            self.stats.non_latin_skipped += 1;
            debug!("Skipping post with no basic-latin content");
            return None;
        }

        let (text, had_escape) = normalize::normalize(&latin);
        let (timestamp, _) = normalize::normalize(&post.timestamp);

        if had_escape {
            self.stats.posts_with_escapes += 1;
        }

        // Cheap pre-check before the regex machinery gets involved
        let hashtags = if memchr::memchr(b'#', text.as_bytes()).is_some() {
            normalize::extract_hashtags(&text)
        } else {
            Default::default()
        };

        if hashtags.len() >= 2 {
            self.graph.ingest_post_tags(&hashtags);
            self.stats.graph_posts += 1;
        }

        if normalize::is_blank(&text) || normalize::is_only_punctuation(&text) {
            self.stats.posts_filtered += 1;
            return None;
        }

        Some(CleanedPost {
            text,
            timestamp,
            had_escape,
            hashtags,
        })
    }

    fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            stats: self.stats,
            graph: self.graph,
        }
    }
}

/// Drives one synchronous pass: source -> normalizer -> graph -> sink.
pub fn run(options: &RunOptions) -> Result<RunOutcome> {
    let mut reader = PostReader::open(&options.input)?;
    let mut state = PipelineState::new();

    let mut sink = match (&options.output, options.dry_run) {
        (Some(path), false) => Some(CorpusSink::create(path)?),
        _ => None,
    };

    info!(input = %options.input, "Starting pipeline pass");
    let pb = ProgressBar::new_spinner();

    for post in &mut reader {
        let post = post?;

        if let Some(limit) = options.limit {
            if state.stats.records_read >= limit {
                info!(limit = limit, "Record limit reached");
                break;
            }
        }
        state.stats.records_read += 1;

        if state.stats.records_read % PROGRESS_INTERVAL == 0 {
            pb.tick();
        }

        if let Some(lang) = &options.lang {
            if post.language.as_deref() != Some(lang.as_str()) {
                state.stats.lang_filtered += 1;
                continue;
            }
        }

        if let Some(cleaned) = state.process(&post) {
            state.stats.posts_written += 1;
            if let Some(sink) = sink.as_mut() {
                sink.write_post(&cleaned.text, &cleaned.timestamp)?;
            }
        }
    }

    pb.finish_and_clear();
    state.stats.malformed_records = reader.skipped();

    if let Some(sink) = sink.take() {
        sink.finish(state.stats.posts_with_escapes)?;
    }

    if let Some(dir) = &options.graph_dir {
        if !options.dry_run {
            report::export_graph(&state.graph, dir)?;
        }
    }

    info!(
        records = state.stats.records_read,
        malformed = state.stats.malformed_records,
        written = state.stats.posts_written,
        escaped = state.stats.posts_with_escapes,
        vertices = state.graph.vertex_count(),
        "Pipeline pass complete"
    );

    Ok(state.into_outcome())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            text: text.to_string(),
            timestamp: "Thu Oct 29 17:51:01 +0000 2015".to_string(),
            language: Some("en".to_string()),
        }
    }

    #[test]
    fn clean_post_passes_through() {
        let mut state = PipelineState::new();
        let cleaned = state.process(&post("Just a   plain update")).unwrap();

        assert_eq!(cleaned.text, "Just a plain update");
        assert!(!cleaned.had_escape);
        assert!(cleaned.hashtags.is_empty());
        assert_eq!(state.stats().posts_with_escapes, 0);
    }

    #[test]
    fn escaped_post_is_counted() {
        let mut state = PipelineState::new();
        let cleaned = state.process(&post(r"I am at Starbucks \u307b\u3063 (Tokyo)")).unwrap();

        assert!(cleaned.had_escape);
        assert_eq!(cleaned.text, "I am at Starbucks (Tokyo)");
        assert_eq!(state.stats().posts_with_escapes, 1);
    }

    #[test]
    fn timestamp_is_cleaned_too() {
        let mut state = PipelineState::new();
        let mut raw = post("hello");
        raw.timestamp = "  Thu Oct 29   17:51:01 +0000 2015 ".to_string();
        let cleaned = state.process(&raw).unwrap();
        assert_eq!(cleaned.timestamp, "Thu Oct 29 17:51:01 +0000 2015");
    }

    #[test]
    fn two_hashtags_update_graph() {
        let mut state = PipelineState::new();
        state.process(&post("Loving #Rust and #Python today")).unwrap();

        assert_eq!(state.graph().vertex_count(), 2);
        assert_eq!(state.graph().edge_count(), 1);
        assert_eq!(state.stats().graph_posts, 1);
    }

    #[test]
    fn single_hashtag_leaves_graph_untouched() {
        let mut state = PipelineState::new();
        state.process(&post("only #one tag")).unwrap();

        assert!(state.graph().is_empty());
        assert_eq!(state.stats().graph_posts, 0);
    }

    #[test]
    fn punctuation_only_post_is_filtered() {
        let mut state = PipelineState::new();
        assert!(state.process(&post("... !!! ???")).is_none());
        assert_eq!(state.stats().posts_filtered, 1);
    }

    #[test]
    fn filtered_post_still_feeds_the_graph() {
        // '_' is ASCII punctuation but a word character, so these tokens are
        // punctuation-only text and valid hashtags at the same time
        let mut state = PipelineState::new();
        assert!(state.process(&post("#_ #__")).is_none());

        assert_eq!(state.stats().posts_filtered, 1);
        assert_eq!(state.graph().vertex_count(), 2);
        assert_eq!(state.graph().edge_count(), 1);
    }

    #[test]
    fn filtered_post_still_counts_escapes() {
        let mut state = PipelineState::new();
        assert!(state.process(&post(r"\u00e9 ...")).is_none());
        assert_eq!(state.stats().posts_with_escapes, 1);
    }

    #[test]
    fn non_latin_post_is_skipped_entirely() {
        let mut state = PipelineState::new();
        assert!(state.process(&post("全部非拉丁")).is_none());

        assert_eq!(state.stats().non_latin_skipped, 1);
        assert_eq!(state.stats().posts_filtered, 0);
        assert_eq!(state.stats().posts_with_escapes, 0);
    }

    #[test]
    fn blank_after_cleaning_is_filtered() {
        let mut state = PipelineState::new();
        assert!(state.process(&post(r"\u00e9\u00e8")).is_none());
        assert_eq!(state.stats().posts_filtered, 1);
        assert_eq!(state.stats().posts_with_escapes, 1);
    }

    #[test]
    fn repeated_posts_share_graph_state() {
        let mut state = PipelineState::new();
        state.process(&post("#a #b #c")).unwrap();
        state.process(&post("#a #b")).unwrap();

        assert_eq!(state.graph().edge_count(), 3);
        assert_eq!(state.stats().graph_posts, 2);
    }
}
