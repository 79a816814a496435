use rustc_hash::FxHashSet;

/// One record pulled from the input stream. Consumed once, never retained.
#[derive(Debug, Clone)]
pub struct Post {
    pub text: String,
    pub timestamp: String,
    pub language: Option<String>,
}

/// A post after normalization, ready for the sink and the graph builder.
#[derive(Debug, Clone)]
pub struct CleanedPost {
    pub text: String,
    pub timestamp: String,
    pub had_escape: bool,
    pub hashtags: FxHashSet<String>,
}
