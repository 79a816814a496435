/// Progress update interval (tick every N records)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Buffer size for the cleaned-corpus writer
pub const SINK_BUFFER_SIZE: usize = 128 * 1024;

/// Buffer size for graph CSV export writers
pub const EXPORT_BUFFER_SIZE: usize = 128 * 1024;
