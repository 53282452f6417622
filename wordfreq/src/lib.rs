pub mod fetch;
pub mod logger;
pub mod normalize;
pub mod pipeline;
pub mod pool;
pub mod report;
pub mod stages;

pub use common::{FrequencyTable, Groups, KeyValue};
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use logger::init_logger;
pub use normalize::{normalize, Vocabulary};
pub use pipeline::{count_words, map_reduce, PipelineConfig};
pub use pool::WorkerPool;
pub use report::{report, BarChart, Render, TerminalChart};
pub use stages::ShuffleMode;

pub const DEFAULT_URL: &str = "https://gutenberg.net.au/ebooks01/0100021.txt";

/// Bars drawn by the reporter unless asked otherwise.
pub const DEFAULT_TOP: usize = 10;
