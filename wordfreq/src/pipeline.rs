use crate::{
    fetch::Fetch,
    normalize::{normalize, Vocabulary},
    pool::WorkerPool,
    stages::{self, ShuffleMode},
};
use anyhow::Result;
use common::FrequencyTable;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    /// Pool size for the map and reduce stages, 0 for one per CPU.
    pub workers: usize,
    pub shuffle: ShuffleMode,
}

/// Normalize, map, shuffle and reduce `text` on `pool`.
pub fn count_words(
    text: &str,
    filter: Option<&Vocabulary>,
    pool: &WorkerPool,
    mode: ShuffleMode,
) -> FrequencyTable {
    let tokens = normalize(text, filter);
    debug!("normalized {} tokens", tokens.len());

    let pairs = stages::map(pool, &tokens);
    let groups = stages::shuffle(pool, pairs, mode);
    debug!("shuffled into {} groups", groups.len());

    stages::reduce(pool, groups)
}

/// Fetches `source` and counts its words.
///
/// `Ok(None)` means the text could not be fetched; nothing else ran. `Err` is
/// reserved for failing to set up the worker pool.
pub fn map_reduce<F: Fetch + ?Sized>(
    fetcher: &F,
    source: &str,
    filter: Option<&Vocabulary>,
    config: &PipelineConfig,
) -> Result<Option<FrequencyTable>> {
    let span = info_span!("map_reduce", run = %Uuid::new_v4());
    let _enter = span.enter();

    let text = match fetcher.fetch(source) {
        Ok(text) => text,
        Err(e) => {
            error!("failed to fetch {}: {}", source, e);
            return Ok(None);
        }
    };
    info!("fetched {} bytes from {}", text.len(), source);

    let pool = WorkerPool::new(config.workers)?;
    debug!("worker pool with {} threads", pool.workers());
    let table = count_words(&text, filter, &pool, config.shuffle);
    info!("counted {} words, {} distinct", table.total(), table.len());
    Ok(Some(table))
}
