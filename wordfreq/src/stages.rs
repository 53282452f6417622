//! The map, shuffle and reduce stages.
//!
//! Map and reduce are pure per-element functions and run on a [`WorkerPool`].
//! Shuffle is a plain sequential aggregation unless [`ShuffleMode::Concurrent`]
//! is asked for.

use crate::pool::WorkerPool;
use clap::ValueEnum;
use common::{FrequencyTable, Groups, KeyValue};
use dashmap::DashMap;
use itertools::Itertools;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShuffleMode {
    /// One pass on the calling thread.
    #[default]
    Sequential,
    /// Parallel grouping into a concurrent map.
    Concurrent,
}

pub fn map_token(token: &str) -> KeyValue {
    KeyValue::new(token.to_lowercase(), 1)
}

pub fn map<S: AsRef<str> + Sync>(pool: &WorkerPool, tokens: &[S]) -> Vec<KeyValue> {
    pool.map(tokens, |token| map_token(token.as_ref()))
}

pub fn shuffle(pool: &WorkerPool, pairs: Vec<KeyValue>, mode: ShuffleMode) -> Groups {
    match mode {
        ShuffleMode::Sequential => pairs.into_iter().collect(),
        ShuffleMode::Concurrent => shuffle_concurrent(pool, pairs),
    }
}

/// Groups on the pool through a `DashMap` with per-shard locking.
///
/// Each key remembers the earliest input position it was seen at, and the
/// groups are emitted in that order so the result has the same key order as
/// the sequential shuffle. Values inside a group are in no particular order.
fn shuffle_concurrent(pool: &WorkerPool, pairs: Vec<KeyValue>) -> Groups {
    let grouped: DashMap<String, (usize, Vec<u64>)> = DashMap::new();
    pool.install(|| {
        pairs.into_par_iter().enumerate().for_each(|(pos, kv)| {
            let mut group = grouped.entry(kv.key).or_insert_with(|| (pos, Vec::new()));
            group.0 = group.0.min(pos);
            group.1.push(kv.value);
        })
    });

    Groups::from_entries(
        grouped
            .into_iter()
            .sorted_by_key(|(_, (first, _))| *first)
            .map(|(key, (_, values))| (key, values)),
    )
}

pub fn reduce_group((key, values): (String, Vec<u64>)) -> (String, u64) {
    let total = values.iter().sum();
    (key, total)
}

pub fn reduce(pool: &WorkerPool, groups: Groups) -> FrequencyTable {
    pool.map_owned(groups.into_entries(), reduce_group)
        .into_iter()
        .collect()
}
