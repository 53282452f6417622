use anyhow::Result;
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

/// Worker threads owned by a single pipeline run.
///
/// Dropping the pool joins its threads, so nothing outlives the run.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `workers == 0` means one thread per CPU.
    pub fn new(workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("wordfreq-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Applies `f` to every item on the pool. Output order matches input order.
    pub fn map<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        self.pool.install(|| items.par_iter().map(f).collect())
    }

    /// Like [`WorkerPool::map`], consuming the items.
    pub fn map_owned<T, U, F>(&self, items: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> U + Sync + Send,
    {
        self.pool.install(|| items.into_par_iter().map(f).collect())
    }

    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        self.pool.install(op)
    }
}
