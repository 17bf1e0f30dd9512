//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use hashbrown::{HashMap, HashSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use xpager::{ArrayReader, AxisIndexer, JoinId, QueryContext, ReadError, TripletBatch};

/// Store holding a fixed list of cells, returned in insertion order
pub struct MemoryStore {
    pub shape: (u64, u64),
    pub cells: Vec<(JoinId, JoinId, f32)>,
    pub reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new(shape: (u64, u64), cells: Vec<(JoinId, JoinId, f32)>) -> Self {
        Self {
            shape,
            cells,
            reads: AtomicUsize::new(0),
        }
    }

    /// Random store with unique coordinates, cells shuffled
    pub fn random(rng: &mut StdRng, shape: (u64, u64), nnz: usize) -> Self {
        let mut seen = HashSet::new();
        let mut cells = Vec::with_capacity(nnz);
        while cells.len() < nnz {
            let row = rng.gen_range(0..shape.0);
            let col = rng.gen_range(0..shape.1);
            if seen.insert((row, col)) {
                cells.push((row, col, rng.gen_range(1..100) as f32 * 0.5));
            }
        }
        cells.shuffle(rng);
        Self::new(shape, cells)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ArrayReader<f32> for MemoryStore {
    fn read(
        &self,
        _layer: &str,
        primary: &[JoinId],
        secondary: &[JoinId],
    ) -> Result<TripletBatch<f32>, ReadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let rows: HashSet<JoinId> = primary.iter().copied().collect();
        let cols: HashSet<JoinId> = secondary.iter().copied().collect();

        let mut batch = TripletBatch::empty();
        for &(row, col, value) in &self.cells {
            if rows.contains(&row) && cols.contains(&col) {
                batch.push(value, row, col);
            }
        }
        Ok(batch)
    }

    fn shape(&self, _layer: &str) -> Result<(u64, u64), ReadError> {
        Ok(self.shape)
    }
}

/// Store that fails every read whose first primary id is `fail_on`
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_on: JoinId,
}

impl ArrayReader<f32> for FailingStore {
    fn read(
        &self,
        layer: &str,
        primary: &[JoinId],
        secondary: &[JoinId],
    ) -> Result<TripletBatch<f32>, ReadError> {
        if primary.first() == Some(&self.fail_on) {
            self.inner.reads.fetch_add(1, Ordering::SeqCst);
            return Err(format!("injected failure at obs {}", self.fail_on).into());
        }
        self.inner.read(layer, primary, secondary)
    }

    fn shape(&self, layer: &str) -> Result<(u64, u64), ReadError> {
        self.inner.shape(layer)
    }
}

/// Store that sleeps on every read, standing in for remote I/O
pub struct SlowStore {
    pub inner: MemoryStore,
    pub latency: Duration,
    pub jitter_micros: u64,
}

impl ArrayReader<f32> for SlowStore {
    fn read(
        &self,
        layer: &str,
        primary: &[JoinId],
        secondary: &[JoinId],
    ) -> Result<TripletBatch<f32>, ReadError> {
        let call = self.inner.read_count() as u64;
        let jitter = call.wrapping_mul(7_919) % self.jitter_micros.max(1);
        std::thread::sleep(self.latency + Duration::from_micros(jitter));
        self.inner.read(layer, primary, secondary)
    }

    fn shape(&self, layer: &str) -> Result<(u64, u64), ReadError> {
        self.inner.shape(layer)
    }
}

/// Indexer over a fixed id sequence
pub struct HashIndexer {
    positions: HashMap<JoinId, usize>,
}

impl HashIndexer {
    pub fn new(ids: &[JoinId]) -> Self {
        Self {
            positions: ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect(),
        }
    }
}

impl AxisIndexer for HashIndexer {
    fn position_of(&self, ids: &[JoinId]) -> Vec<Option<usize>> {
        ids.iter().map(|id| self.positions.get(id).copied()).collect()
    }
}

pub fn pool(threads: usize) -> Arc<rayon::ThreadPool> {
    Arc::new(
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("thread pool"),
    )
}

pub fn context(
    store: Arc<dyn ArrayReader<f32>>,
    obs: Vec<JoinId>,
    var: Vec<JoinId>,
    threads: usize,
) -> QueryContext<f32> {
    let indexer = Arc::new(HashIndexer::new(&var));
    QueryContext::new(obs, var, store, indexer, pool(threads))
}

/// Sorted random subset of `0..extent`
pub fn random_ids(rng: &mut StdRng, extent: u64, count: usize) -> Vec<JoinId> {
    let mut ids: Vec<JoinId> = (0..extent).collect();
    ids.shuffle(rng);
    ids.truncate(count);
    ids.sort_unstable();
    ids
}

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
