//! Example paging through a query against an in-memory store
//!
//! Builds a small random cell store, loads paging options from JSON and
//! walks the query one page at a time, printing what each page holds.
//!
//! Run with: RUST_LOG=xpager=debug cargo run --example page_through

use hashbrown::HashMap;
use std::sync::Arc;
use std::time::Instant;
use xpager::{
    options_from_json, x_sparse_iter, ArrayReader, AxisIndexer, JoinId, MatrixOperations,
    QueryContext, ReadError, SparseMatrix, TripletBatch,
};

/// Cells keyed by observation id
struct InMemoryStore {
    shape: (u64, u64),
    rows: HashMap<JoinId, Vec<(JoinId, f32)>>,
}

impl InMemoryStore {
    fn banded(n_obs: u64, n_var: u64) -> Self {
        let rows = (0..n_obs)
            .map(|obs| {
                let cells = (0..n_var)
                    .filter(|var| (obs + var) % 7 == 0)
                    .map(|var| (var, (obs * n_var + var) as f32 / 10.0))
                    .collect();
                (obs, cells)
            })
            .collect();
        Self {
            shape: (n_obs, n_var),
            rows,
        }
    }
}

impl ArrayReader<f32> for InMemoryStore {
    fn read(
        &self,
        _layer: &str,
        primary: &[JoinId],
        secondary: &[JoinId],
    ) -> Result<TripletBatch<f32>, ReadError> {
        let mut batch = TripletBatch::empty();
        for obs in primary {
            let Some(cells) = self.rows.get(obs) else {
                continue;
            };
            for &(var, value) in cells {
                if secondary.contains(&var) {
                    batch.push(value, *obs, var);
                }
            }
        }
        Ok(batch)
    }

    fn shape(&self, _layer: &str) -> Result<(u64, u64), ReadError> {
        Ok(self.shape)
    }
}

struct VarIndex(HashMap<JoinId, usize>);

impl AxisIndexer for VarIndex {
    fn position_of(&self, ids: &[JoinId]) -> Vec<Option<usize>> {
        ids.iter().map(|id| self.0.get(id).copied()).collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let obs_ids: Vec<JoinId> = (0..100).filter(|id| id % 3 != 0).collect();
    let var_ids: Vec<JoinId> = vec![0, 4, 7, 14, 21, 30];
    let indexer = VarIndex(var_ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect());
    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build()?;

    let ctx = QueryContext::new(
        obs_ids,
        var_ids,
        Arc::new(InMemoryStore::banded(100, 40)),
        Arc::new(indexer),
        Arc::new(pool),
    );

    let options = options_from_json(r#"{ "layer": "raw", "page_size": 16, "format": "csr" }"#)?;
    println!("=== Paging {} obs x {} vars ===", ctx.n_obs(), ctx.n_vars());

    let start = Instant::now();
    let pages = x_sparse_iter(&ctx, &options)?;
    println!("{} pages of up to {} rows\n", pages.page_count(), options.page_size);

    for page in pages {
        let page = page?;
        let (obs, _) = page.coords();
        let (rows, cols) = page.matrix.dimensions();
        println!(
            "obs {:>3}..={:<3} {rows:>2} x {cols} with {:>2} stored values",
            obs.first().copied().unwrap_or_default(),
            obs.last().copied().unwrap_or_default(),
            page.matrix.nnz()
        );
        if let Some(first) = page.matrix.get_row(0).first() {
            println!("   first row: var[{}] = {}", first.0, first.1);
        }
    }

    println!("\nDone in {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}
