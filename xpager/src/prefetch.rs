//! Single-slot background prefetch of one pipeline stage
//!
//! [`Prefetch`] applies a stage function to the elements of its upstream,
//! computing the next result on a shared rayon pool while the consumer
//! works on the current one:
//!
//! ```text
//!  consumer ── next() ──▶ ┌──────────────┐  spawn   ┌──────────────┐
//!           ◀── item ──── │  slot (cap 1)│ ◀─────── │ stage(input) │
//!                         └──────────────┘  on pool └──────────────┘
//! ```
//!
//! The upstream iterator is only ever advanced on the consumer's thread.
//! Pool jobs receive an input that is already available and never wait on
//! another job, so stacked stages cannot starve the pool, whatever its
//! size. At most one element is in flight per wrapper, and elements come
//! out in upstream order.

use crossbeam_channel::{Receiver, RecvError, TryRecvError};
use rayon::{ThreadPool, Yield};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{PagerError, Result};

/// Boxed pipeline stage
pub type Stage<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

enum Slot<T> {
    /// Nothing requested yet
    Idle,
    /// The next result is being computed on the pool
    InFlight(Receiver<Result<T>>),
    /// Upstream exhausted, failed or lost
    Done,
}

/// Iterator adapter that keeps one stage result in flight on a pool
pub struct Prefetch<I, F, T> {
    upstream: I,
    stage: Arc<F>,
    pool: Arc<ThreadPool>,
    slot: Slot<T>,
}

impl<I, F, T> Prefetch<I, F, T>
where
    I: Iterator,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Result<T> + Send + Sync + 'static,
    T: Send + 'static,
{
    /// Apply `stage` to every element of `upstream`; no work is submitted
    /// until the first pull
    pub fn new(upstream: I, stage: F, pool: Arc<ThreadPool>) -> Self {
        Self {
            upstream,
            stage: Arc::new(stage),
            pool,
            slot: Slot::Idle,
        }
    }

    /// Pull the next upstream element and start its stage job
    fn submit_next(&mut self) -> Option<Receiver<Result<T>>> {
        let input = self.upstream.next()?;
        let (tx, rx) = crossbeam_channel::bounded(1);
        let stage = Arc::clone(&self.stage);
        tracing::trace!("prefetch: submitting next element");
        self.pool.spawn(move || {
            match panic::catch_unwind(AssertUnwindSafe(|| (*stage)(input))) {
                Ok(output) => {
                    // A closed slot means the consumer abandoned the iteration.
                    let _ = tx.send(output);
                }
                Err(_) => {
                    tracing::warn!("prefetch: stage panicked while producing an element");
                }
            }
        });
        Some(rx)
    }

    fn wait(&self, rx: &Receiver<Result<T>>) -> std::result::Result<Result<T>, RecvError> {
        loop {
            match rx.try_recv() {
                Ok(output) => return Ok(output),
                Err(TryRecvError::Disconnected) => return Err(RecvError),
                Err(TryRecvError::Empty) => {}
            }
            // A consumer running on the pool itself may find its own job
            // queued behind it.
            match self.pool.yield_now() {
                Some(Yield::Executed) => continue,
                Some(Yield::Idle) | None => return rx.recv(),
            }
        }
    }
}

impl<I, F, T> Iterator for Prefetch<I, F, T>
where
    I: Iterator,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Result<T> + Send + Sync + 'static,
    T: Send + 'static,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let rx = match std::mem::replace(&mut self.slot, Slot::Done) {
            Slot::Idle => self.submit_next()?,
            Slot::InFlight(rx) => rx,
            Slot::Done => return None,
        };

        let output = match self.wait(&rx) {
            Ok(output) => output,
            Err(RecvError) => return Some(Err(PagerError::WorkerLost)),
        };

        // Nothing is scheduled past a failed element.
        if output.is_ok() {
            if let Some(next) = self.submit_next() {
                self.slot = Slot::InFlight(next);
            }
        }
        Some(output)
    }
}

impl<I, F, T> std::iter::FusedIterator for Prefetch<I, F, T>
where
    I: Iterator,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Result<T> + Send + Sync + 'static,
    T: Send + 'static,
{
}

/// Apply `stage` to every element of `upstream`, behind a [`Prefetch`]
/// when `enabled` and inline otherwise
pub fn prefetch_stage<I, F, T>(
    upstream: I,
    stage: F,
    pool: &Arc<ThreadPool>,
    enabled: bool,
) -> Stage<T>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Result<T> + Send + Sync + 'static,
    T: Send + 'static,
{
    if enabled {
        Box::new(Prefetch::new(upstream, stage, Arc::clone(pool)))
    } else {
        Box::new(upstream.map(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn pool(threads: usize) -> Arc<ThreadPool> {
        Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap(),
        )
    }

    fn counted(calls: Arc<AtomicUsize>) -> impl Fn(usize) -> Result<usize> + Send + Sync {
        move |i| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(i)
        }
    }

    fn wait_for(counter: &AtomicUsize, expected: usize) -> usize {
        let deadline = Instant::now() + Duration::from_secs(5);
        while counter.load(Ordering::SeqCst) < expected && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        counter.load(Ordering::SeqCst)
    }

    #[test]
    fn test_preserves_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let items: Vec<usize> = Prefetch::new(0..50usize, counted(calls), pool(4))
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(items, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_lazy_until_first_pull() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pulled = Arc::new(AtomicUsize::new(0));
        let upstream = {
            let pulled = Arc::clone(&pulled);
            (0..10usize).inspect(move |_| {
                pulled.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _prefetch = Prefetch::new(upstream, counted(Arc::clone(&calls)), pool(2));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(pulled.load(Ordering::SeqCst), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_single_element_lookahead() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut prefetch = Prefetch::new(0..10usize, counted(Arc::clone(&calls)), pool(2));

        for pulled in 1..=5 {
            assert_eq!(prefetch.next().unwrap().unwrap(), pulled - 1);
            // The following element is scheduled before the pull returns.
            assert_eq!(wait_for(&calls, pulled + 1), pulled + 1);
            std::thread::sleep(Duration::from_millis(5));
            assert_eq!(calls.load(Ordering::SeqCst), pulled + 1);
        }
    }

    #[test]
    fn test_stops_after_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stage = {
            let calls = Arc::clone(&calls);
            move |i: usize| -> Result<usize> {
                calls.fetch_add(1, Ordering::SeqCst);
                if i == 2 {
                    Err(PagerError::Consistency(format!("bad element {i}")))
                } else {
                    Ok(i)
                }
            }
        };
        let mut prefetch = Prefetch::new(0..6usize, stage, pool(2));

        assert_eq!(prefetch.next().unwrap().unwrap(), 0);
        assert_eq!(prefetch.next().unwrap().unwrap(), 1);
        assert!(matches!(prefetch.next(), Some(Err(PagerError::Consistency(_)))));
        assert!(prefetch.next().is_none());

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_panicking_stage_reports_worker_lost() {
        let stage = |i: usize| -> Result<usize> {
            if i == 1 {
                panic!("stage exploded");
            }
            Ok(i)
        };
        let mut prefetch = Prefetch::new(0..3usize, stage, pool(2));

        assert_eq!(prefetch.next().unwrap().unwrap(), 0);
        assert!(matches!(prefetch.next(), Some(Err(PagerError::WorkerLost))));
        assert!(prefetch.next().is_none());
    }

    #[test]
    fn test_nested_stages_with_blocking_work() {
        for threads in [1, 2, 4] {
            let pool = pool(threads);
            let slow = |i: usize| -> Result<usize> {
                std::thread::sleep(Duration::from_micros(300 + (i as u64 % 5) * 200));
                Ok(i)
            };
            let stage1 = prefetch_stage(0..60usize, slow, &pool, true);
            let stage2 = prefetch_stage(stage1, |r: Result<usize>| r.map(|i| i * 2), &pool, true);
            let stage3 = prefetch_stage(stage2, |r: Result<usize>| r.map(|i| i + 1), &pool, true);

            let items: Vec<usize> = stage3.map(|r| r.unwrap()).collect();
            assert_eq!(items, (0..60).map(|i| i * 2 + 1).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_consumer_inside_single_thread_pool() {
        let pool = pool(1);
        let items: Vec<usize> = pool.install(|| {
            let stage1 = prefetch_stage(0..20usize, |i: usize| -> Result<usize> { Ok(i + 1) }, &pool, true);
            let stage2 = prefetch_stage(stage1, |r: Result<usize>| r.map(|i| i * 3), &pool, true);
            stage2.map(|r| r.unwrap()).collect()
        });
        assert_eq!(items, (1..=20).map(|i| i * 3).collect::<Vec<_>>());
    }

    #[test]
    fn test_abandoned_iteration_does_not_block() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut prefetch = Prefetch::new(0..100usize, counted(Arc::clone(&calls)), pool(2));
        prefetch.next();
        drop(prefetch);
        assert!(wait_for(&calls, 2) <= 2);
    }

    #[test]
    fn test_disabled_stage_is_inline() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut stage = prefetch_stage(0..3usize, counted(Arc::clone(&calls)), &pool(1), false);

        assert_eq!(stage.next().unwrap().unwrap(), 0);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
