use anyhow::{Result, anyhow, bail};
use crossbeam::channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bounded pool of worker threads that maps a function over a batch of items.
///
/// Results come back in submission order no matter which worker finished
/// first. The pool lives only for the duration of one [`ThreadPool::map`] call.
#[derive(Debug, Clone)]
pub struct ThreadPool {
    max_workers: usize,
    buffer_size: usize,
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, T, R, F> {
    worker_id: usize,
    work_rx: Receiver<(usize, T)>,
    result_tx: Sender<(usize, R)>,
    completed: &'a AtomicUsize,
    total_items: usize,
    processor: &'a F,
}

impl ThreadPool {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers * 2,
        }
    }

    pub fn size(&self) -> usize {
        self.max_workers
    }

    /// Run `processor` over every item, at most `size()` at a time.
    ///
    /// Never spawns more threads than there are items. A panicking worker
    /// fails the whole batch.
    pub fn map<T, R, F>(&self, work_items: Vec<T>, processor: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        if work_items.is_empty() {
            return Ok(Vec::new());
        }

        let total_items = work_items.len();
        let actual_workers = std::cmp::min(self.max_workers, total_items);
        let (work_tx, work_rx): (Sender<(usize, T)>, Receiver<(usize, T)>) =
            bounded(self.buffer_size);
        let (result_tx, result_rx): (Sender<(usize, R)>, Receiver<(usize, R)>) =
            bounded(self.buffer_size);
        let completed = AtomicUsize::new(0);

        tracing::debug!(
            "Thread pool starting: {} items on {} workers",
            total_items,
            actual_workers
        );

        let mut indexed = crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    completed: &completed,
                    total_items,
                    processor: &processor,
                };

                s.spawn(move |_| worker_thread(ctx));
            }

            // Producer thread: send indexed work to workers
            s.spawn(move |_| {
                for (index, work_item) in work_items.into_iter().enumerate() {
                    if work_tx.send((index, work_item)).is_err() {
                        break; // Workers dropped
                    }
                }
            });

            // Only workers may hold these, so channels close when they finish
            drop(work_rx);
            drop(result_tx);

            collect_results(result_rx, total_items)
        })
        .map_err(|_| anyhow!("Thread panic occurred during parallel execution"))?;

        if indexed.len() != total_items {
            bail!(
                "Thread pool returned {} results for {} items",
                indexed.len(),
                total_items
            );
        }

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, result)| result).collect())
    }
}

fn worker_thread<T, R, F>(ctx: WorkerContext<'_, T, R, F>)
where
    F: Fn(T) -> R,
{
    while let Ok((index, work_item)) = ctx.work_rx.recv() {
        let result = (ctx.processor)(work_item);

        if ctx.result_tx.send((index, result)).is_err() {
            break; // Receiver dropped
        }

        let current = ctx.completed.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::trace!(
            "worker-{} finished item #{} ({}/{})",
            ctx.worker_id,
            index,
            current,
            ctx.total_items
        );
    }
}

fn collect_results<R>(result_rx: Receiver<(usize, R)>, total_items: usize) -> Vec<(usize, R)> {
    let mut results = Vec::with_capacity(total_items);

    while let Ok(result) = result_rx.recv() {
        results.push(result);

        if results.len() >= total_items {
            break;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_map_preserves_submission_order() {
        let pool = ThreadPool::new(4);
        // Later items finish first
        let results = pool
            .map(vec![5u64, 4, 3, 2, 1], |x| {
                std::thread::sleep(Duration::from_millis(x * 10));
                x * 2
            })
            .unwrap();
        assert_eq!(results, vec![10, 8, 6, 4, 2]);
    }

    #[test]
    fn test_map_empty_batch() {
        let pool = ThreadPool::new(3);
        let results: Vec<u64> = pool.map(Vec::<u64>::new(), |x| x).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_zero_size_is_clamped_to_one() {
        let pool = ThreadPool::new(0);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.map(vec![1, 2, 3], |x: i32| x + 1).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_waits_overlap_across_workers() {
        let pool = ThreadPool::new(8);
        let start = Instant::now();
        let results = pool
            .map((0..8).collect::<Vec<u32>>(), |x| {
                std::thread::sleep(Duration::from_millis(100));
                x
            })
            .unwrap();
        assert_eq!(results.len(), 8);
        // Eight sequential waits would be 800ms
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_worker_panic_becomes_error() {
        let pool = ThreadPool::new(2);
        let result = pool.map(vec![1, 2, 3], |x: i32| {
            if x == 2 {
                panic!("boom");
            }
            x
        });
        assert!(result.is_err());
    }
}
