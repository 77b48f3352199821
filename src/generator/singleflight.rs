//! Keyed single-flight execution
//!
//! A [`SingleFlight`] maps keys to in-flight work. The first caller for a
//! key becomes the leader and runs the work; callers arriving while the
//! key is occupied attach to the same outcome instead of starting their
//! own. Each cell is a `watch` channel, so late waiters still observe a
//! published value, and the cell is removed unconditionally when the
//! leader finishes — by a drop guard, so even a cancelled leader cannot
//! strand its waiters.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

type CellMap<K, V> = Arc<Mutex<HashMap<K, watch::Receiver<Option<V>>>>>;

/// Registry of per-key in-flight operations
pub struct SingleFlight<K, V> {
    cells: CellMap<K, V>,
}

enum Role<V> {
    Leader(watch::Sender<Option<V>>),
    Waiter(watch::Receiver<Option<V>>),
}

/// Removes the leader's cell when it goes out of scope
struct CellGuard<K: Eq + Hash, V> {
    cells: CellMap<K, V>,
    key: K,
}

impl<K: Eq + Hash, V> Drop for CellGuard<K, V> {
    fn drop(&mut self) {
        self.cells.lock().unwrap().remove(&self.key);
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            cells: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `work` for `key`, or attach to the run already in flight.
    ///
    /// Every caller for the same key receives a clone of the same value.
    pub async fn run<F, Fut>(&self, key: K, work: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let mut work = Some(work);

        loop {
            let role = {
                let mut cells = self.cells.lock().unwrap();
                match cells.get(&key) {
                    Some(rx) => Role::Waiter(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        cells.insert(key.clone(), rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let _guard = CellGuard {
                        cells: Arc::clone(&self.cells),
                        key: key.clone(),
                    };
                    let work = work.take().expect("leader role is taken at most once");
                    let value = work().await;
                    let _ = tx.send(Some(value.clone()));
                    return value;
                }
                Role::Waiter(mut rx) => {
                    match rx.wait_for(|cell| cell.is_some()).await {
                        Ok(cell) => {
                            return cell.clone().expect("wait_for guarantees a value");
                        }
                        // Leader vanished without publishing; contend again
                        Err(_) => continue,
                    }
                }
            }
        }
    }

    /// Number of keys currently in flight
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.lock().unwrap().is_empty()
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_caller_runs_work() {
        let flight: SingleFlight<&str, u32> = SingleFlight::new();
        let value = flight.run("k", || async { 7 }).await;
        assert_eq!(value, 7);
        assert!(flight.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_execution() {
        let flight: Arc<SingleFlight<String, u32>> = Arc::new(SingleFlight::new());
        let executions = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flight = Arc::clone(&flight);
            let executions = Arc::clone(&executions);
            handles.push(tokio::spawn(async move {
                flight
                    .run("day".to_string(), || async {
                        executions.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        42
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(executions.load(Ordering::SeqCst), 1);
        assert!(flight.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_calls_rerun() {
        let flight: SingleFlight<&str, u32> = SingleFlight::new();
        let executions = AtomicUsize::new(0);

        for _ in 0..3 {
            flight
                .run("k", || async {
                    executions.fetch_add(1, Ordering::SeqCst);
                    1
                })
                .await;
        }

        assert_eq!(executions.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let flight: Arc<SingleFlight<u32, u32>> = Arc::new(SingleFlight::new());

        let a = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move { flight.run(1, || async { 10 }).await })
        };
        let b = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move { flight.run(2, || async { 20 }).await })
        };

        assert_eq!(a.await.unwrap(), 10);
        assert_eq!(b.await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_cancelled_leader_does_not_strand_waiters() {
        let flight: Arc<SingleFlight<&'static str, u32>> = Arc::new(SingleFlight::new());

        let leader = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move {
                flight
                    .run("k", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        1
                    })
                    .await
            })
        };

        // Let the leader occupy the cell, then kill it
        tokio::time::sleep(Duration::from_millis(20)).await;
        leader.abort();
        let _ = leader.await;

        // A fresh caller must be able to take over the key
        let value = tokio::time::timeout(
            Duration::from_secs(5),
            flight.run("k", || async { 99 }),
        )
        .await
        .unwrap();
        assert_eq!(value, 99);
    }
}
