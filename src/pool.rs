//! Fixed-size worker pool with an explicit counted barrier.
//!
//! Built directly on `std::thread` and `std::sync::{Mutex, Condvar}`: a
//! generic scheduler crate (`rayon`, `threadpool`) would pull in more than
//! the small, precise contract this engine needs.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    queue: Mutex<VecDeque<Task>>,
    condvar: Condvar,
    shutdown: Mutex<bool>,
}

/// A fixed-size pool of worker threads that consume posted closures from a
/// shared queue until `WorkPool` is dropped.
pub struct WorkPool {
    shared: Arc<Shared>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkPool {
    /// Spawns `num_threads` worker threads (minimum 1).
    pub fn new(num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: Mutex::new(false),
        });

        let mut workers = Vec::with_capacity(num_threads);
        for _ in 0..num_threads {
            let shared = Arc::clone(&shared);
            workers.push(thread::spawn(move || worker_loop(shared)));
        }

        WorkPool { shared, workers }
    }

    /// Posts a task to be run by the first available worker. Returns
    /// immediately; the caller uses a [`SafeCounter`] to learn when posted
    /// work has completed.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.shared.queue.lock().unwrap();
        queue.push_back(Box::new(task));
        self.shared.condvar.notify_one();
    }

    /// Creates a fresh [`SafeCounter`] tied to this pool's wakeups. Counters
    /// are independent of each other -- a pool can have several barriers in
    /// flight as long as their task closures only touch their own counter.
    pub fn counter(&self) -> SafeCounter {
        SafeCounter::new()
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let task = {
            let mut queue = shared.queue.lock().unwrap();
            loop {
                if let Some(task) = queue.pop_front() {
                    break Some(task);
                }
                if *shared.shutdown.lock().unwrap() {
                    break None;
                }
                queue = shared.condvar.wait(queue).unwrap();
            }
        };
        match task {
            Some(task) => task(),
            None => break,
        }
    }
}

impl Drop for WorkPool {
    fn drop(&mut self) {
        *self.shared.shutdown.lock().unwrap() = true;
        self.shared.condvar.notify_all();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

struct CounterState {
    remaining: usize,
}

/// A counted barrier: `init(n)` arms it for `n` expected completions,
/// `increment()` is called once per completed task, and `wait()` blocks the
/// posting thread until the count reaches zero.
#[derive(Clone)]
pub struct SafeCounter {
    state: Arc<(Mutex<CounterState>, Condvar)>,
}

impl SafeCounter {
    fn new() -> Self {
        SafeCounter {
            state: Arc::new((Mutex::new(CounterState { remaining: 0 }), Condvar::new())),
        }
    }

    /// Arms the barrier to expect `n` completions. Must be called before any
    /// matching `increment()`/`wait()` pair; `n == 0` makes `wait()` return
    /// immediately.
    pub fn init(&self, n: usize) {
        let (lock, _) = &*self.state;
        lock.lock().unwrap().remaining = n;
    }

    /// Records one completed task, waking `wait()` once `remaining` reaches
    /// zero.
    pub fn increment(&self) {
        let (lock, condvar) = &*self.state;
        let mut state = lock.lock().unwrap();
        debug_assert!(state.remaining > 0, "increment() past init() count");
        state.remaining = state.remaining.saturating_sub(1);
        if state.remaining == 0 {
            condvar.notify_all();
        }
    }

    /// Blocks until `remaining` reaches zero.
    pub fn wait(&self) {
        let (lock, condvar) = &*self.state;
        let mut state = lock.lock().unwrap();
        while state.remaining > 0 {
            state = condvar.wait(state).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_all_posted_tasks() {
        let pool = WorkPool::new(4);
        let counter = pool.counter();
        let total = Arc::new(AtomicUsize::new(0));
        counter.init(100);
        for _ in 0..100 {
            let total = Arc::clone(&total);
            let counter = counter.clone();
            pool.post(move || {
                total.fetch_add(1, Ordering::SeqCst);
                counter.increment();
            });
        }
        counter.wait();
        assert_eq!(total.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn wait_with_zero_tasks_returns_immediately() {
        let pool = WorkPool::new(2);
        let counter = pool.counter();
        counter.init(0);
        counter.wait();
    }

    #[test]
    fn independent_counters_do_not_interfere() {
        let pool = WorkPool::new(2);
        let c1 = pool.counter();
        let c2 = pool.counter();
        let hits1 = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::new(AtomicUsize::new(0));

        c1.init(5);
        for _ in 0..5 {
            let hits1 = Arc::clone(&hits1);
            let c1 = c1.clone();
            pool.post(move || {
                hits1.fetch_add(1, Ordering::SeqCst);
                c1.increment();
            });
        }
        c1.wait();
        assert_eq!(hits1.load(Ordering::SeqCst), 5);

        c2.init(3);
        for _ in 0..3 {
            let hits2 = Arc::clone(&hits2);
            let c2 = c2.clone();
            pool.post(move || {
                hits2.fetch_add(1, Ordering::SeqCst);
                c2.increment();
            });
        }
        c2.wait();
        assert_eq!(hits2.load(Ordering::SeqCst), 3);
    }
}
