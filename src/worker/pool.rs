//! Fixed-size pool of worker threads.
//!
//! Messages are queued on one channel and picked up by whichever thread is
//! free, so responses may come back in any order. Each response is handed to
//! the `deliver` callback, typically forwarding it into the event loop.

use crate::domain::{MovieMatchError, Result};
use crate::worker::{MovieWorker, WorkerMessage, WorkerResponse};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

type Deliver = Arc<dyn Fn(WorkerResponse) + Send + Sync>;

/// Handle to the running worker threads.
pub struct WorkerPool {
    sender: Option<Sender<WorkerMessage>>,
    threads: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").field("threads", &self.threads.len()).finish()
    }
}

impl WorkerPool {
    /// Starts `size` threads (at least one) sharing `worker`.
    ///
    /// # Errors
    ///
    /// Returns [`MovieMatchError::Worker`] if a thread cannot be spawned.
    pub fn start<F>(size: usize, worker: MovieWorker, deliver: F) -> Result<Self>
    where
        F: Fn(WorkerResponse) + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel::<WorkerMessage>();
        let receiver = Arc::new(Mutex::new(receiver));
        let deliver: Deliver = Arc::new(deliver);

        let threads = (0..size.max(1))
            .map(|index| {
                let receiver = Arc::clone(&receiver);
                let worker = worker.clone();
                let deliver = Arc::clone(&deliver);
                std::thread::Builder::new()
                    .name(format!("moviematch-worker-{index}"))
                    .spawn(move || run_worker(&receiver, &worker, &deliver))
                    .map_err(|e| MovieMatchError::Worker(format!("failed to spawn worker thread: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(threads = threads.len(), "worker pool started");
        Ok(Self { sender: Some(sender), threads })
    }

    /// Queues a message for the next free worker.
    ///
    /// # Errors
    ///
    /// Returns [`MovieMatchError::Worker`] if the pool has shut down.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| MovieMatchError::Worker("worker pool is shut down".to_string()))?;
        tracing::debug!(message_type = message.kind(), "posting to worker pool");
        sender
            .send(message)
            .map_err(|_| MovieMatchError::Worker("all worker threads have exited".to_string()))
    }

    /// Stops accepting messages and waits for queued ones to finish.
    pub fn shutdown(&mut self) {
        self.sender = None;
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: &Mutex<Receiver<WorkerMessage>>, worker: &MovieWorker, deliver: &Deliver) {
    loop {
        let next = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => {
                tracing::warn!("worker queue lock poisoned, exiting");
                return;
            }
        };
        let Ok(message) = next else {
            tracing::trace!("worker queue closed");
            return;
        };
        deliver(worker.handle_message(message));
    }
}
