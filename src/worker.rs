//! Background path computation
//!
//! Path searches run off the simulation thread on a small pool of workers.
//! Followers submit a request and get back a one-shot receiver they poll
//! each tick; results are consumed on the first tick after completion and
//! never block the simulation loop. Jobs are never cancelled; once issued
//! they run to completion.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use glam::Vec2;

use crate::navigator::{NavError, Navigator};

/// Result of one background path computation
#[derive(Debug, Clone)]
pub struct PathOutcome {
    /// The goal position this computation used, recorded by the follower
    /// for staleness comparison
    pub goal: Vec2,
    /// The computed waypoint path, or the failure to find one
    pub result: Result<Vec<Vec2>, NavError>,
}

/// One queued path computation
struct PathJob {
    start: Vec2,
    goal: Vec2,
    reply: Sender<PathOutcome>,
}

/// Fixed pool of worker threads serving path requests.
///
/// The grid behind the navigator never mutates, so workers read it without
/// locking; the only shared mutable state is the job queue itself.
pub struct WorkerPool {
    /// Job submission side; dropped on shutdown to stop the workers
    jobs: Option<Sender<PathJob>>,
    /// Worker thread handles, joined on drop
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn a pool of `workers` threads (at least one) computing paths
    /// with the given navigator
    #[must_use]
    pub fn new(navigator: Navigator, workers: usize) -> Self {
        let workers = workers.max(1);
        let (tx, rx) = mpsc::channel::<PathJob>();
        let rx = Arc::new(Mutex::new(rx));

        let handles = (0..workers)
            .map(|_| {
                let rx = Arc::clone(&rx);
                let navigator = navigator.clone();
                std::thread::spawn(move || worker_loop(&navigator, &rx))
            })
            .collect();

        log::debug!("spawned {workers} path workers");

        Self {
            jobs: Some(tx),
            handles,
        }
    }

    /// Number of worker threads
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Queue a path computation and return the receiver for its outcome.
    ///
    /// The call never blocks. If the pool has already shut down the request
    /// is dropped and the receiver simply reports a disconnect.
    pub fn submit(&self, start: Vec2, goal: Vec2) -> Receiver<PathOutcome> {
        let (tx, rx) = mpsc::channel();

        if let Some(jobs) = &self.jobs {
            if jobs.send(PathJob {
                start,
                goal,
                reply: tx,
            })
            .is_err()
            {
                log::warn!("path request dropped: worker pool is shut down");
            }
        }

        rx
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the job channel makes every worker's recv fail
        self.jobs = None;
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(navigator: &Navigator, jobs: &Mutex<Receiver<PathJob>>) {
    loop {
        let job = {
            let Ok(guard) = jobs.lock() else { break };
            guard.recv()
        };
        let Ok(job) = job else { break };

        let result = navigator.find_path(job.start, job.goal);
        if job.reply.send(PathOutcome {
            goal: job.goal,
            result,
        })
        .is_err()
        {
            log::debug!("path result dropped: requester went away");
        }
    }
}
