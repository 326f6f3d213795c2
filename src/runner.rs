use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::config::Config;
use crate::level::Level;
use crate::solver::{Solver, SolverErr, SolverOk};

type SolverResult = Result<SolverOk, SolverErr>;

/// A search running on its own thread.
///
/// The result is published exactly once. Cancelling makes the search stop
/// before its next expansion and report `Outcome::TimedOut`.
#[derive(Debug)]
pub struct BackgroundSolver {
    cancel: Arc<AtomicBool>,
    receiver: Receiver<SolverResult>,
    handle: JoinHandle<()>,
    started: Instant,
}

impl BackgroundSolver {
    pub fn spawn(level: Level, print_status: bool) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::channel();

        let worker_cancel = Arc::clone(&cancel);
        let handle = thread::spawn(move || {
            let result = Solver::new(&level).map(|solver| {
                solver.search(print_status, |_| worker_cancel.load(Ordering::Relaxed))
            });
            // nobody might be listening anymore
            let _ = sender.send(result);
        });

        BackgroundSolver {
            cancel,
            receiver,
            handle,
            started: Instant::now(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the search ends on its own or after being cancelled
    pub fn join(self) -> SolverResult {
        let received = self.receiver.recv();
        self.collect(received)
    }

    /// Waits at most `timeout`, then cancels the search and returns whatever it reports.
    pub fn wait(self, timeout: Duration) -> SolverResult {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => self.collect(Ok(result)),
            Err(RecvTimeoutError::Timeout) => {
                info!("Timeout of {} ms reached, cancelling", timeout.as_millis());
                self.cancel();
                self.join()
            }
            Err(RecvTimeoutError::Disconnected) => self.collect(Err(RecvError)),
        }
    }

    fn collect(self, received: Result<SolverResult, RecvError>) -> SolverResult {
        if let Err(payload) = self.handle.join() {
            panic::resume_unwind(payload);
        }
        debug!("Search thread finished after {} ms", self.started.elapsed().as_millis());
        // the worker always sends unless it panicked
        received.unwrap_or_else(|_| unreachable!("search thread exited without a result"))
    }
}

/// Solves on a background thread, giving up after `config.timeout` if there is one
pub fn solve(level: Level, config: &Config) -> SolverResult {
    let solver = BackgroundSolver::spawn(level, config.print_status);
    match config.timeout {
        Some(timeout) => solver.wait(timeout),
        None => solver.join(),
    }
}
