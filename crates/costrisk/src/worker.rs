//! Background worker for running scenario analyses off the main thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use costrisk_core::{RiskAnalysisError, SimulationResult};

use crate::scenario::Scenario;

/// Request sent to the background worker
#[derive(Debug)]
pub enum WorkerRequest {
    /// Analyze one scenario
    Run(Box<Scenario>),
    /// Graceful shutdown
    Shutdown,
}

/// Response from the background worker
#[derive(Debug)]
pub enum WorkerResponse {
    /// Scenario analyzed (boxed to reduce enum size)
    Complete {
        scenario: Box<Scenario>,
        result: Box<SimulationResult>,
    },
    /// Scenario skipped after cancellation
    Cancelled { name: String },
    /// Analysis rejected the scenario
    Error {
        name: String,
        error: RiskAnalysisError,
    },
}

impl WorkerResponse {
    pub fn name(&self) -> &str {
        match self {
            Self::Complete { scenario, .. } => &scenario.name,
            Self::Cancelled { name } | Self::Error { name, .. } => name,
        }
    }
}

/// Background worker that runs analyses on a separate thread
pub struct AnalysisWorker {
    request_tx: Sender<WorkerRequest>,
    response_rx: Receiver<WorkerResponse>,
    cancel_flag: Arc<AtomicBool>,
    completed: Arc<AtomicUsize>,
    thread: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Create a new analysis worker with a background thread
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let completed = Arc::new(AtomicUsize::new(0));

        let ctx = WorkerContext {
            response_tx,
            cancel_flag: cancel_flag.clone(),
            completed: completed.clone(),
        };

        let thread = thread::spawn(move || {
            ctx.run(request_rx);
        });

        Self {
            request_tx,
            response_rx,
            cancel_flag,
            completed,
            thread: Some(thread),
        }
    }

    /// Queue a scenario; returns false if the worker has stopped
    pub fn send(&self, scenario: Scenario) -> bool {
        self.request_tx
            .send(WorkerRequest::Run(Box::new(scenario)))
            .is_ok()
    }

    /// Block until the next response arrives
    pub fn recv(&self) -> Option<WorkerResponse> {
        self.response_rx.recv().ok()
    }

    /// Number of scenarios the worker has finished with
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Skip every queued scenario not yet started
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    /// Shutdown the worker thread
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
    }
}

impl Default for AnalysisWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Shared state for the background worker thread.
struct WorkerContext {
    response_tx: Sender<WorkerResponse>,
    cancel_flag: Arc<AtomicBool>,
    completed: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn run(&self, request_rx: Receiver<WorkerRequest>) {
        while let Ok(request) = request_rx.recv() {
            let scenario = match request {
                WorkerRequest::Run(scenario) => scenario,
                WorkerRequest::Shutdown => {
                    tracing::debug!("Analysis worker shutting down");
                    break;
                }
            };

            let response = if self.cancel_flag.load(Ordering::SeqCst) {
                WorkerResponse::Cancelled {
                    name: scenario.name.clone(),
                }
            } else {
                self.analyze(scenario)
            };

            self.completed.fetch_add(1, Ordering::SeqCst);
            if self.response_tx.send(response).is_err() {
                break;
            }
        }
    }

    fn analyze(&self, scenario: Box<Scenario>) -> WorkerResponse {
        tracing::info!("Analyzing scenario '{}'", scenario.name);
        match scenario.request.run() {
            Ok(result) => WorkerResponse::Complete {
                scenario,
                result: Box::new(result),
            },
            Err(error) => {
                tracing::error!(
                    "Scenario '{}' rejected [{}]: {error}",
                    scenario.name,
                    error.code()
                );
                WorkerResponse::Error {
                    name: scenario.name,
                    error,
                }
            }
        }
    }
}
