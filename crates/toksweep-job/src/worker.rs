//! Background job execution on a dedicated thread.
//!
//! One worker runs at most one job at a time; a start request while a job
//! is still running is ignored, mirroring the single-flight contract of the
//! streaming protocol. Messages flow over an mpsc channel. Dropping the
//! handle detaches the job: remaining messages are discarded and the thread
//! finishes on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{mpsc, Arc};
use std::thread;

use toksweep_core::{JobConfig, RunProvenance, TokenizerProvider};
use tracing::warn;

use crate::protocol::JobMessage;
use crate::runner;

/// Receiving side of one spawned job.
pub struct JobHandle {
    receiver: Receiver<JobMessage>,
    thread: Option<thread::JoinHandle<()>>,
    finished: Arc<AtomicBool>,
}

impl JobHandle {
    /// Blocks for the next message; `None` once the job thread has exited
    /// and the channel drained.
    pub fn recv(&self) -> Option<JobMessage> {
        self.receiver.recv().ok()
    }

    /// Non-blocking poll for the next message.
    pub fn try_recv(&self) -> Option<JobMessage> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Whether the job thread has emitted its terminal message and exited
    /// its work loop. Buffered messages may still be pending.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Waits for the job to finish and drains every remaining message in
    /// emission order.
    pub fn wait(mut self) -> Vec<JobMessage> {
        let mut messages: Vec<JobMessage> = self.receiver.iter().collect();
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("job thread panicked");
                messages.push(JobMessage::Error {
                    message: "job thread panicked".to_string(),
                    stack: None,
                });
            }
        }
        messages
    }
}

/// Spawns `config` on a fresh thread and returns the message handle.
pub fn spawn_job(
    config: JobConfig,
    provider: Box<dyn TokenizerProvider + 'static>,
    provenance: RunProvenance,
) -> JobHandle {
    let (sender, receiver) = mpsc::channel();
    let finished = Arc::new(AtomicBool::new(false));
    let finished_flag = Arc::clone(&finished);
    let thread = thread::spawn(move || {
        let mut emit = |message: JobMessage| {
            // A dropped handle just discards output; the job still ends
            // with its terminal message.
            let _ = sender.send(message);
        };
        runner::execute(&config, provider.as_ref(), &provenance, &mut emit);
        finished_flag.store(true, Ordering::Release);
    });
    JobHandle {
        receiver,
        thread: Some(thread),
        finished,
    }
}

/// Single-flight wrapper around [`spawn_job`].
#[derive(Default)]
pub struct JobWorker {
    active: Option<JobHandle>,
}

impl JobWorker {
    /// Creates an idle worker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a job unless one is already running. Returns `false` when the
    /// request was ignored.
    pub fn start(
        &mut self,
        config: JobConfig,
        provider: Box<dyn TokenizerProvider + 'static>,
        provenance: RunProvenance,
    ) -> bool {
        if let Some(handle) = &self.active {
            if !handle.is_finished() {
                warn!(job_id = %config.job_id, "job start ignored, worker busy");
                return false;
            }
        }
        self.active = Some(spawn_job(config, provider, provenance));
        true
    }

    /// Borrows the handle of the most recently started job.
    pub fn handle(&self) -> Option<&JobHandle> {
        self.active.as_ref()
    }

    /// Takes ownership of the current job handle, leaving the worker idle.
    pub fn take(&mut self) -> Option<JobHandle> {
        self.active.take()
    }
}
