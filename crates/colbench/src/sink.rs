//! Out-of-band persistence of benchmark records.
//!
//! The runner hands each finished [`BenchmarkRecord`] to a [`SinkHandle`] and moves on. A worker
//! thread drains a bounded queue into a [`ResultSink`]; persistence failures are logged and
//! counted there, never reported back to the runner.

use colbench_storage::{BenchmarkRecord, ResultStore, StorageError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to start sink worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("sink worker panicked")]
    WorkerPanicked,
}

/// Destination for benchmark records.
pub trait ResultSink: Send + 'static {
    fn write_record(&mut self, record: &BenchmarkRecord) -> Result<(), SinkError>;
}

impl ResultSink for ResultStore {
    fn write_record(&mut self, record: &BenchmarkRecord) -> Result<(), SinkError> {
        let id = self.insert_record(record)?;
        log::debug!(
            "stored result #{id} ({} {} {})",
            record.format,
            record.size,
            record.complexity
        );
        Ok(())
    }
}

/// What to do when the queue to the sink worker is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backpressure {
    /// Wait for queue space. No record is lost while the worker is alive.
    #[default]
    Block,
    /// Discard the record being dispatched and count it as dropped.
    DropNewest,
}

impl Backpressure {
    pub fn as_str(self) -> &'static str {
        match self {
            Backpressure::Block => "block",
            Backpressure::DropNewest => "drop-newest",
        }
    }
}

impl fmt::Display for Backpressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backpressure policy `{0}` (expected block or drop-newest)")]
pub struct UnknownBackpressure(pub String);

impl FromStr for Backpressure {
    type Err = UnknownBackpressure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(Backpressure::Block),
            "drop-newest" | "drop" => Ok(Backpressure::DropNewest),
            _ => Err(UnknownBackpressure(s.to_owned())),
        }
    }
}

enum Message {
    Record(Box<BenchmarkRecord>),
    Shutdown,
}

/// Counters reported by [`SinkWorker::shutdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SinkReport {
    pub written: u64,
    pub failed: u64,
    pub dropped: u64,
}

/// Cloneable sending side of the sink queue.
#[derive(Debug, Clone)]
pub struct SinkHandle {
    tx: SyncSender<Message>,
    policy: Backpressure,
    dropped: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
}

impl SinkHandle {
    /// Queue `record` for persistence without waiting for it to be written.
    ///
    /// Returns `false` if the record was dropped, either by the [`Backpressure::DropNewest`]
    /// policy or because [`SinkWorker::shutdown`] has been called.
    pub fn dispatch(&self, record: BenchmarkRecord) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        let message = Message::Record(Box::new(record));
        let sent = match self.policy {
            Backpressure::Block => self.tx.send(message).is_ok(),
            Backpressure::DropNewest => match self.tx.try_send(message) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    log::warn!("result queue is full; dropping record");
                    false
                }
                Err(TrySendError::Disconnected(_)) => false,
            },
        };
        if !sent {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    pub fn policy(&self) -> Backpressure {
        self.policy
    }

    /// Records dropped so far through any handle of the same worker.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Owner of the sink worker thread.
#[derive(Debug)]
pub struct SinkWorker {
    handle: SinkHandle,
    join: JoinHandle<(u64, u64)>,
}

impl SinkWorker {
    /// Start a worker draining a queue of at most `capacity` pending records into `sink`.
    pub fn spawn<S: ResultSink>(
        sink: S,
        capacity: usize,
        policy: Backpressure,
    ) -> Result<Self, SinkError> {
        let (tx, rx) = mpsc::sync_channel::<Message>(capacity);
        let join = thread::Builder::new()
            .name("colbench-sink".to_string())
            .spawn(move || drain(sink, rx))
            .map_err(SinkError::Spawn)?;

        Ok(Self {
            handle: SinkHandle {
                tx,
                policy,
                dropped: Arc::new(AtomicU64::new(0)),
                closed: Arc::new(AtomicBool::new(false)),
            },
            join,
        })
    }

    pub fn handle(&self) -> SinkHandle {
        self.handle.clone()
    }

    /// Persist everything queued so far, stop the worker and report its counters.
    ///
    /// Dispatches that start after this call are refused and counted as dropped. Records that
    /// raced into the queue while the worker was stopping are still written.
    pub fn shutdown(self) -> Result<SinkReport, SinkError> {
        self.handle.closed.store(true, Ordering::SeqCst);
        // A disconnected queue means the worker already exited; `join` reports why.
        let _ = self.handle.tx.send(Message::Shutdown);
        let (written, failed) = self.join.join().map_err(|_| SinkError::WorkerPanicked)?;
        Ok(SinkReport {
            written,
            failed,
            dropped: self.handle.dropped.load(Ordering::Relaxed),
        })
    }
}

fn drain<S: ResultSink>(mut sink: S, rx: Receiver<Message>) -> (u64, u64) {
    let mut counts = (0, 0);
    while let Ok(message) = rx.recv() {
        match message {
            Message::Record(record) => persist(&mut sink, &record, &mut counts),
            Message::Shutdown => break,
        }
    }
    for message in rx.try_iter() {
        if let Message::Record(record) = message {
            persist(&mut sink, &record, &mut counts);
        }
    }
    counts
}

/// `counts` is `(written, failed)`.
fn persist<S: ResultSink>(sink: &mut S, record: &BenchmarkRecord, counts: &mut (u64, u64)) {
    match sink.write_record(record) {
        Ok(()) => counts.0 += 1,
        Err(err) => {
            counts.1 += 1;
            log::error!(
                "failed to persist result for {} {} {}: {err}",
                record.format,
                record.size,
                record.complexity
            );
        }
    }
}
