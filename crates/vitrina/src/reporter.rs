//! Step recording and scenario reports.
//!
//! Recorders are purely observational: the engine and page objects notify
//! them with human-readable progress messages (and, from the CLI, binary
//! attachments such as failure screenshots), and nothing they do affects
//! control flow. The step log is also the only audit trail of which item
//! failed; the engine itself returns just a boolean.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Sink for human-readable progress messages
pub trait StepRecorder {
    /// Record one progress message
    fn step(&self, message: &str);

    /// Record a named binary attachment. Default: dropped.
    fn attach(&self, _name: &str, _mime: &str, _bytes: &[u8]) {}
}

/// Recorder that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl StepRecorder for NullRecorder {
    fn step(&self, _message: &str) {}
}

/// Recorder that forwards steps to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRecorder;

impl StepRecorder for TracingRecorder {
    fn step(&self, message: &str) {
        tracing::info!(target: "vitrina::steps", "{message}");
    }

    fn attach(&self, name: &str, mime: &str, bytes: &[u8]) {
        tracing::debug!(
            target: "vitrina::steps",
            name,
            mime,
            len = bytes.len(),
            "attachment recorded"
        );
    }
}

/// Recorder that keeps steps in memory, for assertions in tests and for
/// building a [`ScenarioReport`] afterwards.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    entries: Mutex<Vec<StepEntry>>,
}

/// One recorded step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepEntry {
    /// The message
    pub message: String,
    /// When it was recorded
    pub timestamp: SystemTime,
}

impl MemoryRecorder {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages, in order
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.iter().map(|e| e.message.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of recorded steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorded entries with timestamps
    #[must_use]
    pub fn entries(&self) -> Vec<StepEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl StepRecorder for MemoryRecorder {
    fn step(&self, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(StepEntry {
                message: message.to_string(),
                timestamp: SystemTime::now(),
            });
        }
    }
}

/// Outcome of one scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Every assertion held
    Passed,
    /// An assertion failed
    Failed,
    /// An infrastructure error aborted the run
    Aborted,
}

impl ScenarioStatus {
    /// Whether this status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Serializable record of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// Outcome
    pub status: ScenarioStatus,
    /// Failure or abort message, when any
    pub error: Option<String>,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// Recorded steps
    pub steps: Vec<StepEntry>,
}

impl ScenarioReport {
    /// Build a report from a finished run
    #[must_use]
    pub fn new(
        status: ScenarioStatus,
        error: Option<String>,
        duration: Duration,
        steps: Vec<StepEntry>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status,
            error,
            duration,
            steps,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
