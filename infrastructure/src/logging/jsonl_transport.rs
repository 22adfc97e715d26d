//! JSONL file transport for offline runs and debugging.
//!
//! Each shipped record and each feedback call is serialized as a single JSON
//! line `{"type", "timestamp", "data"}`, appended to the file via a buffered
//! writer. The payload always sits under `data`, so caller extension fields
//! can never clash with the envelope keys.

use async_trait::async_trait;
use phospho_application::{Credentials, LogTransport, TransportError};
use phospho_domain::{FeedbackPayload, LogRecord, TaskId};
use serde::Serialize;
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Transport that appends one JSON object per line instead of calling the collector.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every call and on `Drop`.
pub struct JsonlTransport {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTransport {
    /// Open (or create) the file at `path` in append mode.
    ///
    /// Parent directories are created if they don't exist.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wrap `payload` in the `type` / `timestamp` / `data` envelope.
    fn line<T: Serialize>(event_type: &str, payload: &T) -> Result<String, TransportError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let payload = serde_json::to_value(payload)
            .map_err(|e| TransportError::SerializationError(e.to_string()))?;

        let record = json!({
            "type": event_type,
            "timestamp": timestamp,
            "data": payload,
        });

        serde_json::to_string(&record).map_err(|e| TransportError::SerializationError(e.to_string()))
    }

    fn append(&self, lines: &[String]) -> Result<(), TransportError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| TransportError::Other("JSONL writer poisoned".to_string()))?;
        for line in lines {
            writeln!(writer, "{}", line).map_err(|e| TransportError::Io(e.to_string()))?;
        }
        writer.flush().map_err(|e| TransportError::Io(e.to_string()))
    }
}

#[async_trait]
impl LogTransport for JsonlTransport {
    async fn send_batch(
        &self,
        _credentials: &Credentials,
        records: &[LogRecord],
    ) -> Result<(), TransportError> {
        let lines = records
            .iter()
            .map(|record| Self::line("log_event", record))
            .collect::<Result<Vec<_>, _>>()?;
        self.append(&lines)?;
        debug!(events = records.len(), path = %self.path.display(), "Batch appended");
        Ok(())
    }

    async fn send_feedback(
        &self,
        _credentials: &Credentials,
        task_id: &TaskId,
        payload: &FeedbackPayload,
    ) -> Result<Value, TransportError> {
        let mut event = serde_json::to_value(payload)
            .map_err(|e| TransportError::SerializationError(e.to_string()))?;
        if let Value::Object(map) = &mut event {
            map.insert("task_id".to_string(), Value::String(task_id.to_string()));
        }
        self.append(&[Self::line("feedback", &event)?])?;

        Ok(json!({
            "id": task_id.as_str(),
            "flag": payload.flag,
            "notes": payload.notes,
        }))
    }
}

impl Drop for JsonlTransport {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
