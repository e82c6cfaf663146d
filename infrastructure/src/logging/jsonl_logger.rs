//! Append-only JSONL sink for exchange events.
//!
//! A line is the event's payload fields with `type` and `timestamp` in
//! front. A payload that is not a JSON object is nested under `data`.

use broker_application::ports::exchange_logger::{ExchangeEvent, ExchangeLogger};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// One serialized line of the exchange log
#[derive(Serialize)]
struct Record<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: String,
    #[serde(flatten)]
    body: Body<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Body<'a> {
    Fields(&'a Map<String, Value>),
    Wrapped { data: &'a Value },
}

impl<'a> Record<'a> {
    fn stamped(event: &'a ExchangeEvent) -> Self {
        let body = match &event.payload {
            Value::Object(fields) => Body::Fields(fields),
            other => Body::Wrapped { data: other },
        };
        Self {
            event_type: event.event_type,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            body,
        }
    }
}

/// Exchange logger backed by a file opened in append mode.
///
/// Every event is flushed as soon as it is written, so the file stays
/// readable while the broker runs.
pub struct JsonlExchangeLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlExchangeLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; the broker then runs
    /// without an exchange log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not open exchange log {}: {}", path.display(), e);
                None
            }
        }
    }

    fn open(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&self, record: &Record<'_>) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl ExchangeLogger for JsonlExchangeLogger {
    fn log(&self, event: ExchangeEvent) {
        if let Err(e) = self.write_record(&Record::stamped(&event)) {
            debug!("Dropped {} event: {}", event.event_type, e);
        }
    }
}

impl Drop for JsonlExchangeLogger {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}
