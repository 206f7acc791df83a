#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::Level;

use ledgerline::telemetry::LogSink;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub source: &'static str,
    pub message: String,
}

/// Remembers every record in arrival order.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

impl LogSink for MemorySink {
    fn record(&self, level: Level, source: &'static str, message: &str) {
        self.records.lock().unwrap().push(Record {
            level,
            source,
            message: message.to_owned(),
        });
    }
}

/// A downstream fault with a recognisable type.
#[derive(Debug, PartialEq, Eq)]
pub struct TestFault(pub String);

impl fmt::Display for TestFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TestFault {}
