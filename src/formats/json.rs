//! JSON sink for session events.
//!
//! Writes one pretty-printed array per run and replaces whatever was there.

use crate::core::event::SessionEvent;
use crate::core::staging::OutputFile;
use crate::core::traits::EventWriter;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Writes all events of a run as a single JSON array.
pub struct JsonWriter {
    file: OutputFile,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>, atomic: bool) -> Self {
        Self {
            file: OutputFile::new(path, atomic),
        }
    }
}

impl EventWriter for JsonWriter {
    fn write_events(&mut self, events: &[SessionEvent]) -> io::Result<u64> {
        let bytes = serde_json::to_vec_pretty(events)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        fs::write(self.file.write_path(), &bytes)?;
        Ok(bytes.len() as u64)
    }

    fn commit(&mut self) -> io::Result<()> {
        self.file.commit()
    }
}
