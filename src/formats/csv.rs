//! CSV sink for session events.
//!
//! Rows accumulate across runs in append mode; the header is only written
//! when the file starts out missing or empty.

use crate::core::config::CsvMode;
use crate::core::event::SessionEvent;
use crate::core::staging::OutputFile;
use crate::core::traits::EventWriter;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str = "UserID,UserName,SessionID,ActionName,ActionTime";

pub struct CsvWriter {
    file: OutputFile,
    mode: CsvMode,
}

impl CsvWriter {
    pub fn new(path: impl Into<PathBuf>, mode: CsvMode, atomic: bool) -> Self {
        Self {
            file: OutputFile::new(path, atomic),
            mode,
        }
    }
}

impl EventWriter for CsvWriter {
    fn write_events(&mut self, events: &[SessionEvent]) -> io::Result<u64> {
        let mut body = String::new();
        match self.mode {
            CsvMode::Append => {
                if events.is_empty() {
                    return Ok(0);
                }
                if is_missing_or_empty(self.file.target())? {
                    push_header(&mut body);
                }
            }
            CsvMode::Replace => push_header(&mut body),
        }
        for event in events {
            push_record(&mut body, event);
        }

        match self.mode {
            CsvMode::Append => {
                if self.file.is_staged() && self.file.target().exists() {
                    fs::copy(self.file.target(), self.file.write_path())?;
                }
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(self.file.write_path())?;
                file.write_all(body.as_bytes())?;
                file.flush()?;
            }
            CsvMode::Replace => fs::write(self.file.write_path(), body.as_bytes())?,
        }
        Ok(body.len() as u64)
    }

    fn commit(&mut self) -> io::Result<()> {
        self.file.commit()
    }
}

fn is_missing_or_empty(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() == 0),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(err) => Err(err),
    }
}

fn push_header(body: &mut String) {
    body.push_str(CSV_HEADER);
    body.push('\n');
}

fn push_record(body: &mut String, event: &SessionEvent) {
    body.push_str(&format!(
        "{},{},{},{},{}\n",
        event.user_id,
        escape_field(&event.user_name),
        event.session_id,
        event.action_name,
        escape_field(&event.action_time),
    ));
}

/// Quotes a field containing a delimiter, quote or line break; inner quotes are doubled.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::ActionKind;

    fn event(user_id: u64, name: &str, action: ActionKind) -> SessionEvent {
        SessionEvent {
            user_id,
            user_name: name.to_string(),
            session_id: 10_000 + user_id,
            action_name: action,
            action_time: "2024-01-01T00:15:00.000Z".to_string(),
        }
    }

    #[test]
    fn append_writes_header_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sessions.csv");

        for (user_id, atomic) in [(1, false), (2, true)] {
            let mut writer = CsvWriter::new(&path, CsvMode::Append, atomic);
            writer
                .write_events(&[event(user_id, "Ada Lovelace", ActionKind::Login)])
                .expect("write");
            writer.commit().expect("commit");
        }

        let raw = fs::read_to_string(&path).expect("read");
        assert_eq!(
            raw,
            "UserID,UserName,SessionID,ActionName,ActionTime\n\
             1,Ada Lovelace,10001,LOGIN,2024-01-01T00:15:00.000Z\n\
             2,Ada Lovelace,10002,LOGIN,2024-01-01T00:15:00.000Z\n"
        );
    }

    #[test]
    fn append_without_events_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sessions.csv");
        let mut writer = CsvWriter::new(&path, CsvMode::Append, true);
        assert_eq!(writer.write_events(&[]).expect("write"), 0);
        writer.commit().expect("commit");
        assert!(!path.exists());
    }

    #[test]
    fn replace_rewrites_header_and_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sessions.csv");
        fs::write(&path, "old,rows\n").expect("write");

        let mut writer = CsvWriter::new(&path, CsvMode::Replace, false);
        writer
            .write_events(&[event(5, "Alan Turing", ActionKind::Checkout)])
            .expect("write");
        let raw = fs::read_to_string(&path).expect("read");
        assert_eq!(
            raw,
            "UserID,UserName,SessionID,ActionName,ActionTime\n\
             5,Alan Turing,10005,CHECKOUT,2024-01-01T00:15:00.000Z\n"
        );
    }

    #[test]
    fn quotes_fields_with_delimiters() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("Smith, Jr"), "\"Smith, Jr\"");
        assert_eq!(escape_field("The \"Kid\""), "\"The \"\"Kid\"\"\"");
    }
}
