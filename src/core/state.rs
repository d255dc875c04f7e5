//! Persisted user/session counters.
//!
//! The counters survive between runs so IDs keep increasing instead of
//! restarting at the defaults.

use crate::core::staging::OutputFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state io error: {0}")]
    Io(#[from] io::Error),

    #[error("state parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{0} has no IDs left to allocate")]
    Exhausted(&'static str),
}

/// Last user and session IDs handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub last_user_id: u64,
    pub last_session_id: u64,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            last_user_id: 0,
            last_session_id: 10_000,
        }
    }
}

impl PersistedState {
    /// Allocates the next user and session IDs.
    ///
    /// Both counters are checked before either moves, so an exhausted counter
    /// leaves the state untouched.
    pub fn allocate_ids(&mut self) -> Result<(u64, u64), StateError> {
        let user_id = self
            .last_user_id
            .checked_add(1)
            .ok_or(StateError::Exhausted("lastUserId"))?;
        let session_id = self
            .last_session_id
            .checked_add(1)
            .ok_or(StateError::Exhausted("lastSessionId"))?;
        self.last_user_id = user_id;
        self.last_session_id = session_id;
        Ok((user_id, session_id))
    }
}

/// Loads and saves [`PersistedState`] at a fixed path. No locking is done.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the counters, returning the defaults when the file is missing.
    pub fn load(&self) -> Result<PersistedState, StateError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, using defaults");
                return Ok(PersistedState::default());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&contents).map_err(|source| StateError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites the state file.
    pub fn save(&self, state: &PersistedState) -> Result<(), StateError> {
        fs::write(&self.path, encode(state)?)?;
        Ok(())
    }

    /// Writes the state to a staging file; it replaces the real file on commit.
    pub fn stage(&self, state: &PersistedState) -> Result<OutputFile, StateError> {
        let file = OutputFile::staged(&self.path);
        fs::write(file.write_path(), encode(state)?)?;
        Ok(file)
    }
}

fn encode(state: &PersistedState) -> Result<Vec<u8>, StateError> {
    serde_json::to_vec(state)
        .map_err(|err| StateError::Io(io::Error::new(io::ErrorKind::Other, err)))
}
