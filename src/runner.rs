//! Batch orchestration: generate sessions for N users and persist everything.

use crate::core::config::{Config, ConfigError};
use crate::core::state::{PersistedState, StateError, StateStore};
use crate::core::traits::{Clock, EventWriter, NameSource, SessionError, SessionSource};
use crate::formats::{CsvWriter, JsonWriter};
use crate::sources::session::SessionGenerator;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Outcome of one [`Runner::run`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub users: usize,
    pub events: usize,
    /// First and last user IDs handed out, if any users were generated.
    pub user_ids: Option<(u64, u64)>,
    pub state: PersistedState,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

pub struct Runner<S = SessionGenerator> {
    config: Config,
    source: S,
}

impl Runner<SessionGenerator> {
    pub fn from_config(
        config: Config,
        names: Box<dyn NameSource>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, RunError> {
        let source = SessionGenerator::from_config(&config, names, clock)?;
        Ok(Self { config, source })
    }
}

impl<S: SessionSource> Runner<S> {
    pub fn with_source(config: Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates `number_of_users` sessions, writes the JSON file, saves the
    /// counters, then writes the CSV file.
    ///
    /// In atomic mode all three land only after every write has succeeded.
    pub fn run(&mut self, number_of_users: usize) -> Result<RunSummary, RunError> {
        let output = &self.config.output;
        let dir = output.dir_path();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!(dir = %dir.display(), "created output directory");
        }

        let store = StateStore::new(output.state_path());
        let mut state = store.load()?;
        debug!(
            last_user_id = state.last_user_id,
            last_session_id = state.last_session_id,
            "loaded state"
        );

        let mut events = Vec::new();
        for _ in 0..number_of_users {
            events.extend(self.source.generate(&mut state)?);
        }

        let atomic = output.atomic;
        let mut json = JsonWriter::new(output.json_path(), atomic);
        let json_bytes = json.write_events(&events)?;

        let mut staged_state = if atomic {
            Some(store.stage(&state)?)
        } else {
            store.save(&state)?;
            None
        };

        let mut csv = CsvWriter::new(output.csv_path(), output.csv_mode, atomic);
        let csv_bytes = csv.write_events(&events)?;

        json.commit()?;
        if let Some(staged) = staged_state.as_mut() {
            staged.commit()?;
        }
        csv.commit()?;

        debug!(json_bytes, csv_bytes, atomic, "outputs written");
        let user_ids = events
            .first()
            .zip(events.last())
            .map(|(first, last)| (first.user_id, last.user_id));
        Ok(RunSummary {
            users: number_of_users,
            events: events.len(),
            user_ids,
            state,
            json_path: output.json_path(),
            csv_path: output.csv_path(),
        })
    }
}
