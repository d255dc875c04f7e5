use crate::core::event::SessionEvent;
use crate::core::state::{PersistedState, StateError};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("session starting at {0} ends past the supported time range")]
    TimeOverflow(DateTime<Utc>),
}

/// Produces one user's session per call.
pub trait SessionSource {
    /// Generates the next session, allocating its user and session IDs from `state`.
    fn generate(
        &mut self,
        state: &mut PersistedState,
    ) -> Result<Vec<SessionEvent>, SessionError>;
}

/// Writes a batch of events to a sink (files, streams, etc.).
pub trait EventWriter {
    /// Writes all events and returns the number of bytes written.
    fn write_events(&mut self, events: &[SessionEvent]) -> std::io::Result<u64>;
    /// Publishes staged output at its final path.
    fn commit(&mut self) -> std::io::Result<()>;
}

/// Source of plausible human full names.
pub trait NameSource {
    fn random_name(&mut self, rng: &mut StdRng) -> String;
}

/// Supplies the session start time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
