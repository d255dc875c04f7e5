use super::catalog::{ActionSelector, ActionTable};
use crate::core::config::{Config, ConfigError};
use crate::core::event::{format_timestamp, ActionKind, SessionEvent};
use crate::core::state::PersistedState;
use crate::core::traits::{Clock, NameSource, SessionError, SessionSource};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Builds LOGIN ... LOGOUT sessions for simulated shoppers.
pub struct SessionGenerator {
    rng: StdRng,
    selector: ActionSelector,
    names: Box<dyn NameSource>,
    clock: Box<dyn Clock>,
    duration: Duration,
    min_actions: u32,
    max_actions: u32,
}

impl SessionGenerator {
    pub fn from_config(
        config: &Config,
        names: Box<dyn NameSource>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let selector = ActionSelector::new(ActionTable::from_config(&config.actions)?);
        let duration = Duration::try_minutes(config.session.duration_minutes).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "session.duration_minutes out of range: {}",
                config.session.duration_minutes
            ))
        })?;
        Ok(Self {
            rng,
            selector,
            names,
            clock,
            duration,
            min_actions: config.session.min_actions,
            max_actions: config.session.max_actions,
        })
    }

    /// Uniform instant in `[start, start + duration)`; callers have already
    /// checked that `start + duration` is representable.
    fn random_time_within(&mut self, start: DateTime<Utc>) -> DateTime<Utc> {
        let span_ms = self.duration.num_milliseconds();
        let offset = self.rng.gen_range(0..span_ms);
        start + Duration::milliseconds(offset)
    }
}

impl SessionSource for SessionGenerator {
    fn generate(
        &mut self,
        state: &mut PersistedState,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let user_name = self.names.random_name(&mut self.rng);
        let start = self.clock.now().trunc_subsecs(3);
        let end = start
            .checked_add_signed(self.duration)
            .ok_or(SessionError::TimeOverflow(start))?;

        let (user_id, session_id) = state.allocate_ids()?;

        let action_count = self.rng.gen_range(self.min_actions..=self.max_actions) as usize;
        let mut events = Vec::with_capacity(action_count + 2);
        let event = |action_name: ActionKind, time: DateTime<Utc>| SessionEvent {
            user_id,
            user_name: user_name.clone(),
            session_id,
            action_name,
            action_time: format_timestamp(time),
        };

        events.push(event(ActionKind::Login, start));
        for _ in 0..action_count {
            let action = self.selector.select(&mut self.rng);
            let time = self.random_time_within(start);
            events.push(event(action, time));
        }
        events.push(event(ActionKind::Logout, end));

        trace!(user_id, session_id, actions = action_count, "generated session");
        Ok(events)
    }
}
