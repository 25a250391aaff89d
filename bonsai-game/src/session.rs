use crate::clock::Clock;
use crate::config::{ConfigField, EngineConfig, SettingValue};
use crate::constants::{
    LOG_CONFIG_CHANGED, LOG_PART_CUT, LOG_PART_DECAYED, LOG_PART_SPAWNED, LOG_SESSION_RESET,
};
use crate::event::{EngineEvent, EventList, TickReport};
use crate::outcome::{self, Outcome};
use crate::part::{Part, PartId};
use crate::placement::PlacementBounds;
use crate::rng::RngBundle;
use crate::schedule::{apply_decay, is_due, plan_spawn};
use crate::state::{EngineSnapshot, EngineState};

/// Single controller owning the simulation state, its configuration, the
/// clock gate and the RNG streams.
///
/// Every method takes `&mut self`, so ticks and commands are applied one at a
/// time and never interleave.
#[derive(Debug, Clone)]
pub struct BonsaiSession {
    state: EngineState,
    config: EngineConfig,
    clock: Clock,
    rng: RngBundle,
    bounds: PlacementBounds,
}

impl BonsaiSession {
    /// Session with default configuration.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(seed: u64, config: EngineConfig) -> Self {
        Self::from_parts(config, RngBundle::from_user_seed(seed))
    }

    /// Build from an explicit RNG bundle, e.g. one shared with a replay tool.
    ///
    /// Construction returns no events. A configuration that already decides
    /// the seed tree leaves the session terminal with its clock stopped, and
    /// the outcome is only logged.
    #[must_use]
    pub fn from_parts(config: EngineConfig, rng: RngBundle) -> Self {
        let mut session = Self {
            state: EngineState::initial(),
            config,
            clock: Clock::default(),
            rng,
            bounds: PlacementBounds::default(),
        };
        if let Some(event) = session.evaluate() {
            log::debug!(target: event.log_key(), "session created already decided: {event:?}");
        }
        session
    }

    /// Override the spawn placement window.
    #[must_use]
    pub const fn with_placement(mut self, bounds: PlacementBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Advance the simulation by one second.
    ///
    /// Order within a tick: clock, spawn rule, decay rule, bad timers,
    /// outcome. Decay only considers parts that were healthy when the tick
    /// began, so a leaf spawned this tick is never picked the same tick.
    pub fn tick(&mut self) -> TickReport {
        if self.state.outcome.is_terminal() || !self.clock.tick(&mut self.state.elapsed_seconds) {
            return TickReport::idle(self.state.elapsed_seconds, self.state.outcome);
        }
        let elapsed = self.state.elapsed_seconds;
        let mut events = EventList::new();
        let (spawn_rng, decay_rng) = self.rng.split();

        let spawned = is_due(elapsed, self.config.healthy_interval_seconds())
            .then(|| plan_spawn(&self.state.registry, &self.bounds, spawn_rng));

        let decayed = if is_due(elapsed, self.config.bad_interval_seconds()) {
            apply_decay(&mut self.state.registry, decay_rng)
        } else {
            None
        };

        if let Some(part) = spawned {
            log::debug!(
                target: LOG_PART_SPAWNED,
                "t={elapsed}: part {} spawned at ({:.1}, {:.1})",
                part.id,
                part.position.x,
                part.position.y
            );
            events.push(EngineEvent::Spawned {
                id: part.id,
                position: part.position,
            });
            self.state.registry.insert(part);
        }
        if let Some(id) = decayed {
            log::debug!(target: LOG_PART_DECAYED, "t={elapsed}: part {id} turned bad");
            events.push(EngineEvent::Decayed { id });
        }

        self.state.bad_timers.tick(&self.state.registry);
        events.extend(self.evaluate());

        TickReport {
            advanced: true,
            elapsed_seconds: elapsed,
            outcome: self.state.outcome,
            events,
        }
    }

    /// Cut a part. Unknown and already cut ids are ignored.
    ///
    /// Allowed after the run has ended; the cut is recorded but the outcome
    /// stays put.
    pub fn cut(&mut self, id: PartId) -> EventList {
        let mut events = EventList::new();
        if !self.state.registry.cut(id) {
            log::trace!(target: LOG_PART_CUT, "cut ignored for part {id}");
            return events;
        }
        self.state.bad_timers.forget(id);
        log::debug!(
            target: LOG_PART_CUT,
            "part {id} cut at t={}",
            self.state.elapsed_seconds
        );
        events.push(EngineEvent::Cut { id });
        events.extend(self.evaluate());
        events
    }

    /// Throw away the run and start over from the seed tree. Configuration
    /// is kept.
    pub fn reset(&mut self) -> EventList {
        self.state = EngineState::initial();
        self.clock.restart();
        log::info!(
            target: LOG_SESSION_RESET,
            "session reset (clock generation {})",
            self.clock.generation()
        );
        let mut events = EventList::new();
        events.push(EngineEvent::Reset);
        events.extend(self.evaluate());
        events
    }

    /// Write one configuration field; degenerate input is coerced to 1.
    pub fn configure<'a>(
        &mut self,
        field: ConfigField,
        value: impl Into<SettingValue<'a>>,
    ) -> EventList {
        let value = self.config.set(field, value);
        log::debug!(target: LOG_CONFIG_CHANGED, "{field} set to {value}");
        let mut events = EventList::new();
        events.push(EngineEvent::Configured { field, value });
        events.extend(self.evaluate());
        events
    }

    /// Replace the whole configuration at once.
    pub fn replace_config(&mut self, config: EngineConfig) -> EventList {
        let mut events = EventList::new();
        for field in ConfigField::ALL {
            let value = config.get(field);
            if self.config.get(field) != value {
                self.config.set(field, value);
                events.push(EngineEvent::Configured { field, value });
            }
        }
        events.extend(self.evaluate());
        events
    }

    /// Re-run the outcome evaluator; stops the clock on a terminal result.
    fn evaluate(&mut self) -> Option<EngineEvent> {
        let current = self.state.outcome;
        let next = outcome::advance(current, &self.state.registry, &self.config);
        if next == current {
            return None;
        }
        self.state.outcome = next;
        self.clock.stop();
        let event = EngineEvent::OutcomeReached { outcome: next };
        log::info!(
            target: event.log_key(),
            "outcome {next} at t={} (healthy {}, bad {})",
            self.state.elapsed_seconds,
            self.state.registry.healthy_count(),
            self.state.registry.bad_count()
        );
        Some(event)
    }

    /// Deterministically reseed the RNG streams without touching the run.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = RngBundle::from_user_seed(seed);
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        self.state.snapshot(&self.config)
    }

    #[must_use]
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.state.elapsed_seconds
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    /// Whether ticks currently do anything.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.clock.is_running() && !self.state.outcome.is_terminal()
    }

    #[must_use]
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.state.registry.get(id)
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        self.state.registry.parts()
    }

    #[must_use]
    pub fn healthy_count(&self) -> usize {
        self.state.registry.healthy_count()
    }

    #[must_use]
    pub fn bad_count(&self) -> usize {
        self.state.registry.bad_count()
    }

    #[must_use]
    pub fn cut_count(&self) -> usize {
        self.state.registry.cut_count()
    }

    /// Non-cut parts in draw order: healthy first, bad on top.
    #[must_use]
    pub fn active_parts(&self) -> Vec<&Part> {
        self.state.registry.active_parts()
    }

    /// Seconds a part has been continuously bad.
    #[must_use]
    pub fn seconds_bad(&self, id: PartId) -> Option<u32> {
        self.state.bad_timers.seconds_bad(id)
    }

    /// Ids of bad, uncut parts, oldest decay first.
    #[must_use]
    pub fn bad_ids(&self) -> Vec<PartId> {
        self.state.bad_timers.oldest_first()
    }
}
