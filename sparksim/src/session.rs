//! Caller-driven evaluation session.
//!
//! Holds the active configuration snapshot and optional challenge level.
//! Nothing recomputes implicitly: callers change the inputs, then call
//! [`Session::evaluate`].

use serde::Serialize;
use sparksim_core::{estimate, score, Configuration, Level, Metrics};
use tracing::{debug, warn};

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Configuration the metrics were computed from
    pub config: Configuration,

    pub metrics: Metrics,

    /// Challenge score, only when a level is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
}

/// An interactive session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: Configuration,
    level: Option<Level>,
    last: Option<Snapshot>,
}

impl Session {
    /// Creates a free-play session.
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            level: None,
            last: None,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Last evaluation, cleared whenever an input changes.
    pub fn last(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: Configuration) {
        self.config = config;
        self.last = None;
    }

    /// Activates a level and replaces the configuration with its start state.
    pub fn select_level(&mut self, level: Level) {
        debug!("Selected level {} ({})", level.id, level.title);
        self.config = level.start_config;
        self.level = Some(level);
        self.last = None;
    }

    /// Returns to free play, keeping the current configuration.
    pub fn clear_level(&mut self) {
        self.level = None;
        self.last = None;
    }

    /// Runs the cost model, then scores the run if a level is active.
    pub fn evaluate(&mut self) -> &Snapshot {
        for warning in self.config.warnings() {
            warn!("Config: {}", warning);
        }

        let metrics = estimate(&self.config);
        let points = self
            .level
            .as_ref()
            .map(|level| score(&self.config, metrics.time, Some(level)));

        debug!(
            "Evaluated: time={} cpu={}% memory={}% score={:?}",
            metrics.time, metrics.cpu, metrics.memory, points
        );

        self.last.insert(Snapshot {
            config: self.config,
            metrics,
            score: points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparksim_core::{ClusterSize, LevelSet};

    #[test]
    fn test_free_play_has_no_score() {
        let mut session = Session::new(Configuration::default());
        let snapshot = session.evaluate();
        assert_eq!(snapshot.metrics.time, 119);
        assert_eq!(snapshot.score, None);
    }

    #[test]
    fn test_select_level_replaces_config_and_resets() {
        let levels = LevelSet::builtin().unwrap();
        let level = levels.get(1).unwrap().clone();

        let mut session = Session::new(Configuration::default());
        session.evaluate();
        assert!(session.last().is_some());

        session.select_level(level.clone());
        assert!(session.last().is_none());
        assert_eq!(*session.config(), level.start_config);

        let snapshot = session.evaluate();
        assert_eq!(snapshot.metrics.time, 2010);
        assert_eq!(snapshot.score, Some(598));
    }

    #[test]
    fn test_set_config_clears_snapshot() {
        let mut session = Session::default();
        session.evaluate();

        let bigger = Configuration {
            cluster_size: ClusterSize::Large,
            ..Default::default()
        };
        session.set_config(bigger);
        assert!(session.last().is_none());
        assert_eq!(session.evaluate().config, bigger);
    }

    #[test]
    fn test_clear_level_stops_scoring() {
        let levels = LevelSet::builtin().unwrap();
        let mut session = Session::default();
        session.select_level(levels.get(2).unwrap().clone());
        assert!(session.evaluate().score.is_some());

        session.clear_level();
        assert_eq!(session.evaluate().score, None);
    }
}
