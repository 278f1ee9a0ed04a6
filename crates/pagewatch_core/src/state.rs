use std::time::Duration;

use thiserror::Error;

/// One user-initiated search, as echoed back by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub session_id: String,
    pub expected_count: u32,
}

impl SearchRequest {
    pub fn new(
        keyword: impl Into<String>,
        session_id: impl Into<String>,
        expected_count: u32,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            session_id: session_id.into(),
            expected_count,
        }
    }
}

/// Location hints returned by the initial search response. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactCandidate {
    pub primary_url: Option<String>,
    pub status_endpoint: Option<String>,
}

impl ArtifactCandidate {
    pub fn has_hints(&self) -> bool {
        self.primary_url.is_some() || self.status_endpoint.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("maximum watch duration must be greater than zero")]
    ZeroMaxDuration,
    #[error("poll interval {poll_ms}ms exceeds maximum duration {max_ms}ms")]
    IntervalExceedsDuration { poll_ms: u128, max_ms: u128 },
}

/// Polling cadence and deadline for a single watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    poll_interval: Duration,
    max_duration: Duration,
}

impl WatchConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
    pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(180);

    pub fn new(poll_interval: Duration, max_duration: Duration) -> Result<Self, ConfigError> {
        if poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if max_duration.is_zero() {
            return Err(ConfigError::ZeroMaxDuration);
        }
        if poll_interval > max_duration {
            return Err(ConfigError::IntervalExceedsDuration {
                poll_ms: poll_interval.as_millis(),
                max_ms: max_duration.as_millis(),
            });
        }
        Ok(Self {
            poll_interval,
            max_duration,
        })
    }

    pub fn from_millis(poll_ms: u64, max_ms: u64) -> Result<Self, ConfigError> {
        Self::new(Duration::from_millis(poll_ms), Duration::from_millis(max_ms))
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            max_duration: Self::DEFAULT_MAX_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

impl WatchState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, WatchState::Idle | WatchState::Running)
    }
}

/// Pure watcher state. Driven exclusively through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchMachine {
    config: WatchConfig,
    state: WatchState,
    attempt: u32,
}

impl WatchMachine {
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            state: WatchState::Idle,
            attempt: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Number of the round currently executing (or last executed). Zero before start.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn is_running(&self) -> bool {
        self.state == WatchState::Running
    }

    pub(crate) fn begin_round(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub(crate) fn transition(&mut self, next: WatchState) {
        debug_assert!(!self.state.is_terminal(), "terminal states are final");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_interval_longer_than_deadline() {
        let err = WatchConfig::from_millis(6_000, 5_000).unwrap_err();
        assert_eq!(
            err,
            ConfigError::IntervalExceedsDuration {
                poll_ms: 6_000,
                max_ms: 5_000
            }
        );
    }

    #[test]
    fn config_rejects_zero_values() {
        assert_eq!(
            WatchConfig::from_millis(0, 5_000).unwrap_err(),
            ConfigError::ZeroPollInterval
        );
        assert_eq!(
            WatchConfig::from_millis(1_000, 0).unwrap_err(),
            ConfigError::ZeroMaxDuration
        );
    }

    #[test]
    fn equal_interval_and_deadline_is_allowed() {
        let config = WatchConfig::from_millis(5_000, 5_000).unwrap();
        assert_eq!(config.poll_interval(), config.max_duration());
    }

    #[test]
    fn only_idle_and_running_are_live() {
        assert!(!WatchState::Idle.is_terminal());
        assert!(!WatchState::Running.is_terminal());
        for state in [
            WatchState::Succeeded,
            WatchState::Failed,
            WatchState::TimedOut,
            WatchState::Cancelled,
        ] {
            assert!(state.is_terminal());
        }
    }
}
