//! Runtime limits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on transitions fired within one tick.
pub const DEFAULT_MAX_TRANSITIONS_PER_TICK: usize = 128;

/// Errors produced while loading a [`MachineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse machine config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_transitions_per_tick must be at least 1")]
    ZeroTransitionLimit,
}

/// Tunables of a [`StateMachine`](crate::StateMachine).
///
/// # Example
///
/// ```rust
/// use hfsm::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "max_transitions_per_tick": 16 }"#).unwrap();
/// assert_eq!(config.max_transitions_per_tick, 16);
///
/// let defaults = MachineConfig::from_json("{}").unwrap();
/// assert_eq!(defaults, MachineConfig::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Transitions allowed to fire in one `update`/`fixed_update` before the
    /// tick is aborted with a transition-overload fault.
    pub max_transitions_per_tick: usize,
}

impl MachineConfig {
    pub fn new(max_transitions_per_tick: usize) -> Result<Self, ConfigError> {
        let config = Self {
            max_transitions_per_tick,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MachineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transitions_per_tick == 0 {
            return Err(ConfigError::ZeroTransitionLimit);
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_transitions_per_tick: DEFAULT_MAX_TRANSITIONS_PER_TICK,
        }
    }
}
