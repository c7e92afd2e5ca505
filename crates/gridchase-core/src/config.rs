//! Configuration loading and typed config structures for the GridChase
//! simulation.
//!
//! The canonical configuration lives in `gridchase-config.yaml` at the
//! project root. Every field has a default, so an empty document (or no
//! file at all) yields the stock 18x18 maze with ten rewards and five
//! agents.

use std::path::Path;

use gridchase_types::{AgentColor, Control, Position, Role};
use gridchase_world::MazeParams;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The document parsed but describes an unusable simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `gridchase-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Terrain generation and reward placement.
    #[serde(default)]
    pub world: WorldConfig,

    /// Agent roster, in turn order.
    #[serde(default = "default_roster")]
    pub agents: Vec<AgentConfig>,

    /// Run-loop bounds and pacing.
    #[serde(default)]
    pub run: RunConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            agents: default_roster(),
            run: RunConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero-sized grid, a wall ratio
    /// outside `[0, 1)`, or a fixed agent position outside the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.world.size;
        if size == 0 {
            return Err(ConfigError::Invalid {
                reason: "world.size must be at least 1".to_owned(),
            });
        }

        let ratio = self.world.wall_ratio;
        if !ratio.is_finite() || !(0.0..1.0).contains(&ratio) {
            return Err(ConfigError::Invalid {
                reason: format!("world.wall_ratio must be in [0.0, 1.0), got {ratio}"),
            });
        }

        let outside = self.agents.iter().enumerate().find_map(|(i, agent)| {
            agent
                .position
                .filter(|p| p.row >= size || p.col >= size)
                .map(|p| (i, p))
        });
        if let Some((i, position)) = outside {
            return Err(ConfigError::Invalid {
                reason: format!("agents[{i}].position {position} lies outside a {size}x{size} grid"),
            });
        }

        Ok(())
    }
}

/// Terrain and reward settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Side length of the square grid.
    #[serde(default = "default_size")]
    pub size: usize,

    /// Probability that a sampled cell is a wall.
    #[serde(default = "default_wall_ratio")]
    pub wall_ratio: f64,

    /// Fill every open cell with a reward at generation time.
    #[serde(default)]
    pub fill_rewards: bool,

    /// Rewards scattered on empty cells after the roster is placed.
    #[serde(default = "default_initial_rewards")]
    pub initial_rewards: usize,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            wall_ratio: default_wall_ratio(),
            fill_rewards: false,
            initial_rewards: default_initial_rewards(),
            seed: default_seed(),
        }
    }
}

impl WorldConfig {
    /// Generator parameters for this world.
    pub const fn maze_params(&self) -> MazeParams {
        MazeParams::new(self.size, self.wall_ratio).with_fill_rewards(self.fill_rewards)
    }
}

/// One roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// Pursuer or target.
    pub role: Role,

    /// Display colour.
    #[serde(default)]
    pub color: AgentColor,

    /// Who drives the agent.
    #[serde(default)]
    pub control: Control,

    /// Fixed starting cell. Random when absent.
    #[serde(default)]
    pub position: Option<Position>,
}

impl AgentConfig {
    /// A randomly placed agent.
    pub const fn new(role: Role, color: AgentColor, control: Control) -> Self {
        Self {
            role,
            color,
            control,
            position: None,
        }
    }

    /// Pin the agent to a starting cell.
    #[must_use]
    pub const fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Run-loop settings.
///
/// A value of 0 for `max_ticks` or `max_episodes` means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many completed episodes (0 = unlimited).
    #[serde(default)]
    pub max_episodes: u64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Print a text frame after every tick.
    #[serde(default = "default_true")]
    pub render: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            max_episodes: 0,
            tick_interval_ms: default_tick_interval_ms(),
            render: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_size() -> usize {
    18
}

const fn default_wall_ratio() -> f64 {
    0.2
}

const fn default_initial_rewards() -> usize {
    10
}

const fn default_seed() -> u64 {
    42
}

/// Roughly 30 frames per second.
const fn default_tick_interval_ms() -> u64 {
    33
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_roster() -> Vec<AgentConfig> {
    vec![
        AgentConfig::new(Role::Target, AgentColor::Yellow, Control::External),
        AgentConfig::new(Role::Pursuer, AgentColor::Red, Control::ScriptedPursuit),
        AgentConfig::new(Role::Target, AgentColor::Green, Control::External),
        AgentConfig::new(Role::Pursuer, AgentColor::Cyan, Control::ScriptedPursuit),
        AgentConfig::new(Role::Pursuer, AgentColor::Magenta, Control::ScriptedPursuit),
    ]
}
