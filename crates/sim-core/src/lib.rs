#![deny(warnings)]

//! Core domain models and invariants for The Startup(TM).
//!
//! This crate defines the ledger, scene and particle types shared across the
//! simulation, plus the immutable [`SimConfig`] that every clock and view is
//! constructed from. Validation helpers guarantee the configuration invariants
//! before a run starts.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Number of slots in the cash particle pool.
pub const PARTICLE_POOL: usize = 20;

/// Per-second flow constants feeding the tick equations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Features shipped per developer per second.
    pub features_per_dev: f64,
    /// Bugs fixed per QA engineer per second.
    pub bug_fixes_per_qa: f64,
    /// Bugs introduced per developer per second.
    pub bugs_per_dev: f64,
    /// Bugs introduced per existing feature per second.
    pub bugs_per_feature: f64,
    /// Users gained per feature per second.
    pub users_per_feature: f64,
    /// Users gained per marketer per second.
    pub users_per_marketer: f64,
    /// Users lost per open bug per second.
    pub users_lost_per_bug: f64,
    /// Cash earned per user per feature per second.
    pub cash_per_user_feature: i64,
    /// Salary shown per developer per second (display only).
    pub dev_salary: i64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            features_per_dev: 1.0 / 60.0,
            bug_fixes_per_qa: 1.0 / 60.0,
            bugs_per_dev: 1.0 / 200.0,
            bugs_per_feature: 1.0 / 200.0,
            users_per_feature: 1.0 / 30.0,
            users_per_marketer: 1.0 / 30.0,
            users_lost_per_bug: 1.0 / 180.0,
            cash_per_user_feature: 1,
            dev_salary: 1,
        }
    }
}

impl RateConfig {
    fn fractional(&self) -> [(&'static str, f64); 7] {
        [
            ("features_per_dev", self.features_per_dev),
            ("bug_fixes_per_qa", self.bug_fixes_per_qa),
            ("bugs_per_dev", self.bugs_per_dev),
            ("bugs_per_feature", self.bugs_per_feature),
            ("users_per_feature", self.users_per_feature),
            ("users_per_marketer", self.users_per_marketer),
            ("users_lost_per_bug", self.users_lost_per_bug),
        ]
    }
}

/// Per-unit weights of the linear share price.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharePriceWeights {
    pub feature: i64,
    pub user: i64,
    pub bug: i64,
    pub dev: i64,
    pub marketer: i64,
}

impl Default for SharePriceWeights {
    fn default() -> Self {
        Self {
            feature: 100,
            user: 100,
            bug: -500,
            dev: 1000,
            marketer: 1000,
        }
    }
}

/// Timer cadences for the simulation and animation clocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cadence {
    /// Milliseconds between simulation ticks.
    pub sim_tick_ms: u64,
    /// Animation frames per second.
    pub frames_per_second: u32,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            sim_tick_ms: 1000,
            frames_per_second: 12,
        }
    }
}

impl Cadence {
    /// Interval between simulation ticks.
    pub fn sim_tick(&self) -> Duration {
        Duration::from_millis(self.sim_tick_ms)
    }

    /// Interval between animation frames.
    pub fn frame_tick(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }
}

/// Upper bounds on the logical canvas, regardless of terminal size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasLimits {
    pub max_width: u16,
    pub max_height: u16,
}

impl Default for CanvasLimits {
    fn default() -> Self {
        Self {
            max_width: 200,
            max_height: 20,
        }
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub rates: RateConfig,
    pub share_price: SharePriceWeights,
    /// Cash above this ends the run.
    pub cash_cap: i64,
    pub cadence: Cadence,
    pub canvas: CanvasLimits,
    /// Seed for the particle RNG.
    pub rng_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rates: RateConfig::default(),
            share_price: SharePriceWeights::default(),
            cash_cap: 1_000_000,
            cadence: Cadence::default(),
            canvas: CanvasLimits::default(),
            rng_seed: 42,
        }
    }
}

impl SimConfig {
    /// Parse a YAML document, filling omitted fields with defaults, and
    /// validate the result.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.rates.fractional() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteRate(name));
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeRate(name));
            }
        }
        if self.rates.cash_per_user_feature < 0 {
            return Err(ConfigError::NegativeRate("cash_per_user_feature"));
        }
        if self.cash_cap <= 0 {
            return Err(ConfigError::NonPositiveCashCap(self.cash_cap));
        }
        if self.cadence.sim_tick_ms == 0 || self.cadence.frames_per_second == 0 {
            return Err(ConfigError::ZeroCadence);
        }
        if self.canvas.max_width == 0 || self.canvas.max_height == 0 {
            return Err(ConfigError::ZeroCanvas);
        }
        Ok(())
    }
}

/// Validation errors for configuration invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Document could not be parsed.
    #[error("invalid config document: {0}")]
    Parse(String),
    /// Rate must be finite.
    #[error("rate `{0}` is not finite")]
    NonFiniteRate(&'static str),
    /// Rate must be non-negative.
    #[error("rate `{0}` must be >= 0")]
    NegativeRate(&'static str),
    /// Cash cap must be strictly positive.
    #[error("cash cap must be > 0, got {0}")]
    NonPositiveCashCap(i64),
    /// Both clocks need a non-zero cadence.
    #[error("tick cadence must be non-zero")]
    ZeroCadence,
    /// Canvas maxima must be non-zero.
    #[error("canvas limits must be non-zero")]
    ZeroCanvas,
}

/// Fractional carry-over toward the next whole unit of each flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub feature: f64,
    pub bug_fix: f64,
    pub bug: f64,
    pub user: f64,
    pub lost_user: f64,
}

/// Per-second rates derived during the last tick. Display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub features_per_second: f64,
    pub bug_fixes_per_second: f64,
    pub bugs_per_second_from_devs: f64,
    pub bugs_per_second_from_features: f64,
    pub users_per_second_from_features: f64,
    pub users_per_second_from_marketers: f64,
    pub users_lost_per_second: f64,
    pub cash_per_second: i64,
}

impl Rates {
    /// Net user change per second.
    pub fn net_users_per_second(&self) -> f64 {
        self.users_per_second_from_features + self.users_per_second_from_marketers
            - self.users_lost_per_second
    }
}

/// Staff roles the player can hire and fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Dev,
    Qa,
    Marketer,
}

/// The complete economic state of a run at an instant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub cash: i64,
    pub users: i64,
    pub features: i64,
    pub bugs: i64,
    pub devs: i64,
    pub qa: i64,
    pub marketers: i64,
    /// Company value; the only counter allowed below zero.
    pub price_per_share: i64,
    pub progress: Progress,
    pub rates: Rates,
}

impl Ledger {
    /// Starting ledger: a single user and nothing else.
    pub fn new() -> Self {
        Self {
            users: 1,
            ..Self::default()
        }
    }

    /// Headcount for a role.
    pub fn staff(&self, role: Role) -> i64 {
        match role {
            Role::Dev => self.devs,
            Role::Qa => self.qa,
            Role::Marketer => self.marketers,
        }
    }

    /// Copy of this ledger with the role's headcount moved by `delta`,
    /// floored at zero.
    pub fn with_staff(&self, role: Role, delta: i64) -> Self {
        let count = self.staff(role).saturating_add(delta).max(0);
        let mut next = self.clone();
        match role {
            Role::Dev => next.devs = count,
            Role::Qa => next.qa = count,
            Role::Marketer => next.marketers = count,
        }
        next
    }
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Cash exceeded the cap.
    CrushedBySuccess,
    /// Share price went negative.
    Collapse,
}

impl EndCause {
    /// Player-facing narrative for the end screen.
    pub fn narrative(&self) -> &'static str {
        match self {
            EndCause::CrushedBySuccess => {
                "You've been crushed under the weight of your own success...\n\
                 A tragedy has befallen all mankind."
            }
            EndCause::Collapse => {
                "Your enterprise has collapsed around you. A flash in the pan, nothing more."
            }
        }
    }
}

/// Top-level application mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    /// Splash screen; nothing advances.
    #[default]
    Start,
    /// Both clocks are live.
    Playing,
    /// Frozen after a terminal condition.
    Ended(EndCause),
}

impl Scene {
    pub fn is_playing(&self) -> bool {
        matches!(self, Scene::Playing)
    }
}

/// A decorative cash particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    pub x: i32,
    pub y: i32,
}
