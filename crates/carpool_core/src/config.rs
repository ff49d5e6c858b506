//! Engine configuration: weights, cutoffs and thresholds for every stage of
//! the match pipeline.
//!
//! Every section has a `Default` carrying the production constants, so a
//! TOML file only needs the keys it overrides:
//!
//! ```toml
//! [matching]
//! min_score = 0.4
//!
//! [detour]
//! max_extra_secs = 600.0
//! leg_timeout_ms = 3000
//!
//! [routing]
//! kind = "straight_line"
//! speed_kmh = 30.0
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::routing::{RouteProviderKind, TransportMode};

/// Scores with a combined weight off by more than this are rejected.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights and hard cutoffs for [`crate::matching::MatchingEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub time_weight: f64,
    pub distance_weight: f64,
    pub seat_weight: f64,
    /// Departure-time window in seconds. Larger differences score zero.
    pub max_time_diff_secs: f64,
    /// Per-leg pickup/dropoff radius in metres. Larger distances score zero.
    pub max_leg_distance_m: f64,
    /// Minimum score for a candidate to be ranked. Zero scores never rank.
    pub min_score: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            time_weight: 0.3,
            distance_weight: 0.5,
            seat_weight: 0.2,
            max_time_diff_secs: 20.0 * 60.0,
            max_leg_distance_m: 1_000.0,
            min_score: 0.0,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [self.time_weight, self.distance_weight, self.seat_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "matching weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "matching weights must sum to 1.0, got {sum}"
            )));
        }
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.max_time_diff_secs) || !positive(self.max_leg_distance_m) {
            return Err(ConfigError::Invalid(
                "matching cutoffs must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ConfigError::Invalid(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// Thresholds for [`crate::detour::DetourEvaluator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetourConfig {
    /// Largest accepted increase in route travel time, in seconds.
    pub max_extra_secs: f64,
    /// Optional relative cap: extra time must also stay within this fraction
    /// of the original route time. Ignored when the original time is zero.
    pub max_extra_ratio: Option<f64>,
    /// Per-leg routing timeout. A timed-out leg counts as zero seconds.
    pub leg_timeout_ms: u64,
    pub transport_mode: TransportMode,
}

impl Default for DetourConfig {
    fn default() -> Self {
        Self {
            max_extra_secs: 15.0 * 60.0,
            max_extra_ratio: None,
            leg_timeout_ms: 5_000,
            transport_mode: TransportMode::Automobile,
        }
    }
}

impl DetourConfig {
    pub fn leg_timeout(&self) -> Duration {
        Duration::from_millis(self.leg_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_extra_secs.is_finite() || self.max_extra_secs < 0.0 {
            return Err(ConfigError::Invalid(
                "max_extra_secs must be finite and non-negative".to_string(),
            ));
        }
        if let Some(ratio) = self.max_extra_ratio {
            if !ratio.is_finite() || ratio < 0.0 {
                return Err(ConfigError::Invalid(
                    "max_extra_ratio must be finite and non-negative".to_string(),
                ));
            }
        }
        if self.leg_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "leg_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rules for [`crate::validator::TripValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Honour a trip's gender preference. Off until the product rules are
    /// settled; while off, the preference field is never read.
    pub enforce_gender_preference: bool,
    /// School emails must sit under this domain.
    pub institutional_domain: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enforce_gender_preference: false,
            institutional_domain: "edu.mo".to_string(),
        }
    }
}

/// Knobs for [`crate::service::MatchService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Run detour checks on ranked candidates before confirming them.
    pub check_detours: bool,
    /// How many top-ranked candidates get a detour check.
    pub max_detour_checks: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            check_detours: true,
            max_detour_checks: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matching: MatchingConfig,
    pub detour: DetourConfig,
    pub validator: ValidatorConfig,
    pub service: ServiceConfig,
    pub routing: RouteProviderKind,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching.validate()?;
        self.detour.validate()?;
        if self.validator.institutional_domain.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "institutional_domain must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    EngineConfig::from_toml_str(&content)
}
