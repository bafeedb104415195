//! Ledger Configuration
//!
//! Genesis supply and interest schedule. Every field defaults to the value
//! in [`crate::constants`], so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::constants::{interest, token};
use crate::errors::LedgerResult;
use crate::math::interest_for;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stepped interest schedule of the deposit facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestSchedule {
    /// Percent of principal earned per complete period
    pub rate_percent: u64,
    /// Length of one period in seconds
    pub period_seconds: u64,
}

impl Default for InterestSchedule {
    fn default() -> Self {
        Self {
            rate_percent: interest::RATE_PERCENT,
            period_seconds: interest::PERIOD_SECONDS,
        }
    }
}

impl InterestSchedule {
    pub fn new(rate_percent: u64, period_seconds: u64) -> Result<Self, ConfigError> {
        let schedule = Self {
            rate_percent,
            period_seconds,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "interest.period_seconds must be greater than zero".into(),
            ));
        }
        if self.rate_percent > interest::MAX_RATE_PERCENT {
            return Err(ConfigError::InvalidValue(format!(
                "interest.rate_percent {} exceeds maximum {}",
                self.rate_percent,
                interest::MAX_RATE_PERCENT
            )));
        }
        Ok(())
    }

    /// Interest owed on `principal` after `elapsed_seconds`
    pub fn interest_for(&self, principal: u64, elapsed_seconds: u64) -> LedgerResult<u64> {
        interest_for(principal, elapsed_seconds, self.rate_percent, self.period_seconds)
    }
}

/// Full ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Supply minted to the owner at genesis
    pub initial_supply: u64,
    /// Deposit interest schedule
    pub interest: InterestSchedule,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            initial_supply: token::INITIAL_SUPPLY,
            interest: InterestSchedule::default(),
        }
    }
}

impl TokenConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_supply == 0 {
            return Err(ConfigError::InvalidValue(
                "initial_supply must be greater than zero".into(),
            ));
        }
        self.interest.validate()
    }
}
