/*! Static action configuration, validated when built */
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("tick period must be a positive number of seconds, got {0}")]
    NonPositiveTickPeriod(f32),
    #[error("tick period of {0} seconds is too long")]
    TickPeriodOutOfRange(f32),
    #[error("range must be positive, got {0}")]
    NonPositiveRange(f32),
}

/// A non-zero interval between aura ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPeriod(Duration);

impl TickPeriod {
    pub fn new(period: Duration) -> Result<Self, ConfigError> {
        if period.is_zero() {
            return Err(ConfigError::NonPositiveTickPeriod(period.as_secs_f32()));
        }
        Ok(Self(period))
    }

    pub fn from_secs_f32(secs: f32) -> Result<Self, ConfigError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ConfigError::NonPositiveTickPeriod(secs));
        }
        let period = Duration::try_from_secs_f32(secs)
            .map_err(|_| ConfigError::TickPeriodOutOfRange(secs))?;
        // f32 seconds are inexact (0.1 is 100.000001ms), keep whole microseconds
        let micros = (period.subsec_nanos() + 500) / 1_000;
        Duration::from_secs(period.as_secs())
            .checked_add(Duration::from_micros(micros.into()))
            .ok_or(ConfigError::TickPeriodOutOfRange(secs))
            .and_then(Self::new)
    }

    pub fn get(self) -> Duration {
        self.0
    }

    /// Whole periods contained in `elapsed`, rounded down.
    pub fn ticks_in(self, elapsed: Duration) -> u64 {
        u64::try_from(elapsed.as_nanos() / self.0.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Which behaviour an action runs with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionLogic {
    /// Grants `amount` mana per tick to allies in range
    ManaAura { tick_period: TickPeriod },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionConfig {
    pub name: String,
    pub logic: ActionLogic,
    /// Resource granted per tick, sign is up to the receiver
    pub amount: i64,
    pub range: f32,
    /// Time after starting before the action may take effect
    pub exec_time: Duration,
    /// How long the action runs for, `None` runs until stopped
    pub duration: Option<Duration>,
    /// Animation trigger played on the actor when started
    pub anim: String,
}

impl ActionConfig {
    pub fn mana_aura(
        name: impl Into<String>,
        tick_period: Duration,
        amount: i64,
        range: f32,
    ) -> Result<Self, ConfigError> {
        if !range.is_finite() || range <= 0.0 {
            return Err(ConfigError::NonPositiveRange(range));
        }
        Ok(Self {
            name: name.into(),
            logic: ActionLogic::ManaAura {
                tick_period: TickPeriod::new(tick_period)?,
            },
            amount,
            range,
            exec_time: Duration::ZERO,
            duration: None,
            anim: String::new(),
        })
    }

    pub fn with_exec_time(mut self, exec_time: Duration) -> Self {
        self.exec_time = exec_time;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_anim(mut self, anim: impl Into<String>) -> Self {
        self.anim = anim.into();
        self
    }
}
