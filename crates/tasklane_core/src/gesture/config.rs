//! Gesture configuration.
//!
//! # Invariants
//! - `move_tolerance_cancel_px` is finite and non-negative.
//! - Defaults reproduce the nested-list feel: 150 ms arm delay, 10 px tolerance.

use crate::engine::hit_test::HitTestMode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Arm delay for nested task lists.
pub const NESTED_LIST_ARM_DELAY_MS: u64 = 150;
/// Arm delay for flat task lists.
pub const FLAT_LIST_ARM_DELAY_MS: u64 = 300;
/// Movement while armed beyond this many pixels on either axis disarms.
pub const DEFAULT_MOVE_TOLERANCE_PX: f64 = 10.0;

/// Invalid gesture configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidMoveTolerance(f64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMoveTolerance(value) => write!(
                f,
                "move tolerance must be a finite non-negative pixel count, got {value}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Caller-tunable gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Long-press delay before a drag starts.
    pub arm_delay_ms: u64,
    /// Movement on either axis that turns an armed press into a scroll/tap.
    pub move_tolerance_cancel_px: f64,
    pub hit_test_mode: HitTestMode,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::nested_list()
    }
}

impl GestureConfig {
    /// Preset for lists with sections and subtasks.
    pub fn nested_list() -> Self {
        Self {
            arm_delay_ms: NESTED_LIST_ARM_DELAY_MS,
            move_tolerance_cancel_px: DEFAULT_MOVE_TOLERANCE_PX,
            hit_test_mode: HitTestMode::Nested,
        }
    }

    /// Preset for flat lists without nesting.
    pub fn flat_list() -> Self {
        Self {
            arm_delay_ms: FLAT_LIST_ARM_DELAY_MS,
            move_tolerance_cancel_px: DEFAULT_MOVE_TOLERANCE_PX,
            hit_test_mode: HitTestMode::Flat,
        }
    }

    pub fn with_arm_delay_ms(mut self, arm_delay_ms: u64) -> Self {
        self.arm_delay_ms = arm_delay_ms;
        self
    }

    pub fn arm_delay(&self) -> Duration {
        Duration::from_millis(self.arm_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.move_tolerance_cancel_px;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidMoveTolerance(tolerance));
        }
        Ok(())
    }
}
