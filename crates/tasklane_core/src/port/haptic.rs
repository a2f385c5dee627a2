//! Haptic feedback port.
//!
//! # Invariants
//! - Impulses are fire-and-forget; failures are reported to the caller only
//!   as `HapticError` and are never retried.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Strength of one haptic impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticIntensity {
    Light,
    Medium,
    Heavy,
}

impl HapticIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

/// Opaque device-side failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HapticError(pub String);

impl Display for HapticError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "haptic impulse failed: {}", self.0)
    }
}

impl Error for HapticError {}

/// Device API used to request one impulse.
pub trait HapticPort {
    fn impulse(&self, intensity: HapticIntensity) -> Result<(), HapticError>;
}

impl<T: HapticPort + ?Sized> HapticPort for &T {
    fn impulse(&self, intensity: HapticIntensity) -> Result<(), HapticError> {
        (**self).impulse(intensity)
    }
}

/// Port for platforms without haptic hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticPort for NoHaptics {
    fn impulse(&self, _intensity: HapticIntensity) -> Result<(), HapticError> {
        Ok(())
    }
}
