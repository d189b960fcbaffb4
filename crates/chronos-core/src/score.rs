//! # Security Scoring
//!
//! Weighted-sum heuristic over the security toggles: a fixed point bonus
//! per enabled feature on top of a base score, capped at 100. Cosmetic
//! by design; this is not a cryptographic or risk metric.

use serde::{Deserialize, Serialize};

/// Starting score before any bonuses.
pub const BASE_SCORE: u8 = 65;

/// Scores below this threshold surface a warning to the user.
pub const LOW_SECURITY_THRESHOLD: u8 = 70;

// =============================================================================
// INPUTS
// =============================================================================

/// Overall protection tier selected in the Security step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[default]
    Standard,
    Enhanced,
    Maximum,
}

impl SecurityLevel {
    fn bonus(self) -> u8 {
        match self {
            SecurityLevel::Standard => 0,
            SecurityLevel::Enhanced => 10,
            SecurityLevel::Maximum => 20,
        }
    }
}

/// The individually scored feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecurityFeatures {
    pub multisig: bool,
    pub geolocation: bool,
    pub biometrics: bool,
}

// =============================================================================
// SCORING
// =============================================================================

/// Compute the security score for the given configuration.
///
/// Base 65; +10/+20 for the enhanced/maximum tier; +15 multisig;
/// +5 geolocation; +10 biometrics; +10 for a time-lock over a year,
/// +5 over 180 days. Capped at 100.
#[must_use]
pub fn security_score(
    level: SecurityLevel,
    features: SecurityFeatures,
    time_lock_days: u32,
) -> u8 {
    let mut score = u32::from(BASE_SCORE);

    score += u32::from(level.bonus());
    if features.multisig {
        score += 15;
    }
    if features.geolocation {
        score += 5;
    }
    if features.biometrics {
        score += 10;
    }

    if time_lock_days > 365 {
        score += 10;
    } else if time_lock_days > 180 {
        score += 5;
    }

    score.min(100) as u8
}

/// Whether a score is low enough to warrant a warning.
#[must_use]
pub fn is_low_security(score: u8) -> bool {
    score < LOW_SECURITY_THRESHOLD
}

// =============================================================================
// TESTS
// =============================================================================
