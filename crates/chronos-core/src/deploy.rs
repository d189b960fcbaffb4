//! # Deployment Simulation
//!
//! The multi-phase "deploying across N blockchains" progress indicator.
//! Pure choreography: no network calls, no failure path. Each tick adds a
//! random increment in `[1, 5]` until progress reaches 100, at which
//! point a vault reference is generated from the same source.
//!
//! Randomness is injected through [`TickRng`] so the whole run is
//! deterministic under test; the app layer owns the 150 ms cadence and
//! the seed.

use crate::primitives::VaultType;
use serde::{Deserialize, Serialize};

// =============================================================================
// TICK RNG
// =============================================================================

/// Source of tick increments and reference material for the simulation.
pub trait TickRng {
    /// Next progress increment, always in `[1, 5]`.
    fn next_increment(&mut self) -> u8;

    /// Eight base-36 characters for the generated vault reference.
    fn reference_fragment(&mut self) -> String;
}

/// Default deterministic generator (SplitMix64), seeded explicitly.
#[derive(Debug, Clone)]
pub struct SplitMix {
    state: u64,
}

impl SplitMix {
    /// Create a generator from an explicit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl TickRng for SplitMix {
    fn next_increment(&mut self) -> u8 {
        (self.next_u64() % 5) as u8 + 1
    }

    fn reference_fragment(&mut self) -> String {
        const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut value = self.next_u64();
        let mut out = String::with_capacity(8);
        for _ in 0..8 {
            out.push(ALPHABET[(value % 36) as usize] as char);
            value /= 36;
        }
        out
    }
}

// =============================================================================
// PHASES
// =============================================================================

/// Display phase derived from the progress band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployPhase {
    CreatingPrimaryVault,
    DeployingVerificationContracts,
    InitializingCrossChainSecurity,
    FinalizingDeployment,
}

impl DeployPhase {
    /// Phase for a progress value in `[0, 100]`.
    #[must_use]
    pub fn for_progress(progress: u8) -> Self {
        match progress {
            0..=29 => DeployPhase::CreatingPrimaryVault,
            30..=59 => DeployPhase::DeployingVerificationContracts,
            60..=89 => DeployPhase::InitializingCrossChainSecurity,
            _ => DeployPhase::FinalizingDeployment,
        }
    }

    /// User-facing status line.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            DeployPhase::CreatingPrimaryVault => "Creating primary vault...",
            DeployPhase::DeployingVerificationContracts => "Deploying verification contracts...",
            DeployPhase::InitializingCrossChainSecurity => "Initializing cross-chain security...",
            DeployPhase::FinalizingDeployment => "Finalizing deployment...",
        }
    }
}

// =============================================================================
// DEPLOYMENT STATE MACHINE
// =============================================================================

/// Deployment progress as an explicit state machine.
///
/// `Deploying` and `Succeeded` are mutually exclusive by construction;
/// the simulated process has no failure state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Deployment {
    /// No deployment started or a previous one was reset.
    #[default]
    Idle,

    /// Progress counter is advancing.
    Deploying { progress: u8, vault_type: VaultType },

    /// Progress reached 100 and a reference was generated.
    Succeeded { reference: String },
}

impl Deployment {
    /// Enter the deploying state with progress reset to zero.
    pub fn begin(&mut self, vault_type: VaultType) {
        *self = Deployment::Deploying {
            progress: 0,
            vault_type,
        };
    }

    /// Advance by one tick. Progress is non-decreasing and clamps at
    /// exactly 100; on completion the state flips to `Succeeded` with a
    /// `prefix-base36` reference. Ticks outside `Deploying` are no-ops.
    ///
    /// Returns the progress value after the tick.
    pub fn tick(&mut self, rng: &mut impl TickRng) -> u8 {
        let Deployment::Deploying {
            progress,
            vault_type,
        } = self
        else {
            return self.progress();
        };

        let advanced = progress.saturating_add(rng.next_increment());
        if advanced >= 100 {
            let reference = format!(
                "{}-{}",
                vault_type.reference_prefix(),
                rng.reference_fragment()
            );
            *self = Deployment::Succeeded { reference };
            100
        } else {
            *progress = advanced;
            advanced
        }
    }

    /// Abandon the current run and return to `Idle`.
    pub fn reset(&mut self) {
        *self = Deployment::Idle;
    }

    /// Current progress value in `[0, 100]`.
    #[must_use]
    pub fn progress(&self) -> u8 {
        match self {
            Deployment::Idle => 0,
            Deployment::Deploying { progress, .. } => *progress,
            Deployment::Succeeded { .. } => 100,
        }
    }

    /// Display phase for the current progress.
    #[must_use]
    pub fn phase(&self) -> DeployPhase {
        DeployPhase::for_progress(self.progress())
    }

    /// True while the progress counter is advancing.
    #[must_use]
    pub fn is_deploying(&self) -> bool {
        matches!(self, Deployment::Deploying { .. })
    }

    /// True once the run completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Deployment::Succeeded { .. })
    }

    /// The generated vault reference, present only after success.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Deployment::Succeeded { reference } => Some(reference),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
