//! # Wizard Step Controller
//!
//! Linear progression through the fixed, ordered wizard steps. Each step
//! maps to a hand-assigned progress percentage; there is no formula and
//! no interpolation. Direct jumps are unconditional (a tab click in the
//! original flow); only `advance` models the sequential Continue button.

use serde::{Deserialize, Serialize};

// =============================================================================
// STEPS
// =============================================================================

/// The wizard steps, in visit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Basic,
    Fragments,
    Access,
    Security,
    Review,
}

impl WizardStep {
    /// All steps in order.
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Basic,
        WizardStep::Fragments,
        WizardStep::Access,
        WizardStep::Security,
        WizardStep::Review,
    ];

    /// Progress bar value shown while this step is active.
    #[must_use]
    pub fn progress(&self) -> u8 {
        match self {
            WizardStep::Basic => 20,
            WizardStep::Fragments => 40,
            WizardStep::Access => 60,
            WizardStep::Security => 80,
            WizardStep::Review => 100,
        }
    }

    /// The next step in order, or `None` on the final step.
    #[must_use]
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Basic => Some(WizardStep::Fragments),
            WizardStep::Fragments => Some(WizardStep::Access),
            WizardStep::Access => Some(WizardStep::Security),
            WizardStep::Security => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    /// The previous step in order, or `None` on the first step.
    #[must_use]
    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Basic => None,
            WizardStep::Fragments => Some(WizardStep::Basic),
            WizardStep::Access => Some(WizardStep::Fragments),
            WizardStep::Security => Some(WizardStep::Access),
            WizardStep::Review => Some(WizardStep::Security),
        }
    }

    /// Lowercase tab identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Basic => "basic",
            WizardStep::Fragments => "fragments",
            WizardStep::Access => "access",
            WizardStep::Security => "security",
            WizardStep::Review => "review",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Current step plus the derived progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    step: WizardStep,
    progress: u8,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    /// Start at the first step.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: WizardStep::Basic,
            progress: WizardStep::Basic.progress(),
        }
    }

    /// The active step.
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// The displayed progress value, always `step().progress()`.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Jump to a step unconditionally. No completion check is performed;
    /// this mirrors direct tab selection.
    pub fn go_to_step(&mut self, step: WizardStep) {
        self.step = step;
        self.progress = step.progress();
    }

    /// Move to the next step (the Continue button). Returns the new step,
    /// or `None` when already on the final step.
    pub fn advance(&mut self) -> Option<WizardStep> {
        let next = self.step.next()?;
        self.go_to_step(next);
        Some(next)
    }

    /// Move to the previous step. Returns the new step, or `None` when
    /// already on the first step.
    pub fn back(&mut self) -> Option<WizardStep> {
        let previous = self.step.previous()?;
        self.go_to_step(previous);
        Some(previous)
    }

    /// Whether the terminal Review step is active.
    #[must_use]
    pub fn at_review(&self) -> bool {
        self.step == WizardStep::Review
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_basic_with_20_percent() {
        let state = WizardState::new();
        assert_eq!(state.step(), WizardStep::Basic);
        assert_eq!(state.progress(), 20);
    }

    #[test]
    fn progress_lookup_is_static() {
        let expected = [20, 40, 60, 80, 100];
        for (step, want) in WizardStep::ALL.iter().zip(expected) {
            assert_eq!(step.progress(), want);
        }
    }

    #[test]
    fn advance_walks_steps_in_order() {
        let mut state = WizardState::new();
        let mut visited = vec![state.step()];
        while let Some(step) = state.advance() {
            visited.push(step);
        }
        assert_eq!(visited, WizardStep::ALL.to_vec());
        assert!(state.at_review());
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn advance_stops_at_review() {
        let mut state = WizardState::new();
        state.go_to_step(WizardStep::Review);
        assert_eq!(state.advance(), None);
        assert_eq!(state.step(), WizardStep::Review);
    }

    #[test]
    fn direct_jump_skips_without_guard() {
        let mut state = WizardState::new();
        state.go_to_step(WizardStep::Security);
        assert_eq!(state.step(), WizardStep::Security);
        assert_eq!(state.progress(), 80);
    }

    #[test]
    fn back_from_first_step_is_none() {
        let mut state = WizardState::new();
        assert_eq!(state.back(), None);

        state.go_to_step(WizardStep::Access);
        assert_eq!(state.back(), Some(WizardStep::Fragments));
        assert_eq!(state.progress(), 40);
    }
}
