//! # Fragment Allocation
//!
//! An ordered set of chain fragments whose percentage shares are kept at
//! a 100% total across structural changes.
//!
//! Structural mutations (add/remove) redistribute every share to an equal
//! `floor(100 / n)` split and push the rounding remainder onto the first
//! fragment. Single-field percentage edits clamp the edited share so the
//! total never exceeds 100 but deliberately leave siblings untouched, so
//! a downward edit can leave the total under 100 until the submission
//! gate reports it. Disabling a fragment never renormalizes the rest.

use crate::primitives::{
    Chain, DEFAULT_AUTO_PERIOD_DAYS, MAX_FRAGMENTS, MAX_FRAGMENT_PERCENT, MIN_FRAGMENTS,
    MIN_FRAGMENT_PERCENT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Rejected fragment-set mutations.
///
/// Guards are enforced at the operation boundary; a rejected operation
/// leaves the set unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The set already holds the maximum number of fragments.
    #[error("you can't add more than {MAX_FRAGMENTS} blockchain fragments")]
    TooManyFragments,

    /// The set is already at the minimum number of fragments.
    #[error("your vault must have at least {MIN_FRAGMENTS} blockchain fragments")]
    TooFewFragments,

    /// The index does not name a fragment in the set.
    #[error("no fragment at index {0}")]
    IndexOutOfRange(usize),
}

// =============================================================================
// FRAGMENT
// =============================================================================

/// A single chain fragment: one share of the cross-chain asset split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Destination blockchain network.
    pub chain: Chain,

    /// Percentage share, in `[1, 99]`.
    pub percentage: u8,

    /// Destination address on the chain. Required for enabled fragments
    /// at submission time, free-form until then.
    pub address: String,

    /// Auto-rebalance cadence in days.
    pub auto_period_days: u32,

    /// Disabled fragments are excluded from the submission total and
    /// from the assembled payload.
    pub enabled: bool,
}

impl Fragment {
    /// Create an enabled fragment with the default auto period and an
    /// empty address.
    #[must_use]
    pub fn new(chain: Chain, percentage: u8) -> Self {
        Self {
            chain,
            percentage,
            address: String::new(),
            auto_period_days: DEFAULT_AUTO_PERIOD_DAYS,
            enabled: true,
        }
    }
}

// =============================================================================
// FRAGMENT SET
// =============================================================================

/// The ordered fragment collection behind the wizard's Fragments step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
}

impl Default for FragmentSet {
    fn default() -> Self {
        Self::default_split()
    }
}

impl FragmentSet {
    /// The default four-chain equal split presented when the wizard opens.
    #[must_use]
    pub fn default_split() -> Self {
        Self {
            fragments: vec![
                Fragment::new(Chain::Ethereum, 25),
                Fragment::new(Chain::Ton, 25),
                Fragment::new(Chain::Solana, 25),
                Fragment::new(Chain::Bitcoin, 25),
            ],
        }
    }

    /// Build a set from explicit fragments, without rebalancing.
    ///
    /// Used when loading a saved draft; the submission gate remains the
    /// enforcement point for the 100% total.
    #[must_use]
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Number of fragments, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True when the set holds no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    /// All fragments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Enabled fragments in order.
    pub fn enabled(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| f.enabled)
    }

    /// Number of enabled fragments.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    /// Percentage total over all fragments, enabled or not.
    #[must_use]
    pub fn total_percentage(&self) -> u32 {
        self.fragments.iter().map(|f| u32::from(f.percentage)).sum()
    }

    /// Percentage total over enabled fragments only. This is the figure
    /// the submission gate checks against 100.
    #[must_use]
    pub fn enabled_total(&self) -> u32 {
        self.enabled().map(|f| u32::from(f.percentage)).sum()
    }

    /// Append a fragment on the first chain not yet present, then
    /// redistribute every share to an equal split.
    ///
    /// Postcondition: `total_percentage() == 100`.
    pub fn add_fragment(&mut self) -> Result<(), AllocationError> {
        if self.fragments.len() >= MAX_FRAGMENTS {
            return Err(AllocationError::TooManyFragments);
        }

        let Some(chain) = Chain::CANDIDATES
            .iter()
            .copied()
            .find(|c| !self.fragments.iter().any(|f| f.chain == *c))
        else {
            // Candidate list is only exhausted at MAX_FRAGMENTS, guarded
            // above. Mirror the original no-op rather than erroring.
            return Ok(());
        };

        let new_len = self.fragments.len() + 1;
        let share = (100 / new_len) as u8;
        for fragment in &mut self.fragments {
            fragment.percentage = share;
        }
        self.fragments.push(Fragment::new(chain, share));
        self.absorb_rounding();
        Ok(())
    }

    /// Remove the fragment at `index`, then redistribute to an equal split.
    ///
    /// Postcondition: `total_percentage() == 100`.
    pub fn remove_fragment(&mut self, index: usize) -> Result<(), AllocationError> {
        if self.fragments.len() <= MIN_FRAGMENTS {
            return Err(AllocationError::TooFewFragments);
        }
        if index >= self.fragments.len() {
            return Err(AllocationError::IndexOutOfRange(index));
        }

        self.fragments.remove(index);
        let share = (100 / self.fragments.len()) as u8;
        for fragment in &mut self.fragments {
            fragment.percentage = share;
        }
        self.absorb_rounding();
        Ok(())
    }

    /// Set the percentage of the fragment at `index`.
    ///
    /// The requested value is clamped to `[1, 99]`, then capped at
    /// `100 - sum(other shares)` so the total cannot exceed 100. Sibling
    /// shares are not adjusted, so a downward edit may leave the total
    /// under 100.
    pub fn update_percentage(
        &mut self,
        index: usize,
        requested: u32,
    ) -> Result<u8, AllocationError> {
        if index >= self.fragments.len() {
            return Err(AllocationError::IndexOutOfRange(index));
        }

        let clamped = requested
            .clamp(u32::from(MIN_FRAGMENT_PERCENT), u32::from(MAX_FRAGMENT_PERCENT));

        let others: u32 = self
            .fragments
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, f)| u32::from(f.percentage))
            .sum();
        let available = 100u32.saturating_sub(others);

        let adjusted = clamped.min(available) as u8;
        self.fragments[index].percentage = adjusted;
        Ok(adjusted)
    }

    /// Flip the enabled flag of the fragment at `index`.
    ///
    /// Shares are left as they are; only the submission gate evaluates
    /// the enabled total.
    pub fn toggle_enabled(&mut self, index: usize) -> Result<bool, AllocationError> {
        let fragment = self
            .fragments
            .get_mut(index)
            .ok_or(AllocationError::IndexOutOfRange(index))?;
        fragment.enabled = !fragment.enabled;
        Ok(fragment.enabled)
    }

    /// Set the destination address of the fragment at `index`.
    pub fn set_address(
        &mut self,
        index: usize,
        address: impl Into<String>,
    ) -> Result<(), AllocationError> {
        let fragment = self
            .fragments
            .get_mut(index)
            .ok_or(AllocationError::IndexOutOfRange(index))?;
        fragment.address = address.into();
        Ok(())
    }

    /// Set the auto-rebalance cadence of the fragment at `index`.
    pub fn set_auto_period(
        &mut self,
        index: usize,
        days: u32,
    ) -> Result<(), AllocationError> {
        let fragment = self
            .fragments
            .get_mut(index)
            .ok_or(AllocationError::IndexOutOfRange(index))?;
        fragment.auto_period_days = days;
        Ok(())
    }

    /// Push the rounding remainder of an equal split onto the first
    /// fragment so the total lands exactly on 100.
    fn absorb_rounding(&mut self) {
        let total = self.total_percentage();
        if let Some(first) = self.fragments.first_mut() {
            if total < 100 {
                first.percentage = first.percentage.saturating_add((100 - total) as u8);
            } else if total > 100 {
                first.percentage = first.percentage.saturating_sub((total - 100) as u8);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
