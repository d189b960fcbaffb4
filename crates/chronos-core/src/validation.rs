//! # Submission Gate
//!
//! The synchronous checks run when the Review step's Create button is
//! pressed. Each failure carries its own user-facing message; the first
//! failing check aborts submission and nothing is mutated.

use crate::draft::VaultDraft;
use crate::primitives::Chain;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// A failed pre-submission check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The vault has no name.
    #[error("please provide a name for your vault")]
    NameRequired,

    /// Enabled fragment shares do not sum to 100.
    #[error("the total distribution must equal 100% (currently {total}%)")]
    InvalidDistribution { total: u32 },

    /// An enabled fragment has no destination address.
    #[error("please provide addresses for all enabled blockchain fragments ({chain} is missing one)")]
    MissingFragmentAddress { chain: Chain },

    /// Token gating is enabled but no collection address was given.
    #[error("please provide an NFT collection address for token gating")]
    MissingCollectionAddress,
}

// =============================================================================
// GATE
// =============================================================================

/// Run the submission checks in their observed order.
///
/// Fragment checks apply only to fragment vaults; the distribution total
/// is evaluated over enabled fragments only, so a set that passed while
/// fully enabled can fail here after a toggle.
pub fn validate(draft: &VaultDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if draft.vault_type.uses_fragments() {
        let total = draft.fragments.enabled_total();
        if total != 100 {
            return Err(ValidationError::InvalidDistribution { total });
        }

        if let Some(fragment) = draft.fragments.enabled().find(|f| f.address.trim().is_empty()) {
            return Err(ValidationError::MissingFragmentAddress {
                chain: fragment.chain,
            });
        }
    }

    if draft.token_gating_enabled && draft.collection_address.trim().is_empty() {
        return Err(ValidationError::MissingCollectionAddress);
    }

    Ok(())
}

/// Re-run the gate against an assembled payload.
///
/// The server applies the same checks to whatever reaches the wire:
/// submitted fragments are the enabled ones, so the distribution check
/// covers every fragment present.
pub fn validate_payload(payload: &crate::payload::VaultPayload) -> Result<(), ValidationError> {
    if payload.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if payload.vault_type.uses_fragments() {
        let total: u32 = payload
            .metadata
            .fragments
            .iter()
            .map(|f| u32::from(f.percentage))
            .sum();
        if total != 100 {
            return Err(ValidationError::InvalidDistribution { total });
        }

        if let Some(fragment) = payload
            .metadata
            .fragments
            .iter()
            .find(|f| f.address.trim().is_empty())
        {
            return Err(ValidationError::MissingFragmentAddress {
                chain: fragment.chain,
            });
        }
    }

    if let Some(gating) = &payload.metadata.token_gating {
        if gating.collection_address.trim().is_empty() {
            return Err(ValidationError::MissingCollectionAddress);
        }
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::{Fragment, FragmentSet};
    use crate::primitives::VaultType;

    fn valid_fragment_draft() -> VaultDraft {
        let mut draft = VaultDraft::new(VaultType::Fragment);
        for index in 0..draft.fragments.len() {
            draft
                .fragments
                .set_address(index, format!("addr-{index}"))
                .expect("index in range");
        }
        draft
    }

    #[test]
    fn default_addresses_are_missing() {
        let draft = VaultDraft::new(VaultType::Fragment);
        assert_eq!(
            validate(&draft),
            Err(ValidationError::MissingFragmentAddress {
                chain: Chain::Ethereum
            })
        );
    }

    #[test]
    fn complete_fragment_draft_passes() {
        assert_eq!(validate(&valid_fragment_draft()), Ok(()));
    }

    #[test]
    fn blank_name_is_rejected_first() {
        let mut draft = VaultDraft::new(VaultType::Fragment);
        draft.name = "   ".into();
        // Addresses are also missing, but the name check runs first.
        assert_eq!(validate(&draft), Err(ValidationError::NameRequired));
    }

    #[test]
    fn disabled_fragment_breaks_the_distribution() {
        let mut draft = VaultDraft::new(VaultType::Fragment);
        draft.fragments = FragmentSet::from_fragments(vec![
            Fragment {
                chain: Chain::Ethereum,
                percentage: 60,
                address: "a".into(),
                auto_period_days: 7,
                enabled: true,
            },
            Fragment {
                chain: Chain::Ton,
                percentage: 30,
                address: "b".into(),
                auto_period_days: 7,
                enabled: true,
            },
            Fragment {
                chain: Chain::Solana,
                percentage: 10,
                address: String::new(),
                auto_period_days: 7,
                enabled: false,
            },
        ]);

        assert_eq!(
            validate(&draft),
            Err(ValidationError::InvalidDistribution { total: 90 })
        );
    }

    #[test]
    fn under_total_after_downward_edit_is_caught_here() {
        let mut draft = valid_fragment_draft();
        draft.fragments.update_percentage(1, 10).expect("in range");
        assert_eq!(
            validate(&draft),
            Err(ValidationError::InvalidDistribution { total: 85 })
        );
    }

    #[test]
    fn non_fragment_vaults_skip_distribution_checks() {
        let mut draft = VaultDraft::new(VaultType::Gift);
        draft.name = "Gift".into();
        // The default fragment set has no addresses, but gift vaults
        // never submit fragments.
        assert_eq!(validate(&draft), Ok(()));
    }

    #[test]
    fn payload_gate_matches_draft_gate() {
        use crate::primitives::UserId;

        let draft = valid_fragment_draft();
        let payload = draft.assemble_payload(UserId(1), 0);
        assert_eq!(validate_payload(&payload), Ok(()));

        let mut short = payload.clone();
        short.metadata.fragments.pop();
        assert_eq!(
            validate_payload(&short),
            Err(ValidationError::InvalidDistribution { total: 75 })
        );

        let mut unnamed = payload;
        unnamed.name.clear();
        assert_eq!(validate_payload(&unnamed), Err(ValidationError::NameRequired));
    }

    #[test]
    fn token_gating_requires_collection_address() {
        let mut draft = VaultDraft::new(VaultType::NftPowered);
        draft.token_gating_enabled = true;
        assert_eq!(validate(&draft), Err(ValidationError::MissingCollectionAddress));

        draft.collection_address = "0xcollection".into();
        assert_eq!(validate(&draft), Ok(()));
    }
}
