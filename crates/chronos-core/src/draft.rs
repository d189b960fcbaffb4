//! # Vault Draft
//!
//! The complete in-memory state of one wizard instance, mutated only
//! through named transitions. Nothing here is persisted; the draft is
//! serialized into a [`VaultPayload`] at submission time and reset once
//! the backend accepts it.

use crate::deploy::Deployment;
use crate::fragments::FragmentSet;
use crate::payload::{
    Beneficiary, FragmentShare, GiftDetails, MultiSigConfig, ProtectionFlags, RecurringConfig,
    TokenGating, VaultMetadata, VaultPayload,
};
use crate::primitives::{
    format_iso8601, AssetType, AttachmentId, Chain, UserId, VaultType, SECONDS_PER_DAY,
};
use crate::score::{security_score, SecurityFeatures, SecurityLevel};
use crate::wizard::WizardState;
use serde::{Deserialize, Serialize};

// =============================================================================
// ACCESS RULES
// =============================================================================

/// A toggleable unlock rule shown in the Access step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Rule category tag: `time`, `price`, `event`, `consensus`.
    pub rule_type: String,
    /// Human-readable condition.
    pub condition: String,
    pub enabled: bool,
}

impl AccessRule {
    fn new(rule_type: &str, condition: &str, enabled: bool) -> Self {
        Self {
            rule_type: rule_type.to_owned(),
            condition: condition.to_owned(),
            enabled,
        }
    }

    /// The rule set presented when the wizard opens.
    #[must_use]
    pub fn defaults() -> Vec<AccessRule> {
        vec![
            AccessRule::new("time", "After 30 days", true),
            AccessRule::new("price", "If ETH > $5000", false),
            AccessRule::new("event", "On market crash (>20%)", false),
            AccessRule::new("consensus", "70% of signers approve", true),
        ]
    }
}

// =============================================================================
// DRAFT
// =============================================================================

/// One wizard instance's form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDraft {
    pub vault_type: VaultType,
    pub name: String,
    pub description: String,
    pub asset_type: AssetType,
    /// Decimal string; never parsed into a float.
    pub asset_amount: String,
    /// Primary chain; its wallet must be connected at submission.
    pub network_chain: Chain,
    pub time_lock_days: u32,

    pub fragments: FragmentSet,
    pub access_rules: Vec<AccessRule>,

    pub security_level: SecurityLevel,
    pub require_multisig: bool,
    pub multisig_threshold: u8,
    pub enable_geolocation: bool,
    pub enable_biometrics: bool,
    pub protections: ProtectionFlags,

    pub token_gating_enabled: bool,
    pub collection_address: String,
    pub required_nft_count: u32,

    pub gift: Option<GiftDetails>,
    pub recurring: Option<RecurringConfig>,

    pub beneficiaries: Vec<Beneficiary>,
    pub attachments: Vec<AttachmentId>,

    pub wizard: WizardState,
    pub deployment: Deployment,
}

impl VaultDraft {
    /// Fresh draft for the given vault flavor, with the wizard on its
    /// first step and the default fragment split.
    #[must_use]
    pub fn new(vault_type: VaultType) -> Self {
        let name = match vault_type {
            VaultType::Fragment => "My Cross-Chain Fragment Vault".to_owned(),
            VaultType::NftPowered => "My NFT-Powered Vault".to_owned(),
            _ => String::new(),
        };

        Self {
            vault_type,
            name,
            description: String::new(),
            asset_type: AssetType::Crypto,
            asset_amount: "1.0".to_owned(),
            network_chain: Chain::Ethereum,
            time_lock_days: 30,
            fragments: FragmentSet::default_split(),
            access_rules: AccessRule::defaults(),
            security_level: SecurityLevel::Standard,
            require_multisig: false,
            multisig_threshold: 2,
            enable_geolocation: false,
            enable_biometrics: false,
            protections: ProtectionFlags {
                cross_chain_validation: true,
                ..ProtectionFlags::default()
            },
            token_gating_enabled: false,
            collection_address: String::new(),
            required_nft_count: 1,
            gift: None,
            recurring: None,
            beneficiaries: Vec::new(),
            attachments: Vec::new(),
            wizard: WizardState::new(),
            deployment: Deployment::Idle,
        }
    }

    /// Flip an access rule's enabled flag. Out-of-range indices are
    /// ignored, matching the original handler.
    pub fn toggle_rule(&mut self, index: usize) {
        if let Some(rule) = self.access_rules.get_mut(index) {
            rule.enabled = !rule.enabled;
        }
    }

    /// Append a beneficiary.
    pub fn add_beneficiary(&mut self, name: impl Into<String>, wallet_address: impl Into<String>, share: u8) {
        self.beneficiaries.push(Beneficiary {
            name: name.into(),
            wallet_address: wallet_address.into(),
            share,
        });
    }

    /// Remove the beneficiary at `index`, if present.
    pub fn remove_beneficiary(&mut self, index: usize) {
        if index < self.beneficiaries.len() {
            self.beneficiaries.remove(index);
        }
    }

    /// Record an uploaded attachment for later association.
    pub fn add_attachment(&mut self, id: AttachmentId) {
        self.attachments.push(id);
    }

    /// The scored feature toggles.
    #[must_use]
    pub fn security_features(&self) -> SecurityFeatures {
        SecurityFeatures {
            multisig: self.require_multisig,
            geolocation: self.enable_geolocation,
            biometrics: self.enable_biometrics,
        }
    }

    /// Security score for the current configuration.
    #[must_use]
    pub fn security_score(&self) -> u8 {
        security_score(
            self.security_level,
            self.security_features(),
            self.time_lock_days,
        )
    }

    /// Unlock timestamp: `now` plus the time-lock period.
    #[must_use]
    pub fn unlock_at(&self, now_unix_secs: u64) -> u64 {
        now_unix_secs.saturating_add(u64::from(self.time_lock_days).saturating_mul(SECONDS_PER_DAY))
    }

    /// Assemble the creation payload from the current draft state.
    ///
    /// Disabled fragments are dropped; optional metadata sections are
    /// present only when their feature is configured.
    #[must_use]
    pub fn assemble_payload(&self, user: UserId, now_unix_secs: u64) -> VaultPayload {
        let fragments: Vec<FragmentShare> = if self.vault_type.uses_fragments() {
            self.fragments
                .enabled()
                .map(|f| FragmentShare {
                    chain: f.chain,
                    percentage: f.percentage,
                    address: f.address.clone(),
                    auto_period: f.auto_period_days,
                })
                .collect()
        } else {
            Vec::new()
        };

        let multi_sig = self.require_multisig.then(|| MultiSigConfig {
            threshold: self.multisig_threshold,
            approvers: Vec::new(),
        });

        let token_gating = self.token_gating_enabled.then(|| TokenGating {
            collection_address: self.collection_address.clone(),
            required_count: self.required_nft_count,
        });

        VaultPayload {
            user_id: user,
            name: self.name.clone(),
            description: self.description.clone(),
            vault_type: self.vault_type,
            asset_type: self.asset_type,
            asset_amount: self.asset_amount.clone(),
            time_lock_period: self.time_lock_days,
            unlock_date: format_iso8601(self.unlock_at(now_unix_secs)),
            metadata: VaultMetadata {
                security_level: self.security_level,
                network_chain: self.network_chain,
                security_features: self.security_features(),
                security_score: self.security_score(),
                gift_details: self.gift.clone(),
                multi_sig,
                recurring_details: self.recurring.clone(),
                token_gating,
                protections: Some(self.protections),
                fragments,
                beneficiaries: self.beneficiaries.clone(),
                attachment_ids: self.attachments.clone(),
            },
        }
    }

    /// Discard all form and collection state, returning to the defaults
    /// for the same vault flavor. Called after a successful submission.
    pub fn reset(&mut self) {
        *self = VaultDraft::new(self.vault_type);
    }
}

// =============================================================================
// TESTS
// =============================================================================
