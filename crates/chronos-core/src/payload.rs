//! # Wire Payloads
//!
//! Serde types for the vault creation API. Field names are camelCase on
//! the wire. `metadata` nests the feature-specific sub-objects; optional
//! sections are omitted entirely when absent.

use crate::primitives::{AssetType, AttachmentId, Chain, UserId, VaultId, VaultType};
use crate::score::{SecurityFeatures, SecurityLevel};
use serde::{Deserialize, Serialize};

// =============================================================================
// CREATE-VAULT PAYLOAD
// =============================================================================

/// Body of `POST /api/vaults`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPayload {
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub vault_type: VaultType,
    pub asset_type: AssetType,
    /// Decimal string, passed through untouched (no float arithmetic).
    pub asset_amount: String,
    /// Time-lock period in days.
    pub time_lock_period: u32,
    /// ISO-8601 UTC timestamp.
    pub unlock_date: String,
    pub metadata: VaultMetadata,
}

/// Free-form feature metadata nested inside the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultMetadata {
    pub security_level: SecurityLevel,
    pub network_chain: Chain,
    pub security_features: SecurityFeatures,
    pub security_score: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_details: Option<GiftDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_sig: Option<MultiSigConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_details: Option<RecurringConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_gating: Option<TokenGating>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protections: Option<ProtectionFlags>,

    /// Enabled chain fragments only; disabled fragments never reach the
    /// wire.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<FragmentShare>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beneficiaries: Vec<Beneficiary>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<AttachmentId>,
}

// =============================================================================
// METADATA SECTIONS
// =============================================================================

/// Gift delivery details for gift vaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftDetails {
    pub recipient_address: String,
    pub message: String,
    pub send_immediately: bool,
}

/// Multi-signature configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSigConfig {
    pub threshold: u8,
    #[serde(default)]
    pub approvers: Vec<String>,
}

/// Recurring-deposit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringConfig {
    /// Decimal string, like `assetAmount`.
    pub amount: String,
    /// Cadence tag: `weekly`, `monthly`, ...
    pub period: String,
}

/// NFT token-gating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGating {
    pub collection_address: String,
    pub required_count: u32,
}

/// The cosmetic protection toggles from the Security step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionFlags {
    pub double_encryption: bool,
    pub cross_chain_validation: bool,
    pub auto_rebalance: bool,
    pub quantum_resistance: bool,
    pub zk_proof: bool,
}

/// One enabled chain fragment as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentShare {
    pub chain: Chain,
    pub percentage: u8,
    pub address: String,
    pub auto_period: u32,
}

/// A beneficiary attached to the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub name: String,
    pub wallet_address: String,
    /// Percentage share of the vault.
    pub share: u8,
}

// =============================================================================
// FOLLOW-UP REQUESTS AND RECORDS
// =============================================================================

/// Body of `POST /api/beneficiaries`, issued once per beneficiary after
/// vault creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryRequest {
    pub vault_id: VaultId,
    pub name: String,
    pub wallet_address: String,
    pub share: u8,
}

/// Body of `PUT /api/attachments/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentAssignment {
    pub vault_id: VaultId,
}

/// A stored vault record: the payload plus its assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    pub id: VaultId,
    #[serde(flatten)]
    pub payload: VaultPayload,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::UserId;

    fn minimal_payload() -> VaultPayload {
        VaultPayload {
            user_id: UserId(1),
            name: "Test Vault".into(),
            description: String::new(),
            vault_type: VaultType::Fragment,
            asset_type: AssetType::Crypto,
            asset_amount: "1.0".into(),
            time_lock_period: 30,
            unlock_date: "2026-09-04T00:00:00Z".into(),
            metadata: VaultMetadata {
                security_level: SecurityLevel::Standard,
                network_chain: Chain::Ethereum,
                security_features: SecurityFeatures::default(),
                security_score: 65,
                gift_details: None,
                multi_sig: None,
                recurring_details: None,
                token_gating: None,
                protections: None,
                fragments: Vec::new(),
                beneficiaries: Vec::new(),
                attachment_ids: Vec::new(),
            },
        }
    }

    #[test]
    fn payload_uses_camel_case_keys() {
        let json = serde_json::to_value(minimal_payload()).expect("serializable");
        assert!(json.get("userId").is_some());
        assert!(json.get("vaultType").is_some());
        assert!(json.get("timeLockPeriod").is_some());
        assert!(json.get("unlockDate").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn empty_metadata_sections_are_omitted() {
        let json = serde_json::to_value(minimal_payload()).expect("serializable");
        let metadata = json.get("metadata").expect("metadata present");
        assert!(metadata.get("giftDetails").is_none());
        assert!(metadata.get("multiSig").is_none());
        assert!(metadata.get("fragments").is_none());
        assert!(metadata.get("beneficiaries").is_none());
        assert!(metadata.get("securityScore").is_some());
    }

    #[test]
    fn chain_and_type_tags_are_lowercase() {
        let json = serde_json::to_value(minimal_payload()).expect("serializable");
        assert_eq!(json["vaultType"], "fragment");
        assert_eq!(json["assetType"], "crypto");
        assert_eq!(json["metadata"]["networkChain"], "ethereum");
    }

    #[test]
    fn record_flattens_payload() {
        let record = VaultRecord {
            id: VaultId(7),
            payload: minimal_payload(),
        };
        let json = serde_json::to_value(&record).expect("serializable");
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Test Vault");

        let back: VaultRecord = serde_json::from_value(json).expect("deserializable");
        assert_eq!(back, record);
    }
}
