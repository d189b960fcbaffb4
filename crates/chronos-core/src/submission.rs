//! # Submission Flow
//!
//! Orchestrates the Review-step Create action: gate checks, lazy wallet
//! connection for the primary chain, the create-vault call, then the
//! sequential per-beneficiary and per-attachment follow-ups.
//!
//! Follow-up calls are attempt-once and never rolled back; each item's
//! outcome is recorded individually in the [`SubmissionReport`] so the
//! caller can say exactly which beneficiaries were persisted.

use crate::draft::VaultDraft;
use crate::payload::{
    AttachmentAssignment, Beneficiary, BeneficiaryRequest, VaultPayload, VaultRecord,
};
use crate::primitives::{AttachmentId, Chain, UserId};
use crate::validation::{validate, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// WALLETS
// =============================================================================

/// A chain wallet capability: connection state plus a connect action.
pub trait WalletProvider {
    /// Whether the wallet is currently connected.
    fn is_connected(&self) -> bool;

    /// Attempt to establish a connection.
    fn connect(&mut self) -> Result<(), WalletError>;
}

/// Wallet-side submission failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No provider is registered for the chain.
    #[error("{chain} wallet connection is not yet supported")]
    Unsupported { chain: Chain },

    /// The provider could not establish a connection.
    #[error("wallet connection required to create vault")]
    ConnectionRequired,
}

/// Per-chain wallet providers, consulted lazily at submission time.
#[derive(Default)]
pub struct WalletRegistry {
    providers: BTreeMap<Chain, Box<dyn WalletProvider>>,
}

impl WalletRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for a chain, replacing any existing one.
    pub fn register(&mut self, chain: Chain, provider: Box<dyn WalletProvider>) {
        self.providers.insert(chain, provider);
    }

    /// Make sure the chain's wallet is connected, connecting lazily if
    /// it is not. Errors if no provider exists or the connection attempt
    /// leaves the wallet disconnected.
    pub fn ensure_connected(&mut self, chain: Chain) -> Result<(), WalletError> {
        let provider = self
            .providers
            .get_mut(&chain)
            .ok_or(WalletError::Unsupported { chain })?;

        if !provider.is_connected() {
            provider.connect()?;
            if !provider.is_connected() {
                return Err(WalletError::ConnectionRequired);
            }
        }
        Ok(())
    }
}

/// Fixed-state wallet used by the CLI and by tests.
#[derive(Debug, Clone)]
pub struct StaticWallet {
    connected: bool,
    connectable: bool,
}

impl StaticWallet {
    /// A wallet that is already connected.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            connected: true,
            connectable: true,
        }
    }

    /// A wallet that connects on first use.
    #[must_use]
    pub fn connectable() -> Self {
        Self {
            connected: false,
            connectable: true,
        }
    }

    /// A wallet whose connection attempts never succeed.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            connected: false,
            connectable: false,
        }
    }
}

impl WalletProvider for StaticWallet {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), WalletError> {
        if self.connectable {
            self.connected = true;
            Ok(())
        } else {
            Err(WalletError::ConnectionRequired)
        }
    }
}

// =============================================================================
// BACKEND
// =============================================================================

/// Opaque failure from the create-vault collaborator. Callers see the
/// message only; no distinction is made between failure causes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// The external vault-creation service, as seen by the wizard.
pub trait VaultBackend {
    /// `POST /api/vaults`.
    fn create_vault(&mut self, payload: &VaultPayload) -> Result<VaultRecord, BackendError>;

    /// `POST /api/beneficiaries`.
    fn create_beneficiary(&mut self, request: &BeneficiaryRequest) -> Result<(), BackendError>;

    /// `PUT /api/attachments/:id`.
    fn assign_attachment(
        &mut self,
        id: AttachmentId,
        assignment: &AttachmentAssignment,
    ) -> Result<(), BackendError>;
}

// =============================================================================
// REPORT
// =============================================================================

/// Outcome of one follow-up call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum BatchOutcome {
    Succeeded,
    Failed { message: String },
}

impl BatchOutcome {
    /// True for `Succeeded`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Succeeded)
    }
}

/// One follow-up item with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem<T> {
    pub item: T,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// Result of a completed submission: the created vault plus the
/// per-item outcomes of the sequential follow-up calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub vault: VaultRecord,
    pub beneficiaries: Vec<BatchItem<Beneficiary>>,
    pub attachments: Vec<BatchItem<AttachmentId>>,
}

impl SubmissionReport {
    /// Whether every follow-up call succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.beneficiaries.iter().all(|b| b.outcome.is_success())
            && self.attachments.iter().all(|a| a.outcome.is_success())
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Why a submission was aborted. Follow-up failures do not abort; they
/// land in the report instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// A pre-submission check failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The primary chain's wallet could not be connected.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The create-vault call failed.
    #[error("error creating vault: {0}")]
    Backend(String),
}

// =============================================================================
// SUBMIT
// =============================================================================

/// Run the full submission flow.
///
/// Order: gate checks, lazy wallet connection, create vault, then one
/// sequential attempt per beneficiary and per attachment. The draft is
/// reset once the vault record exists, even if follow-ups failed:
/// partial persistence is reported, not rolled back.
pub fn submit(
    draft: &mut VaultDraft,
    user: UserId,
    now_unix_secs: u64,
    wallets: &mut WalletRegistry,
    backend: &mut dyn VaultBackend,
) -> Result<SubmissionReport, SubmissionError> {
    validate(draft)?;
    wallets.ensure_connected(draft.network_chain)?;

    let payload = draft.assemble_payload(user, now_unix_secs);
    let vault = backend
        .create_vault(&payload)
        .map_err(|e| SubmissionError::Backend(e.to_string()))?;

    let mut beneficiaries = Vec::with_capacity(payload.metadata.beneficiaries.len());
    for beneficiary in &payload.metadata.beneficiaries {
        let request = BeneficiaryRequest {
            vault_id: vault.id,
            name: beneficiary.name.clone(),
            wallet_address: beneficiary.wallet_address.clone(),
            share: beneficiary.share,
        };
        let outcome = match backend.create_beneficiary(&request) {
            Ok(()) => BatchOutcome::Succeeded,
            Err(e) => BatchOutcome::Failed {
                message: e.to_string(),
            },
        };
        beneficiaries.push(BatchItem {
            item: beneficiary.clone(),
            outcome,
        });
    }

    let mut attachments = Vec::with_capacity(payload.metadata.attachment_ids.len());
    for &id in &payload.metadata.attachment_ids {
        let assignment = AttachmentAssignment { vault_id: vault.id };
        let outcome = match backend.assign_attachment(id, &assignment) {
            Ok(()) => BatchOutcome::Succeeded,
            Err(e) => BatchOutcome::Failed {
                message: e.to_string(),
            },
        };
        attachments.push(BatchItem { item: id, outcome });
    }

    draft.reset();

    Ok(SubmissionReport {
        vault,
        beneficiaries,
        attachments,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{VaultId, VaultType};

    /// Backend that records calls and fails where told to.
    #[derive(Default)]
    struct MockBackend {
        vaults: Vec<VaultPayload>,
        beneficiaries: Vec<BeneficiaryRequest>,
        assignments: Vec<AttachmentId>,
        fail_create: bool,
        fail_beneficiary_names: Vec<String>,
    }

    impl VaultBackend for MockBackend {
        fn create_vault(&mut self, payload: &VaultPayload) -> Result<VaultRecord, BackendError> {
            if self.fail_create {
                return Err(BackendError("service unavailable".into()));
            }
            self.vaults.push(payload.clone());
            Ok(VaultRecord {
                id: VaultId(self.vaults.len() as u64),
                payload: payload.clone(),
            })
        }

        fn create_beneficiary(
            &mut self,
            request: &BeneficiaryRequest,
        ) -> Result<(), BackendError> {
            if self.fail_beneficiary_names.contains(&request.name) {
                return Err(BackendError("beneficiary rejected".into()));
            }
            self.beneficiaries.push(request.clone());
            Ok(())
        }

        fn assign_attachment(
            &mut self,
            id: AttachmentId,
            _assignment: &AttachmentAssignment,
        ) -> Result<(), BackendError> {
            self.assignments.push(id);
            Ok(())
        }
    }

    fn wallets_with(chain: Chain, wallet: StaticWallet) -> WalletRegistry {
        let mut registry = WalletRegistry::new();
        registry.register(chain, Box::new(wallet));
        registry
    }

    fn submit_ready_draft() -> VaultDraft {
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
    fn validation_failure_reaches_no_collaborator() {
        let mut draft = VaultDraft::new(VaultType::Fragment);
        draft.name.clear();
        let mut wallets = wallets_with(Chain::Ethereum, StaticWallet::connected());
        let mut backend = MockBackend::default();

        let result = submit(&mut draft, UserId(1), 0, &mut wallets, &mut backend);
        assert!(matches!(result, Err(SubmissionError::Validation(_))));
        assert!(backend.vaults.is_empty());
        // The draft is untouched on failure.
        assert!(draft.name.is_empty());
    }

    #[test]
    fn wallet_connects_lazily() {
        let mut draft = submit_ready_draft();
        let mut wallets = wallets_with(Chain::Ethereum, StaticWallet::connectable());
        let mut backend = MockBackend::default();

        let report =
            submit(&mut draft, UserId(1), 0, &mut wallets, &mut backend).expect("submits");
        assert_eq!(report.vault.id, VaultId(1));
        assert!(wallets.ensure_connected(Chain::Ethereum).is_ok());
    }

    #[test]
    fn offline_wallet_aborts_submission() {
        let mut draft = submit_ready_draft();
        let mut wallets = wallets_with(Chain::Ethereum, StaticWallet::offline());
        let mut backend = MockBackend::default();

        let result = submit(&mut draft, UserId(1), 0, &mut wallets, &mut backend);
        assert_eq!(
            result,
            Err(SubmissionError::Wallet(WalletError::ConnectionRequired))
        );
        assert!(backend.vaults.is_empty());
    }

    #[test]
    fn unsupported_chain_is_reported() {
        let mut draft = submit_ready_draft();
        draft.network_chain = Chain::Tezos;
        let mut wallets = wallets_with(Chain::Ethereum, StaticWallet::connected());
        let mut backend = MockBackend::default();

        let result = submit(&mut draft, UserId(1), 0, &mut wallets, &mut backend);
        assert_eq!(
            result,
            Err(SubmissionError::Wallet(WalletError::Unsupported {
                chain: Chain::Tezos
            }))
        );
    }

    #[test]
    fn backend_failure_keeps_draft() {
        let mut draft = submit_ready_draft();
        let mut wallets = wallets_with(Chain::Ethereum, StaticWallet::connected());
        let mut backend = MockBackend {
            fail_create: true,
            ..MockBackend::default()
        };

        let result = submit(&mut draft, UserId(1), 0, &mut wallets, &mut backend);
        assert_eq!(
            result,
            Err(SubmissionError::Backend("service unavailable".into()))
        );
        assert_eq!(draft.name, "My Cross-Chain Fragment Vault");
    }

    #[test]
    fn follow_ups_run_sequentially_and_report_per_item() {
        let mut draft = submit_ready_draft();
        draft.add_beneficiary("Alice", "0xaaa", 40);
        draft.add_beneficiary("Bob", "0xbbb", 35);
        draft.add_beneficiary("Carol", "0xccc", 25);
        draft.add_attachment(AttachmentId(9));

        let mut wallets = wallets_with(Chain::Ethereum, StaticWallet::connected());
        let mut backend = MockBackend {
            fail_beneficiary_names: vec!["Bob".into()],
            ..MockBackend::default()
        };

        let report =
            submit(&mut draft, UserId(1), 0, &mut wallets, &mut backend).expect("vault created");

        // Bob failed, Alice and Carol persisted; no rollback occurred.
        assert!(!report.all_succeeded());
        let outcomes: Vec<bool> = report
            .beneficiaries
            .iter()
            .map(|b| b.outcome.is_success())
            .collect();
        assert_eq!(outcomes, vec![true, false, true]);
        assert_eq!(backend.beneficiaries.len(), 2);
        assert_eq!(backend.assignments, vec![AttachmentId(9)]);

        // Successful creation resets the draft even with partial failures.
        assert!(draft.beneficiaries.is_empty());
        assert_eq!(draft, VaultDraft::new(VaultType::Fragment));
    }

    #[test]
    fn report_serializes_outcomes() {
        let report = SubmissionReport {
            vault: VaultRecord {
                id: VaultId(3),
                payload: submit_ready_draft().assemble_payload(UserId(1), 0),
            },
            beneficiaries: vec![BatchItem {
                item: Beneficiary {
                    name: "Alice".into(),
                    wallet_address: "0xaaa".into(),
                    share: 100,
                },
                outcome: BatchOutcome::Failed {
                    message: "beneficiary rejected".into(),
                },
            }],
            attachments: Vec::new(),
        };

        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["beneficiaries"][0]["outcome"], "failed");
        assert_eq!(json["beneficiaries"][0]["message"], "beneficiary rejected");
    }
}
