//! # Storage Module
//!
//! Durable vault records behind the [`VaultStore`] trait.
//!
//! Two implementations:
//! - [`MemoryVaultStore`] for tests and ephemeral sessions
//! - [`RedbVaultStore`] on redb (ACID transactions, crash safety) with
//!   postcard-encoded records
//!
//! Every store doubles as a [`VaultBackend`], so the submission flow can
//! run against local storage without an HTTP hop.

mod memory;
mod redb_store;

pub use memory::MemoryVaultStore;
pub use redb_store::RedbVaultStore;

use crate::payload::{
    AttachmentAssignment, BeneficiaryRequest, VaultPayload, VaultRecord,
};
use crate::primitives::{AttachmentId, VaultId};
use crate::submission::{BackendError, VaultBackend};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Storage-layer failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No vault record with the given id.
    #[error("vault {0} not found")]
    VaultNotFound(VaultId),

    /// No attachment record with the given id.
    #[error("attachment {0} not found")]
    AttachmentNotFound(AttachmentId),

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    /// Record encoding/decoding failure.
    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),
}

impl From<redb::DatabaseError> for StoreError {
    fn from(e: redb::DatabaseError) -> Self {
        StoreError::Database(e.into())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Database(e.into())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(e: redb::TableError) -> Self {
        StoreError::Database(e.into())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Database(e.into())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(e: redb::CommitError) -> Self {
        StoreError::Database(e.into())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A stored beneficiary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryRecord {
    pub id: u64,
    pub vault_id: VaultId,
    pub name: String,
    pub wallet_address: String,
    pub share: u8,
}

/// A stored attachment row; `vault_id` is set on association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    pub id: AttachmentId,
    pub vault_id: Option<VaultId>,
}

/// Row counts, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub vaults: u64,
    pub beneficiaries: u64,
    pub attachments: u64,
}

// =============================================================================
// VAULT STORE TRAIT
// =============================================================================

/// The vault record store. Ids are assigned monotonically per table.
pub trait VaultStore {
    /// Persist a new vault record and return it with its assigned id.
    fn insert_vault(&mut self, payload: &VaultPayload) -> Result<VaultRecord, StoreError>;

    /// Fetch a vault record by id.
    fn vault(&self, id: VaultId) -> Result<Option<VaultRecord>, StoreError>;

    /// All vault records in id order.
    fn vaults(&self) -> Result<Vec<VaultRecord>, StoreError>;

    /// Persist a beneficiary row. The referenced vault must exist.
    fn insert_beneficiary(
        &mut self,
        request: &BeneficiaryRequest,
    ) -> Result<BeneficiaryRecord, StoreError>;

    /// Beneficiary rows for a vault, in id order.
    fn beneficiaries_for(&self, vault: VaultId) -> Result<Vec<BeneficiaryRecord>, StoreError>;

    /// Register a freshly uploaded, not-yet-associated attachment.
    fn register_attachment(&mut self) -> Result<AttachmentRecord, StoreError>;

    /// Associate an existing attachment with an existing vault.
    fn attach_to_vault(
        &mut self,
        id: AttachmentId,
        vault: VaultId,
    ) -> Result<AttachmentRecord, StoreError>;

    /// Row counts across all tables.
    fn counts(&self) -> Result<StoreCounts, StoreError>;
}

// =============================================================================
// STORES AS SUBMISSION BACKENDS
// =============================================================================

/// Any store can serve as the create-vault collaborator; store failures
/// surface as opaque backend messages, exactly like a remote call.
impl<S: VaultStore> VaultBackend for S {
    fn create_vault(&mut self, payload: &VaultPayload) -> Result<VaultRecord, BackendError> {
        self.insert_vault(payload)
            .map_err(|e| BackendError(e.to_string()))
    }

    fn create_beneficiary(&mut self, request: &BeneficiaryRequest) -> Result<(), BackendError> {
        self.insert_beneficiary(request)
            .map(|_| ())
            .map_err(|e| BackendError(e.to_string()))
    }

    fn assign_attachment(
        &mut self,
        id: AttachmentId,
        assignment: &AttachmentAssignment,
    ) -> Result<(), BackendError> {
        self.attach_to_vault(id, assignment.vault_id)
            .map(|_| ())
            .map_err(|e| BackendError(e.to_string()))
    }
}
