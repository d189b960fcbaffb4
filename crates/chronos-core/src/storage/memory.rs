//! In-memory vault store on BTreeMaps. Same contract as the redb store,
//! nothing survives the process.

use super::{AttachmentRecord, BeneficiaryRecord, StoreCounts, StoreError, VaultStore};
use crate::payload::{BeneficiaryRequest, VaultPayload, VaultRecord};
use crate::primitives::{AttachmentId, VaultId};
use std::collections::BTreeMap;

/// Ephemeral store used by tests and one-shot CLI sessions.
#[derive(Debug, Default)]
pub struct MemoryVaultStore {
    vaults: BTreeMap<u64, VaultRecord>,
    beneficiaries: BTreeMap<u64, BeneficiaryRecord>,
    attachments: BTreeMap<u64, AttachmentRecord>,
    next_vault_id: u64,
    next_beneficiary_id: u64,
    next_attachment_id: u64,
}

impl MemoryVaultStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl VaultStore for MemoryVaultStore {
    fn insert_vault(&mut self, payload: &VaultPayload) -> Result<VaultRecord, StoreError> {
        self.next_vault_id = self.next_vault_id.saturating_add(1);
        let record = VaultRecord {
            id: VaultId(self.next_vault_id),
            payload: payload.clone(),
        };
        self.vaults.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn vault(&self, id: VaultId) -> Result<Option<VaultRecord>, StoreError> {
        Ok(self.vaults.get(&id.0).cloned())
    }

    fn vaults(&self) -> Result<Vec<VaultRecord>, StoreError> {
        Ok(self.vaults.values().cloned().collect())
    }

    fn insert_beneficiary(
        &mut self,
        request: &BeneficiaryRequest,
    ) -> Result<BeneficiaryRecord, StoreError> {
        if !self.vaults.contains_key(&request.vault_id.0) {
            return Err(StoreError::VaultNotFound(request.vault_id));
        }

        self.next_beneficiary_id = self.next_beneficiary_id.saturating_add(1);
        let record = BeneficiaryRecord {
            id: self.next_beneficiary_id,
            vault_id: request.vault_id,
            name: request.name.clone(),
            wallet_address: request.wallet_address.clone(),
            share: request.share,
        };
        self.beneficiaries.insert(record.id, record.clone());
        Ok(record)
    }

    fn beneficiaries_for(&self, vault: VaultId) -> Result<Vec<BeneficiaryRecord>, StoreError> {
        Ok(self
            .beneficiaries
            .values()
            .filter(|b| b.vault_id == vault)
            .cloned()
            .collect())
    }

    fn register_attachment(&mut self) -> Result<AttachmentRecord, StoreError> {
        self.next_attachment_id = self.next_attachment_id.saturating_add(1);
        let record = AttachmentRecord {
            id: AttachmentId(self.next_attachment_id),
            vault_id: None,
        };
        self.attachments.insert(record.id.0, record);
        Ok(record)
    }

    fn attach_to_vault(
        &mut self,
        id: AttachmentId,
        vault: VaultId,
    ) -> Result<AttachmentRecord, StoreError> {
        if !self.vaults.contains_key(&vault.0) {
            return Err(StoreError::VaultNotFound(vault));
        }
        let record = self
            .attachments
            .get_mut(&id.0)
            .ok_or(StoreError::AttachmentNotFound(id))?;
        record.vault_id = Some(vault);
        Ok(*record)
    }

    fn counts(&self) -> Result<StoreCounts, StoreError> {
        Ok(StoreCounts {
            vaults: self.vaults.len() as u64,
            beneficiaries: self.beneficiaries.len() as u64,
            attachments: self.attachments.len() as u64,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
