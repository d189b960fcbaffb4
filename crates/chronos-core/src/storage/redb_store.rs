//! Durable vault store on redb.
//!
//! Records are postcard-encoded under monotonic u64 keys, one table per
//! record kind. The wire payload omits optional sections, which a
//! non-self-describing encoding cannot round-trip, so records are stored
//! through a flat [`StoredVault`] mirror with every field present.

use super::{AttachmentRecord, BeneficiaryRecord, StoreCounts, StoreError, VaultStore};
use crate::payload::{
    Beneficiary, BeneficiaryRequest, FragmentShare, GiftDetails, MultiSigConfig, ProtectionFlags,
    RecurringConfig, TokenGating, VaultMetadata, VaultPayload, VaultRecord,
};
use crate::primitives::{AssetType, AttachmentId, Chain, UserId, VaultId, VaultType};
use crate::score::{SecurityFeatures, SecurityLevel};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;

const VAULTS: TableDefinition<u64, &[u8]> = TableDefinition::new("vaults");
const BENEFICIARIES: TableDefinition<u64, &[u8]> = TableDefinition::new("beneficiaries");
const ATTACHMENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("attachments");

// =============================================================================
// STORAGE MIRROR
// =============================================================================

/// Postcard-friendly vault record: the payload flattened with every
/// optional section materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVault {
    user_id: UserId,
    name: String,
    description: String,
    vault_type: VaultType,
    asset_type: AssetType,
    asset_amount: String,
    time_lock_period: u32,
    unlock_date: String,
    security_level: SecurityLevel,
    network_chain: Chain,
    security_features: SecurityFeatures,
    security_score: u8,
    gift_details: Option<GiftDetails>,
    multi_sig: Option<MultiSigConfig>,
    recurring_details: Option<RecurringConfig>,
    token_gating: Option<TokenGating>,
    protections: Option<ProtectionFlags>,
    fragments: Vec<FragmentShare>,
    beneficiaries: Vec<Beneficiary>,
    attachment_ids: Vec<AttachmentId>,
}

impl From<&VaultPayload> for StoredVault {
    fn from(payload: &VaultPayload) -> Self {
        let metadata = &payload.metadata;
        Self {
            user_id: payload.user_id,
            name: payload.name.clone(),
            description: payload.description.clone(),
            vault_type: payload.vault_type,
            asset_type: payload.asset_type,
            asset_amount: payload.asset_amount.clone(),
            time_lock_period: payload.time_lock_period,
            unlock_date: payload.unlock_date.clone(),
            security_level: metadata.security_level,
            network_chain: metadata.network_chain,
            security_features: metadata.security_features,
            security_score: metadata.security_score,
            gift_details: metadata.gift_details.clone(),
            multi_sig: metadata.multi_sig.clone(),
            recurring_details: metadata.recurring_details.clone(),
            token_gating: metadata.token_gating.clone(),
            protections: metadata.protections,
            fragments: metadata.fragments.clone(),
            beneficiaries: metadata.beneficiaries.clone(),
            attachment_ids: metadata.attachment_ids.clone(),
        }
    }
}

impl StoredVault {
    fn into_record(self, id: u64) -> VaultRecord {
        VaultRecord {
            id: VaultId(id),
            payload: VaultPayload {
                user_id: self.user_id,
                name: self.name,
                description: self.description,
                vault_type: self.vault_type,
                asset_type: self.asset_type,
                asset_amount: self.asset_amount,
                time_lock_period: self.time_lock_period,
                unlock_date: self.unlock_date,
                metadata: VaultMetadata {
                    security_level: self.security_level,
                    network_chain: self.network_chain,
                    security_features: self.security_features,
                    security_score: self.security_score,
                    gift_details: self.gift_details,
                    multi_sig: self.multi_sig,
                    recurring_details: self.recurring_details,
                    token_gating: self.token_gating,
                    protections: self.protections,
                    fragments: self.fragments,
                    beneficiaries: self.beneficiaries,
                    attachment_ids: self.attachment_ids,
                },
            },
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Vault store backed by a redb database file.
pub struct RedbVaultStore {
    db: Database,
}

impl RedbVaultStore {
    /// Create (or reopen) a database at `path`, ensuring all tables
    /// exist.
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path)?;
        let txn = db.begin_write()?;
        {
            txn.open_table(VAULTS)?;
            txn.open_table(BENEFICIARIES)?;
            txn.open_table(ATTACHMENTS)?;
        }
        txn.commit()?;
        Ok(Self { db })
    }

    /// Open an existing database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::open(path)?;
        Ok(Self { db })
    }

    fn next_key<T: redb::ReadableTable<u64, &'static [u8]>>(
        table: &T,
    ) -> Result<u64, StoreError> {
        Ok(table
            .last()?
            .map(|(key, _)| key.value().saturating_add(1))
            .unwrap_or(1))
    }
}

impl VaultStore for RedbVaultStore {
    fn insert_vault(&mut self, payload: &VaultPayload) -> Result<VaultRecord, StoreError> {
        let txn = self.db.begin_write()?;
        let record = {
            let mut table = txn.open_table(VAULTS)?;
            let id = Self::next_key(&table)?;
            let bytes = postcard::to_stdvec(&StoredVault::from(payload))?;
            table.insert(id, bytes.as_slice())?;
            VaultRecord {
                id: VaultId(id),
                payload: payload.clone(),
            }
        };
        txn.commit()?;
        Ok(record)
    }

    fn vault(&self, id: VaultId) -> Result<Option<VaultRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(VAULTS)?;
        match table.get(id.0)? {
            Some(guard) => {
                let stored: StoredVault = postcard::from_bytes(guard.value())?;
                Ok(Some(stored.into_record(id.0)))
            }
            None => Ok(None),
        }
    }

    fn vaults(&self) -> Result<Vec<VaultRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(VAULTS)?;
        let mut records = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let stored: StoredVault = postcard::from_bytes(value.value())?;
            records.push(stored.into_record(key.value()));
        }
        Ok(records)
    }

    fn insert_beneficiary(
        &mut self,
        request: &BeneficiaryRequest,
    ) -> Result<BeneficiaryRecord, StoreError> {
        if self.vault(request.vault_id)?.is_none() {
            return Err(StoreError::VaultNotFound(request.vault_id));
        }

        let txn = self.db.begin_write()?;
        let record = {
            let mut table = txn.open_table(BENEFICIARIES)?;
            let id = Self::next_key(&table)?;
            let record = BeneficiaryRecord {
                id,
                vault_id: request.vault_id,
                name: request.name.clone(),
                wallet_address: request.wallet_address.clone(),
                share: request.share,
            };
            let bytes = postcard::to_stdvec(&record)?;
            table.insert(id, bytes.as_slice())?;
            record
        };
        txn.commit()?;
        Ok(record)
    }

    fn beneficiaries_for(&self, vault: VaultId) -> Result<Vec<BeneficiaryRecord>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(BENEFICIARIES)?;
        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let record: BeneficiaryRecord = postcard::from_bytes(value.value())?;
            if record.vault_id == vault {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn register_attachment(&mut self) -> Result<AttachmentRecord, StoreError> {
        let txn = self.db.begin_write()?;
        let record = {
            let mut table = txn.open_table(ATTACHMENTS)?;
            let id = Self::next_key(&table)?;
            let record = AttachmentRecord {
                id: AttachmentId(id),
                vault_id: None,
            };
            let bytes = postcard::to_stdvec(&record)?;
            table.insert(id, bytes.as_slice())?;
            record
        };
        txn.commit()?;
        Ok(record)
    }

    fn attach_to_vault(
        &mut self,
        id: AttachmentId,
        vault: VaultId,
    ) -> Result<AttachmentRecord, StoreError> {
        if self.vault(vault)?.is_none() {
            return Err(StoreError::VaultNotFound(vault));
        }

        let txn = self.db.begin_write()?;
        let record = {
            let mut table = txn.open_table(ATTACHMENTS)?;
            let existing = match table.get(id.0)? {
                Some(guard) => postcard::from_bytes::<AttachmentRecord>(guard.value())?,
                None => return Err(StoreError::AttachmentNotFound(id)),
            };
            let record = AttachmentRecord {
                vault_id: Some(vault),
                ..existing
            };
            let bytes = postcard::to_stdvec(&record)?;
            table.insert(id.0, bytes.as_slice())?;
            record
        };
        txn.commit()?;
        Ok(record)
    }

    fn counts(&self) -> Result<StoreCounts, StoreError> {
        let txn = self.db.begin_read()?;
        let vaults = txn.open_table(VAULTS)?.len()?;
        let beneficiaries = txn.open_table(BENEFICIARIES)?.len()?;
        let attachments = txn.open_table(ATTACHMENTS)?.len()?;
        Ok(StoreCounts {
            vaults,
            beneficiaries,
            attachments,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
