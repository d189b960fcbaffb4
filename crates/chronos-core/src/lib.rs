//! # Chronos Core
//!
//! The deterministic vault configuration engine: fragment allocation,
//! wizard step control, the simulated deployment state machine,
//! validation, security scoring, payload assembly, the submission flow,
//! and durable vault record storage.
//!
//! The crate is pure and synchronous. Anything non-deterministic
//! (wall-clock time, timer cadence, randomness, the network) is injected
//! by the app layer through arguments and the [`submission`] traits.

pub mod deploy;
pub mod draft;
pub mod fragments;
pub mod payload;
pub mod primitives;
pub mod score;
pub mod storage;
pub mod submission;
pub mod validation;
pub mod wizard;

// Re-export the working surface at the crate root.
pub use deploy::{DeployPhase, Deployment, SplitMix, TickRng};
pub use draft::{AccessRule, VaultDraft};
pub use fragments::{AllocationError, Fragment, FragmentSet};
pub use payload::{
    AttachmentAssignment, Beneficiary, BeneficiaryRequest, FragmentShare, GiftDetails,
    MultiSigConfig, ProtectionFlags, RecurringConfig, TokenGating, VaultMetadata, VaultPayload,
    VaultRecord,
};
pub use primitives::{
    format_iso8601, AssetType, AttachmentId, Chain, UserId, VaultId, VaultType,
    DEFAULT_AUTO_PERIOD_DAYS, DEPLOY_TICK_MILLIS, MAX_FRAGMENTS, MAX_FRAGMENT_PERCENT,
    MIN_FRAGMENTS, MIN_FRAGMENT_PERCENT,
};
pub use score::{
    is_low_security, security_score, SecurityFeatures, SecurityLevel, BASE_SCORE,
    LOW_SECURITY_THRESHOLD,
};
pub use storage::{
    AttachmentRecord, BeneficiaryRecord, MemoryVaultStore, RedbVaultStore, StoreCounts,
    StoreError, VaultStore,
};
pub use submission::{
    submit, BackendError, BatchItem, BatchOutcome, StaticWallet, SubmissionError,
    SubmissionReport, VaultBackend, WalletError, WalletProvider, WalletRegistry,
};
pub use validation::{validate, validate_payload, ValidationError};
pub use wizard::{WizardState, WizardStep};
