//! # Core Primitives
//!
//! Shared identifiers, enumerations, and constants for the vault engine.
//!
//! All arithmetic is integer-only. Timestamps are unix seconds supplied
//! by the caller; the engine never reads a wall clock.

use serde::{Deserialize, Serialize};

// =============================================================================
// ALLOCATION CONSTANTS
// =============================================================================

/// Minimum number of chain fragments a vault must keep.
pub const MIN_FRAGMENTS: usize = 2;

/// Maximum number of chain fragments a vault may hold.
pub const MAX_FRAGMENTS: usize = 7;

/// Lower bound for a single fragment's percentage share.
pub const MIN_FRAGMENT_PERCENT: u8 = 1;

/// Upper bound for a single fragment's percentage share.
pub const MAX_FRAGMENT_PERCENT: u8 = 99;

/// Default auto-rebalance cadence for a freshly added fragment, in days.
pub const DEFAULT_AUTO_PERIOD_DAYS: u32 = 7;

/// Cadence of the deployment simulation timer, in milliseconds.
/// The core only sees ticks; the timer itself lives in the app layer.
pub const DEPLOY_TICK_MILLIS: u64 = 150;

/// Seconds per civil day, for time-lock arithmetic.
pub const SECONDS_PER_DAY: u64 = 86_400;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a stored vault record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct VaultId(pub u64);

/// Identifier of the user owning a vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct UserId(pub u64);

/// Identifier of an uploaded attachment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct AttachmentId(pub u64);

impl std::fmt::Display for VaultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CHAINS
// =============================================================================

/// A supported blockchain network.
///
/// The declaration order doubles as the candidate order used when a new
/// fragment picks the first chain not already present in the set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Ton,
    Solana,
    Bitcoin,
    Polygon,
    Avalanche,
    Tezos,
}

impl Chain {
    /// All supported chains, in candidate order.
    pub const CANDIDATES: [Chain; 7] = [
        Chain::Ethereum,
        Chain::Ton,
        Chain::Solana,
        Chain::Bitcoin,
        Chain::Polygon,
        Chain::Avalanche,
        Chain::Tezos,
    ];

    /// Lowercase string tag, matching the wire format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Ton => "ton",
            Chain::Solana => "solana",
            Chain::Bitcoin => "bitcoin",
            Chain::Polygon => "polygon",
            Chain::Avalanche => "avalanche",
            Chain::Tezos => "tezos",
        }
    }

    /// Parse a lowercase chain tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Chain> {
        Chain::CANDIDATES.iter().copied().find(|c| c.as_str() == tag)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VAULT CLASSIFICATION
// =============================================================================

/// The configurable vault flavors offered by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultType {
    Standard,
    Fragment,
    #[serde(rename = "nft-powered")]
    NftPowered,
    Gift,
    Multisig,
    Inheritance,
    Recurring,
}

impl VaultType {
    /// Prefix used for the human-facing reference generated when a
    /// deployment completes (e.g. `fragment-k3j9x0ab`).
    #[must_use]
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            VaultType::Standard => "vault",
            VaultType::Fragment => "fragment",
            VaultType::NftPowered => "nft",
            VaultType::Gift => "gift",
            VaultType::Multisig => "multisig",
            VaultType::Inheritance => "inheritance",
            VaultType::Recurring => "recurring",
        }
    }

    /// Whether this flavor splits assets into chain fragments.
    #[must_use]
    pub fn uses_fragments(&self) -> bool {
        matches!(self, VaultType::Fragment)
    }
}

/// The asset class locked inside a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Crypto,
    Tokens,
    Nft,
    Hybrid,
}

// =============================================================================
// TIME FORMATTING
// =============================================================================

/// Format a unix timestamp as an ISO-8601 UTC string (`YYYY-MM-DDTHH:MM:SSZ`).
///
/// Integer-only Gregorian conversion (Howard Hinnant's civil-from-days
/// algorithm), so payload timestamps stay deterministic.
#[must_use]
pub fn format_iso8601(unix_secs: u64) -> String {
    let days = (unix_secs / SECONDS_PER_DAY) as i64;
    let rem = unix_secs % SECONDS_PER_DAY;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Convert days since 1970-01-01 to a (year, month, day) civil date.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_tags_roundtrip() {
        for chain in Chain::CANDIDATES {
            assert_eq!(Chain::parse(chain.as_str()), Some(chain));
        }
        assert_eq!(Chain::parse("dogecoin"), None);
    }

    #[test]
    fn chain_candidate_order_starts_with_ethereum() {
        assert_eq!(Chain::CANDIDATES[0], Chain::Ethereum);
        assert_eq!(Chain::CANDIDATES.len(), MAX_FRAGMENTS);
    }

    #[test]
    fn vault_type_prefixes() {
        assert_eq!(VaultType::Fragment.reference_prefix(), "fragment");
        assert_eq!(VaultType::NftPowered.reference_prefix(), "nft");
        assert!(VaultType::Fragment.uses_fragments());
        assert!(!VaultType::Standard.uses_fragments());
    }

    #[test]
    fn iso8601_epoch() {
        assert_eq!(format_iso8601(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn iso8601_end_of_day() {
        assert_eq!(format_iso8601(86_399), "1970-01-01T23:59:59Z");
        assert_eq!(format_iso8601(86_400), "1970-01-02T00:00:00Z");
    }

    #[test]
    fn iso8601_known_timestamp() {
        // 2023-11-14 22:13:20 UTC
        assert_eq!(format_iso8601(1_700_000_000), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn iso8601_leap_day() {
        // 2024-02-29 00:00:00 UTC
        assert_eq!(format_iso8601(1_709_164_800), "2024-02-29T00:00:00Z");
    }
}
