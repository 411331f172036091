// Path: crates/types/src/app/identity.rs

//! Defines the canonical `AccountId` and the deterministic derivation of
//! module-owned accounts such as the governance deposit custody account.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Domain separator for module account derivation.
const MODULE_ACCOUNT_DOMAIN: &[u8] = b"agora::module::";

/// A unique, stable identifier for an on-chain account, represented as 32 bytes.
///
/// Serializes as a lowercase hex string in human-readable formats and as the
/// raw 32 bytes under the canonical codec. The derived `Ord` is bytewise, which
/// matches the order of account-suffixed state keys.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Derives the account owned by a named module, e.g. the governance custody account.
    ///
    /// Nobody holds a key for this account; only the owning module moves funds out of it.
    pub fn module(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(MODULE_ACCOUNT_DOMAIN);
        hasher.update(name.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Returns the account id as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for AccountId {
    /// Allows treating the `AccountId` as a byte slice.
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for AccountId {
    type Error = String;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| format!("account id must be 32 bytes, got {}", bytes.len()))?;
        Ok(Self(arr))
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| format!("invalid account id hex: {}", e))?;
        Self::try_from(bytes.as_slice())
    }
}

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
