//! Key encoding utilities for `RocksDB`.

use groupgate_core::MemberId;

use crate::error::{Result, StoreError};

/// Create a subscription-record key from a member ID.
///
/// Big-endian so that keys iterate in numeric member-ID order.
#[must_use]
pub fn member_key(member_id: MemberId) -> [u8; 8] {
    member_id.to_be_bytes()
}

/// Decode a member ID from a subscription-record key.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if the key is not 8 bytes.
pub fn member_id_from_key(key: &[u8]) -> Result<MemberId> {
    MemberId::from_be_bytes(key)
        .map_err(|_| StoreError::Corrupt(format!("member key of length {}", key.len())))
}

/// Create a by-ref index key from a provider subscription identifier.
#[must_use]
pub fn subscription_ref_key(subscription_ref: &str) -> Vec<u8> {
    subscription_ref.as_bytes().to_vec()
}
