//! `RocksDB` storage layer for groupgate.
//!
//! This crate persists one [`SubscriptionRecord`] per member using `RocksDB`
//! with a secondary index by the payment provider's subscription identifier,
//! because billing events identify subscriptions rather than members.
//!
//! # Architecture
//!
//! Column families:
//!
//! - `subscriptions`: records keyed by big-endian member ID
//! - `subscriptions_by_ref`: index from `subscription_ref` to member ID
//!
//! Every logical operation is a single atomic read-modify-write: multi-key
//! updates go through a `WriteBatch`, and a store-level mutex keeps
//! concurrent webhook handlers from interleaving their read and write halves.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use groupgate_core::{MemberId, SubscriptionRecord, SubscriptionStatus};

/// The storage trait defining all subscription-table operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g. `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    /// Insert or overwrite a member's subscription record.
    ///
    /// On insert, `created_at` is stamped with the current time; on update it
    /// is preserved and every other field is overwritten. The by-ref index is
    /// kept in step, including removal of a superseded index entry when a
    /// re-subscribe changes `subscription_ref`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_subscription(
        &self,
        member_id: MemberId,
        subscription_ref: Option<&str>,
        payer_ref: Option<&str>,
        status: SubscriptionStatus,
        period_end: i64,
    ) -> Result<SubscriptionRecord>;

    /// Get a member's subscription record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_subscription(&self, member_id: MemberId) -> Result<Option<SubscriptionRecord>>;

    /// Look up a member by the provider's subscription identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_subscription(
        &self,
        subscription_ref: &str,
    ) -> Result<Option<(MemberId, SubscriptionStatus)>>;

    /// Partially update the record identified by `subscription_ref`.
    ///
    /// When `period_end` is `None` the stored value is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record carries that
    /// subscription identifier.
    fn set_status(
        &self,
        subscription_ref: &str,
        status: SubscriptionStatus,
        period_end: Option<i64>,
    ) -> Result<()>;

    /// List members whose paid period ended before `now`, excluding records
    /// already cancelled (their access was stripped on cancellation).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_expired(&self, now: i64) -> Result<Vec<MemberId>>;
}
