//! Subscription records and billing status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MemberId;

/// Billing status of a member's subscription.
///
/// Mirrors the payment provider's lifecycle vocabulary. Provider statuses
/// outside this set (trialing, incomplete, ...) map to [`Self::Unknown`] and
/// are treated as non-granting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid up for the current period.
    Active,

    /// A renewal payment failed; access is paused pending recovery.
    PastDue,

    /// The subscription was cancelled.
    Canceled,

    /// The provider gave up collecting payment.
    Unpaid,

    /// Any provider status not covered above.
    Unknown,
}

impl SubscriptionStatus {
    /// Map a raw provider status string onto the local vocabulary.
    #[must_use]
    pub fn from_provider(status: &str) -> Self {
        match status {
            "active" => Self::Active,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "unpaid" => Self::Unpaid,
            _ => Self::Unknown,
        }
    }

    /// The snake_case wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this status is a terminal/negative transition that must strip
    /// group access.
    #[must_use]
    pub const fn revokes_access(self) -> bool {
        matches!(self, Self::Canceled | Self::Unpaid)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One member's subscription state.
///
/// There is at most one record per member; re-subscribing overwrites the
/// provider references in place. Records are never hard-deleted, so a
/// cancelled member keeps an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// The chat-platform member this record belongs to.
    pub member_id: MemberId,

    /// The provider's subscription identifier; `None` before first payment.
    pub subscription_ref: Option<String>,

    /// The provider's payer/customer identifier.
    pub payer_ref: Option<String>,

    /// Current billing status.
    pub status: SubscriptionStatus,

    /// End of the currently paid period (epoch seconds); 0 if never paid.
    ///
    /// Only meaningful while `status` is active or past_due. A cancelled
    /// record may retain a stale value, which must not be read as granting
    /// access.
    pub period_end: i64,

    /// First-write time (epoch seconds). Immutable after insert.
    pub created_at: i64,
}

impl SubscriptionRecord {
    /// Whether this record is past its paid period and still eligible for a
    /// revocation sweep. Cancelled records are excluded: their access was
    /// already stripped when the cancellation event arrived.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.period_end < now && self.status != SubscriptionStatus::Canceled
    }
}
