//! Group-membership side effects.
//!
//! Translates subscription-state transitions into platform actions: granting
//! a single-use invite into the access group, and revoking membership with
//! the ban-then-unban idiom (kick once without a permanent ban).
//!
//! Both operations run after the corresponding store write has committed and
//! are fire-and-forget toward the remote API: failures are logged, never
//! retried synchronously, and never unwind into the caller.

use std::sync::Arc;
use std::time::Duration;

use groupgate_core::MemberId;

use crate::telegram::{TelegramClient, TelegramError};

/// Invite links stay valid for this long.
pub const INVITE_TTL_SECS: i64 = 24 * 60 * 60;

/// Pause between the ban and unban halves of a kick. Not a correctness
/// requirement; it just gives the platform time to apply the ban.
const KICK_PAUSE: Duration = Duration::from_millis(500);

/// Issues group invites and revocations.
#[derive(Clone)]
pub struct AccessController {
    telegram: Arc<TelegramClient>,
    group_chat_id: i64,
}

impl AccessController {
    /// Create a controller scoped to the configured access group.
    #[must_use]
    pub fn new(telegram: Arc<TelegramClient>, group_chat_id: i64) -> Self {
        Self {
            telegram,
            group_chat_id,
        }
    }

    /// Request a single-use, time-bounded invite link for a member.
    ///
    /// The error is handed back so the caller can choose its fallback
    /// messaging; nothing is retried here.
    pub async fn grant(&self, member_id: MemberId) -> Result<String, TelegramError> {
        let expire_date = chrono::Utc::now().timestamp() + INVITE_TTL_SECS;
        let link = self
            .telegram
            .create_invite_link(self.group_chat_id, expire_date, 1)
            .await?;

        tracing::info!(member_id = %member_id, "issued single-use group invite");
        Ok(link.invite_link)
    }

    /// Remove a member from the access group.
    ///
    /// Ban followed by unban kicks the member while leaving them able to
    /// rejoin through a future invite. The unban is attempted even when the
    /// ban call failed; each failure is logged and swallowed.
    pub async fn revoke(&self, member_id: MemberId) {
        if let Err(e) = self
            .telegram
            .ban_member(self.group_chat_id, member_id.as_i64())
            .await
        {
            tracing::warn!(member_id = %member_id, error = %e, "ban call failed");
        }

        tokio::time::sleep(KICK_PAUSE).await;

        if let Err(e) = self
            .telegram
            .unban_member(self.group_chat_id, member_id.as_i64())
            .await
        {
            tracing::warn!(member_id = %member_id, error = %e, "unban call failed");
        } else {
            tracing::info!(member_id = %member_id, "member removed from access group");
        }
    }
}
