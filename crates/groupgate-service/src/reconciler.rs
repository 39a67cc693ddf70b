//! The billing-event state machine.
//!
//! Consumes provider lifecycle events, updates the subscription store, and
//! drives the access controller. Access changes hang off the negative
//! transitions only (payment failed, cancelled, unpaid); positive transitions
//! update bookkeeping, and a fresh invite is issued solely at checkout, since
//! a member who never left the group needs no re-invite.
//!
//! Every handler is safe to run twice on the same event: store writes are
//! idempotent upserts/sets, and a doubled invite or kick is tolerated.

use groupgate_core::{MemberId, SubscriptionStatus};
use groupgate_store::{Store, StoreError};

use crate::error::ApiError;
use crate::messages;
use crate::state::AppState;

/// Paid period assumed when the provider cannot be queried at checkout.
const DEFAULT_PERIOD_SECS: i64 = 30 * 24 * 60 * 60;

/// A recognized billing lifecycle event, decoupled from the provider's wire
/// envelope so the state machine depends on one stable shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    /// A member completed checkout for a new subscription.
    CheckoutCompleted {
        /// The member who paid.
        member_id: MemberId,
        /// Provider subscription identifier, when already assigned.
        subscription_ref: Option<String>,
        /// Provider payer identifier.
        payer_ref: Option<String>,
    },

    /// A renewal invoice was paid.
    InvoicePaymentSucceeded {
        /// Provider subscription identifier.
        subscription_ref: String,
    },

    /// A renewal invoice failed.
    InvoicePaymentFailed {
        /// Provider subscription identifier.
        subscription_ref: String,
    },

    /// The subscription was updated or deleted upstream.
    SubscriptionChanged {
        /// Provider subscription identifier.
        subscription_ref: String,
        /// The new provider status.
        status: SubscriptionStatus,
        /// New period end, when the event carried one.
        period_end: Option<i64>,
    },
}

impl BillingEvent {
    /// Map a webhook event type and its `data.object` payload onto a typed
    /// event. Returns `None` for unrecognized types and for recognized types
    /// missing their identifying field (logged, since dropped access
    /// information must be visible).
    #[must_use]
    pub fn from_webhook(event_type: &str, object: &serde_json::Value) -> Option<Self> {
        match event_type {
            "checkout.session.completed" => {
                let member_id = object
                    .get("client_reference_id")
                    .and_then(serde_json::Value::as_str)
                    .or_else(|| {
                        object
                            .get("metadata")
                            .and_then(|m| m.get("telegram_user_id"))
                            .and_then(serde_json::Value::as_str)
                    })
                    .and_then(|s| s.parse::<MemberId>().ok());

                let Some(member_id) = member_id else {
                    tracing::warn!("checkout event without a member reference, dropping");
                    return None;
                };

                Some(Self::CheckoutCompleted {
                    member_id,
                    subscription_ref: string_field(object, "subscription"),
                    payer_ref: string_field(object, "customer"),
                })
            }
            "invoice.payment_succeeded" => Some(Self::InvoicePaymentSucceeded {
                subscription_ref: string_field(object, "subscription")?,
            }),
            "invoice.payment_failed" => Some(Self::InvoicePaymentFailed {
                subscription_ref: string_field(object, "subscription")?,
            }),
            "customer.subscription.deleted" | "customer.subscription.updated" => {
                Some(Self::SubscriptionChanged {
                    subscription_ref: string_field(object, "id")?,
                    status: object
                        .get("status")
                        .and_then(serde_json::Value::as_str)
                        .map_or(SubscriptionStatus::Unknown, SubscriptionStatus::from_provider),
                    period_end: object
                        .get("current_period_end")
                        .and_then(serde_json::Value::as_i64),
                })
            }
            _ => None,
        }
    }
}

fn string_field(object: &serde_json::Value, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(serde_json::Value::as_str)
        .map(String::from)
}

/// Apply one billing event: update the store, then run access side effects
/// and member notifications.
///
/// Only store failures propagate (the provider's webhook retry is the
/// recovery path); provider-lookup failures degrade to documented defaults
/// and notification/access failures are logged in place.
pub async fn apply(state: &AppState, event: BillingEvent) -> Result<(), ApiError> {
    match event {
        BillingEvent::CheckoutCompleted {
            member_id,
            subscription_ref,
            payer_ref,
        } => handle_checkout_completed(state, member_id, subscription_ref, payer_ref).await,
        BillingEvent::InvoicePaymentSucceeded { subscription_ref } => {
            handle_invoice_paid(state, &subscription_ref).await
        }
        BillingEvent::InvoicePaymentFailed { subscription_ref } => {
            handle_invoice_failed(state, &subscription_ref).await
        }
        BillingEvent::SubscriptionChanged {
            subscription_ref,
            status,
            period_end,
        } => handle_subscription_changed(state, &subscription_ref, status, period_end).await,
    }
}

async fn handle_checkout_completed(
    state: &AppState,
    member_id: MemberId,
    subscription_ref: Option<String>,
    payer_ref: Option<String>,
) -> Result<(), ApiError> {
    // Resolve the authoritative status, falling back to a best-effort
    // default rather than dropping an access-affecting event.
    let (status, period_end) = match subscription_ref.as_deref() {
        Some(sub_ref) => match state.stripe.retrieve_subscription(sub_ref).await {
            Ok(sub) => (
                SubscriptionStatus::from_provider(&sub.status),
                sub.current_period_end,
            ),
            Err(e) => {
                tracing::warn!(
                    subscription_ref = sub_ref,
                    error = %e,
                    "subscription lookup failed, assuming active for a default period"
                );
                default_checkout_terms()
            }
        },
        None => default_checkout_terms(),
    };

    state.store.upsert_subscription(
        member_id,
        subscription_ref.as_deref(),
        payer_ref.as_deref(),
        status,
        period_end,
    )?;

    tracing::info!(
        member_id = %member_id,
        subscription_ref = ?subscription_ref,
        status = %status,
        period_end,
        "checkout reconciled"
    );

    notify(state, member_id, messages::PAYMENT_CONFIRMED).await;

    match state.access.grant(member_id).await {
        Ok(invite) => notify(state, member_id, &messages::invite_ready(&invite)).await,
        Err(e) => {
            tracing::warn!(member_id = %member_id, error = %e, "invite creation failed");
            notify(state, member_id, messages::INVITE_FAILED).await;
        }
    }

    Ok(())
}

fn default_checkout_terms() -> (SubscriptionStatus, i64) {
    (
        SubscriptionStatus::Active,
        chrono::Utc::now().timestamp() + DEFAULT_PERIOD_SECS,
    )
}

async fn handle_invoice_paid(state: &AppState, subscription_ref: &str) -> Result<(), ApiError> {
    match state.stripe.retrieve_subscription(subscription_ref).await {
        Ok(sub) => {
            set_status_if_known(
                state,
                subscription_ref,
                SubscriptionStatus::from_provider(&sub.status),
                Some(sub.current_period_end),
            )?;
        }
        Err(e) => {
            // Stale past_due is worse than an optimistic active; the next
            // event or sweeper pass corrects either way.
            tracing::warn!(
                subscription_ref,
                error = %e,
                "post-payment lookup failed, marking active without touching period end"
            );
            set_status_if_known(state, subscription_ref, SubscriptionStatus::Active, None)?;
        }
    }

    Ok(())
}

async fn handle_invoice_failed(state: &AppState, subscription_ref: &str) -> Result<(), ApiError> {
    let Some((member_id, _)) = state.store.find_by_subscription(subscription_ref)? else {
        tracing::debug!(subscription_ref, "payment failure for unknown subscription");
        return Ok(());
    };

    state
        .store
        .set_status(subscription_ref, SubscriptionStatus::PastDue, None)?;

    tracing::info!(
        member_id = %member_id,
        subscription_ref,
        "payment failed, pausing access"
    );

    state.access.revoke(member_id).await;
    notify(state, member_id, messages::ACCESS_PAUSED).await;

    Ok(())
}

async fn handle_subscription_changed(
    state: &AppState,
    subscription_ref: &str,
    status: SubscriptionStatus,
    period_end: Option<i64>,
) -> Result<(), ApiError> {
    let Some((member_id, _)) = state.store.find_by_subscription(subscription_ref)? else {
        tracing::debug!(subscription_ref, "lifecycle event for unknown subscription");
        return Ok(());
    };

    state.store.set_status(subscription_ref, status, period_end)?;

    if status.revokes_access() {
        tracing::info!(
            member_id = %member_id,
            subscription_ref,
            status = %status,
            "subscription ended, revoking access"
        );
        state.access.revoke(member_id).await;
        notify(state, member_id, messages::ACCESS_PAUSED).await;
    } else {
        tracing::info!(
            member_id = %member_id,
            subscription_ref,
            status = %status,
            "subscription state updated"
        );
    }

    Ok(())
}

/// Update by subscription ref, tolerating records that vanished between the
/// index lookup and the write (or were never created).
fn set_status_if_known(
    state: &AppState,
    subscription_ref: &str,
    status: SubscriptionStatus,
    period_end: Option<i64>,
) -> Result<(), ApiError> {
    match state.store.set_status(subscription_ref, status, period_end) {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => {
            tracing::debug!(subscription_ref, "status update for unknown subscription");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Best-effort direct message; delivery failures never affect reconciliation.
async fn notify(state: &AppState, member_id: MemberId, text: &str) {
    if let Err(e) = state
        .telegram
        .send_message(member_id.as_i64(), text, None)
        .await
    {
        tracing::warn!(member_id = %member_id, error = %e, "notification delivery failed");
    }
}
