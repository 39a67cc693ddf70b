//! Member-facing texts and button labels.
//!
//! Kept in one place so tone stays consistent and translations have a single
//! target.

/// First intro message, sent on /start with the main keyboard.
pub const INTRO_GREETING: &str = "Hey there! 👋\n\
    I share my *exclusive content* with subscribers here.\n\
    Want a free preview first?";

/// Second intro message.
pub const INTRO_DETAILS: &str = "Inside the VIP group you'll find full, \
    uncensored posts, daily extras and direct chat with me. \
    Want to see a few samples? 👀";

/// Sent before the free sample photos.
pub const SAMPLES_HEADER: &str = "Here are a few *free samples* 📸\nEnjoy:";

/// Sent after the free sample photos, with the subscribe keyboard.
pub const SAMPLES_FOOTER: &str = "Liked them? 😏\n\
    For *full access* and everything else, tap below:";

/// Acknowledges a confirmed payment before the invite arrives.
pub const PAYMENT_CONFIRMED: &str = "💖 *Payment confirmed!* Getting your VIP access ready…";

/// Sent when a renewal fails or the subscription ends.
pub const ACCESS_PAUSED: &str = "⚠️ Your payment didn't go through or the \
    subscription was cancelled.\nYour access is paused. Once it's sorted out, \
    I'll let you right back in. 💬";

/// Sent when payment succeeded but invite creation failed.
pub const INVITE_FAILED: &str = "Payment received, but I couldn't generate \
    your invite just now. Message me and I'll fix it right away. 💬";

/// Sent when checkout-session creation failed for a button press.
pub const CHECKOUT_ERROR: &str = "⚠️ Sorry, something went wrong setting up \
    your payment.\nPlease try again later or contact support.";

/// Reply to anything the bot does not understand.
pub const FALLBACK: &str = "I didn't get that 😅\n\
    Tap *🆓 Free samples* or *💳 Subscribe now*.";

/// Label for the free-samples button.
pub const BTN_SHOW_SAMPLES: &str = "🆓 Free samples";

/// Label for the subscribe button.
pub const BTN_SUBSCRIBE: &str = "💳 Subscribe now";

/// Label for the subscribe button shown after the samples.
pub const BTN_SUBSCRIBE_CONFIRM: &str = "✅ I want to subscribe";

/// Label for the show-again button.
pub const BTN_SHOW_AGAIN: &str = "🔁 Show again";

/// Callback payload for the free-samples button.
pub const CB_SHOW_SAMPLES: &str = "show_samples";

/// Callback payload surfaced when checkout-session creation failed.
pub const CB_CHECKOUT_ERROR: &str = "checkout_error";

/// The message carrying the single-use invite link.
#[must_use]
pub fn invite_ready(invite: &str) -> String {
    format!(
        "✨ All set! Join with this *personal link* (24h, single use):\n\n{invite}\n\nSee you inside… 💋"
    )
}
