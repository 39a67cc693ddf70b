//! Payment-provider (Stripe) integration.

pub mod client;
pub mod types;

pub use client::{StripeClient, StripeError};
pub use types::{CheckoutSession, SubscriptionInfo};
