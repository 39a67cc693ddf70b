//! Core types for the groupgate access service.
//!
//! This crate provides the foundational types shared by the storage and
//! service layers:
//!
//! - **Identifiers**: [`MemberId`]
//! - **Subscriptions**: [`SubscriptionRecord`], [`SubscriptionStatus`]
//!
//! All timestamps are Unix epoch seconds, matching what the payment provider
//! delivers on the wire.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;
pub mod subscription;

pub use ids::{IdError, MemberId};
pub use subscription::{SubscriptionRecord, SubscriptionStatus};
