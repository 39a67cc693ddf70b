//! Application state.

use std::sync::Arc;

use groupgate_store::RocksStore;

use crate::access::AccessController;
use crate::config::ServiceConfig;
use crate::stripe::StripeClient;
use crate::telegram::TelegramClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Chat-platform client.
    pub telegram: Arc<TelegramClient>,

    /// Payment-provider client.
    pub stripe: Arc<StripeClient>,

    /// Group-membership side effects (invites and kicks).
    pub access: AccessController,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Both external clients are built from the configuration; unlike the
    /// storage path they hold no resources beyond an HTTP connection pool.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let telegram = Arc::new(TelegramClient::new(
            &config.telegram_token,
            &config.telegram_api_base,
        ));
        let stripe = Arc::new(StripeClient::new(
            &config.stripe_secret_key,
            &config.stripe_webhook_secret,
            &config.stripe_api_base,
        ));
        let access = AccessController::new(Arc::clone(&telegram), config.group_chat_id);

        Self {
            store,
            config,
            telegram,
            stripe,
            access,
        }
    }
}
