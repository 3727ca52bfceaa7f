use std::sync::Arc;

use crate::config::Config;
use crate::services::account::AccountClient;

/// The application's state.
///
/// Holds no per-request data: every lookup opens and closes its own
/// account session.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The client used to open account sessions.
    pub accounts: Arc<dyn AccountClient>,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    /// * `accounts` - The account client implementation.
    pub fn new(config: Config, accounts: Arc<dyn AccountClient>) -> Self {
        Self { config, accounts }
    }
}
