use async_trait::async_trait;
use thiserror::Error;

use crate::error::{AppError, Result};
use crate::models::credentials::Credentials;
use crate::models::profile::Profile;

/// Errors raised by account client adapters.
#[derive(Error, Debug)]
pub enum AccountError {
    /// The session token could not be decoded.
    #[error("invalid session string: {0}")]
    MalformedSession(String),

    /// Any failure talking to the platform.
    #[error("{0}")]
    Transport(String),
}

/// Opens account sessions against the messaging platform.
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// Connects using a serialized session token and the developer credentials.
    async fn open(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<Box<dyn AccountSession>, AccountError>;
}

/// One open connection to the platform, bound to a single account.
#[async_trait]
pub trait AccountSession: Send {
    /// Whether the session still represents a logged-in account.
    async fn is_authorized(&mut self) -> std::result::Result<bool, AccountError>;

    /// Fetches the logged-in account's own profile.
    async fn get_me(&mut self) -> std::result::Result<Profile, AccountError>;

    /// Closes the connection. Consumes the session so it can only be closed once.
    async fn close(self: Box<Self>) -> std::result::Result<(), AccountError>;
}

async fn authorize_and_fetch(session: &mut dyn AccountSession) -> Result<Profile> {
    if !session.is_authorized().await? {
        tracing::warn!("🔒 Session is not authorized");
        return Err(AppError::SessionUnauthorized);
    }

    let profile = session.get_me().await?;
    tracing::info!("✅ Profile fetched for account: {}", profile.id);

    Ok(profile)
}

/// Opens a session, checks authorization, fetches the own profile and closes
/// the session again.
///
/// Once `open` succeeds the session is closed exactly once on every path. A
/// failing close is logged and never replaces the outcome of the lookup.
///
/// # Arguments
///
/// * `client` - The account client used to open the session.
/// * `credentials` - The validated request credentials.
///
/// # Returns
///
/// A `Result` containing the account's `Profile`.
pub async fn fetch_own_profile(
    client: &dyn AccountClient,
    credentials: &Credentials,
) -> Result<Profile> {
    tracing::debug!("🔌 Opening account session (api_id: {})", credentials.api_id());
    let mut session = client.open(credentials).await?;

    let outcome = authorize_and_fetch(session.as_mut()).await;

    match session.close().await {
        Ok(()) => tracing::debug!("🔌 Account session closed"),
        Err(e) => tracing::warn!("⚠️ Failed to close account session: {}", e),
    }

    outcome
}


#[cfg(test)]
mod tests {
    use super::fake::{Calls, Script, ScriptedClient};
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("1token".to_string(), 1, "hash".to_string())
    }

    fn profile() -> Profile {
        Profile::new(
            777,
            Some("15551234567"),
            Some("Ada"),
            Some("Lovelace"),
            Some("ada"),
        )
    }

    #[tokio::test]
    async fn returns_profile_and_closes_once() {
        let client = ScriptedClient::new(Script::Profile(profile()));

        let fetched = fetch_own_profile(&client, &credentials()).await.unwrap();

        assert_eq!(fetched, profile());
        assert_eq!(Calls::get(&client.calls.opened), 1);
        assert_eq!(Calls::get(&client.calls.fetched), 1);
        assert_eq!(Calls::get(&client.calls.closed), 1);
    }

    #[tokio::test]
    async fn unauthorized_session_is_closed_without_fetching() {
        let client = ScriptedClient::new(Script::Unauthorized);

        let err = fetch_own_profile(&client, &credentials()).await.unwrap_err();

        assert!(matches!(err, AppError::SessionUnauthorized));
        assert_eq!(Calls::get(&client.calls.fetched), 0);
        assert_eq!(Calls::get(&client.calls.closed), 1);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_error_and_closes_once() {
        let client = ScriptedClient::new(Script::FetchFails("FLOOD_WAIT_30".to_string()));

        let err = fetch_own_profile(&client, &credentials()).await.unwrap_err();

        assert!(err.to_string().contains("FLOOD_WAIT_30"));
        assert_eq!(Calls::get(&client.calls.closed), 1);
    }

    #[tokio::test]
    async fn authorization_check_failure_closes_once() {
        let client = ScriptedClient::new(Script::AuthorizeFails("timed out".to_string()));

        let err = fetch_own_profile(&client, &credentials()).await.unwrap_err();

        assert!(matches!(err, AppError::Account(AccountError::Transport(_))));
        assert_eq!(Calls::get(&client.calls.fetched), 0);
        assert_eq!(Calls::get(&client.calls.closed), 1);
    }

    #[tokio::test]
    async fn failed_open_has_nothing_to_close() {
        let client = ScriptedClient::new(Script::FailOpen("dns failure".to_string()));

        let err = fetch_own_profile(&client, &credentials()).await.unwrap_err();

        assert!(err.to_string().contains("dns failure"));
        assert_eq!(Calls::get(&client.calls.authorized), 0);
        assert_eq!(Calls::get(&client.calls.closed), 0);
    }

    #[tokio::test]
    async fn close_failure_does_not_replace_the_outcome() {
        let mut client = ScriptedClient::new(Script::FetchFails("original".to_string()));
        client.fail_close = true;

        let err = fetch_own_profile(&client, &credentials()).await.unwrap_err();
        assert!(err.to_string().contains("original"));

        let mut client = ScriptedClient::new(Script::Profile(profile()));
        client.fail_close = true;

        let fetched = fetch_own_profile(&client, &credentials()).await.unwrap();
        assert_eq!(fetched.id, 777);
        assert_eq!(Calls::get(&client.calls.closed), 1);
    }
}
