use std::net::SocketAddr;

use async_trait::async_trait;
use grammers_client::session::Session;
use grammers_client::{Client, Config, InitParams};

use crate::models::credentials::Credentials;
use crate::models::profile::Profile;
use crate::services::account::{AccountClient, AccountError, AccountSession};
use crate::telegram::string_session::StringSession;

/// Placeholder account id stored in a freshly decoded session. The real id
/// comes back from the platform with the profile.
const UNKNOWN_USER_ID: i64 = 0;

/// `AccountClient` backed by a Telegram MTProto user connection.
#[derive(Clone, Default)]
pub struct TelegramAccountClient {
    params: InitParams,
}

impl TelegramAccountClient {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builds an in-memory session pointing at the token's home data center,
/// together with that data center's address.
fn load_session(token: &str) -> Result<(Session, SocketAddr), AccountError> {
    let decoded =
        StringSession::parse(token).map_err(|e| AccountError::MalformedSession(e.to_string()))?;

    let session = Session::new();
    session.insert_dc(decoded.dc_id, decoded.addr, *decoded.auth_key);
    session.set_user(UNKNOWN_USER_ID, decoded.dc_id, false);

    Ok((session, decoded.addr))
}

fn transport<E: std::fmt::Display>(e: E) -> AccountError {
    AccountError::Transport(e.to_string())
}

#[async_trait]
impl AccountClient for TelegramAccountClient {
    async fn open(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn AccountSession>, AccountError> {
        let (session, server_addr) = load_session(credentials.session_token())?;

        let client = Client::connect(Config {
            session,
            api_id: credentials.api_id(),
            api_hash: credentials.api_hash().to_string(),
            params: InitParams {
                server_addr: Some(server_addr),
                ..self.params.clone()
            },
        })
        .await
        .map_err(transport)?;

        tracing::debug!("🔌 Connected to Telegram");
        Ok(Box::new(TelegramSession { client }))
    }
}

struct TelegramSession {
    client: Client,
}

#[async_trait]
impl AccountSession for TelegramSession {
    async fn is_authorized(&mut self) -> Result<bool, AccountError> {
        self.client.is_authorized().await.map_err(transport)
    }

    async fn get_me(&mut self) -> Result<Profile, AccountError> {
        let me = self.client.get_me().await.map_err(transport)?;

        Ok(Profile::new(
            me.id(),
            me.phone(),
            Some(me.first_name()),
            me.last_name(),
            me.username(),
        ))
    }

    async fn close(self: Box<Self>) -> Result<(), AccountError> {
        // The connection is torn down once the last client handle is dropped.
        drop(self.client);
        tracing::debug!("🔌 Telegram connection released");
        Ok(())
    }
}
