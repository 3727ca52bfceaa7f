use std::fmt;

use zeroize::Zeroizing;

/// Validated lookup credentials.
///
/// The session token and API hash are wiped from memory on drop and never
/// appear in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    session_token: Zeroizing<String>,
    api_id: i32,
    api_hash: Zeroizing<String>,
}

impl Credentials {
    pub fn new(session_token: String, api_id: i32, api_hash: String) -> Self {
        Self {
            session_token: Zeroizing::new(session_token),
            api_id,
            api_hash: Zeroizing::new(api_hash),
        }
    }

    /// The serialized session token.
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// The developer application id.
    pub fn api_id(&self) -> i32 {
        self.api_id
    }

    /// The developer application secret.
    pub fn api_hash(&self) -> &str {
        &self.api_hash
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_token", &"<redacted>")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .finish()
    }
}
