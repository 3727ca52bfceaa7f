//! Decoder for serialized "string sessions".
//!
//! Layout after the leading version character `1`, URL-safe base64:
//! `dc_id: u8 | ip: 4 or 16 bytes | port: u16 (big endian) | auth_key: 256 bytes`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use thiserror::Error;
use zeroize::Zeroizing;

/// The only supported serialization version.
pub const CURRENT_VERSION: char = '1';
/// Data centers a session may point at.
pub const DC_IDS: std::ops::RangeInclusive<u8> = 1..=5;
/// The size of an MTProto authorization key.
pub const AUTH_KEY_LEN: usize = 256;

const IPV4_PAYLOAD_LEN: usize = 1 + 4 + 2 + AUTH_KEY_LEN;
const IPV6_PAYLOAD_LEN: usize = 1 + 16 + 2 + AUTH_KEY_LEN;

const URL_SAFE_ANY_PADDING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StringSessionError {
    #[error("session string is empty")]
    Empty,

    #[error("unsupported session string version '{0}'")]
    UnsupportedVersion(char),

    #[error("session string is not valid base64")]
    Encoding,

    #[error("unexpected decoded length {0}")]
    Length(usize),

    #[error("unknown data center {0}")]
    DataCenter(u8),
}

/// A decoded string session: the home data center and its authorization key.
pub struct StringSession {
    pub dc_id: i32,
    pub addr: SocketAddr,
    pub auth_key: Zeroizing<[u8; AUTH_KEY_LEN]>,
}

impl std::fmt::Debug for StringSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringSession")
            .field("dc_id", &self.dc_id)
            .field("addr", &self.addr)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

impl StringSession {
    /// Decodes a session string. Surrounding whitespace is ignored.
    pub fn parse(token: &str) -> Result<Self, StringSessionError> {
        let token = token.trim();
        let mut chars = token.chars();
        let version = chars.next().ok_or(StringSessionError::Empty)?;
        if version != CURRENT_VERSION {
            return Err(StringSessionError::UnsupportedVersion(version));
        }

        let payload = Zeroizing::new(
            URL_SAFE_ANY_PADDING
                .decode(chars.as_str())
                .map_err(|_| StringSessionError::Encoding)?,
        );

        let ip_len = match payload.len() {
            IPV4_PAYLOAD_LEN => 4,
            IPV6_PAYLOAD_LEN => 16,
            other => return Err(StringSessionError::Length(other)),
        };

        if !DC_IDS.contains(&payload[0]) {
            return Err(StringSessionError::DataCenter(payload[0]));
        }
        let dc_id = i32::from(payload[0]);
        let ip_bytes = &payload[1..1 + ip_len];
        let ip = if ip_len == 4 {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(ip_bytes);
            IpAddr::V4(Ipv4Addr::from(octets))
        } else {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(ip_bytes);
            IpAddr::V6(Ipv6Addr::from(octets))
        };

        let port_at = 1 + ip_len;
        let port = u16::from_be_bytes([payload[port_at], payload[port_at + 1]]);

        let mut auth_key = Zeroizing::new([0u8; AUTH_KEY_LEN]);
        auth_key.copy_from_slice(&payload[port_at + 2..]);

        Ok(Self {
            dc_id,
            addr: SocketAddr::new(ip, port),
            auth_key,
        })
    }
}
