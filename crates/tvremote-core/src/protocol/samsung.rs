//! Samsung Tizen remote-control channel.
//!
//! The TV exposes a WebSocket at
//! `/api/v2/channels/samsung.remote.control` on port 8001 (plain) or 8002
//! (TLS, self-signed certificate).  The first connection from an unknown
//! remote pops up an "Allow?" dialog on the TV; once accepted the TV sends an
//! `ms.channel.connect` event carrying a token that lets later connections
//! skip the dialog.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::encoding::base64_encode;
use super::ProtocolError;

/// TLS port; also the default.
pub const SECURE_PORT: u16 = 8002;
/// Plain-text port, also used by the network prober to fingerprint TVs.
pub const PLAIN_PORT: u16 = 8001;
/// Name shown in the TV's "allow this remote?" prompt.
pub const DEFAULT_APP_NAME: &str = "SmartRemote";

const CHANNEL_PATH: &str = "/api/v2/channels/samsung.remote.control";

/// Scheme and port actually used for a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEndpoint {
    /// `true` for `wss://`.
    pub tls: bool,
    pub port: u16,
}

impl ChannelEndpoint {
    /// Decides scheme and port.
    ///
    /// A secure embedding context can only open secure sockets, so it always
    /// gets `wss` on [`SECURE_PORT`] whatever port was requested.  Otherwise
    /// TLS is used exactly when the requested port is [`SECURE_PORT`].
    pub fn resolve(requested_port: u16, secure_context: bool) -> Self {
        if secure_context {
            return Self {
                tls: true,
                port: SECURE_PORT,
            };
        }
        Self {
            tls: requested_port == SECURE_PORT,
            port: requested_port,
        }
    }

    fn scheme(self) -> &'static str {
        if self.tls {
            "wss"
        } else {
            "ws"
        }
    }
}

/// Builds the channel URL for `ip`.
///
/// The app name is base64-encoded into `name`; `token` is appended only
/// when one is known.
pub fn channel_url(
    ip: Ipv4Addr,
    endpoint: ChannelEndpoint,
    app_name: &str,
    token: Option<&str>,
) -> String {
    let mut url = format!(
        "{}://{ip}:{}{CHANNEL_PATH}?name={}",
        endpoint.scheme(),
        endpoint.port,
        base64_encode(app_name.as_bytes())
    );
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        url.push_str("&token=");
        url.push_str(token);
    }
    url
}

#[derive(Serialize)]
struct RemoteControl<'a> {
    method: &'static str,
    params: RemoteParams<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteParams<'a> {
    cmd: &'static str,
    data_of_cmd: &'a str,
    option: &'static str,
    type_of_remote: &'static str,
}

/// Builds the `ms.remote.control` click message for a native key code.
pub fn key_press(key: &str) -> String {
    let msg = RemoteControl {
        method: "ms.remote.control",
        params: RemoteParams {
            cmd: "Click",
            data_of_cmd: key,
            option: "false",
            type_of_remote: "SendRemoteKey",
        },
    };
    // Serializing a struct of plain strings cannot fail.
    serde_json::to_string(&msg).unwrap_or_default()
}

/// An event pushed by the TV on the remote-control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// `ms.channel.connect`; `token` is present after the user accepted the
    /// pairing prompt.
    Connected { token: Option<String> },
    /// `ms.channel.unauthorized`; the user declined or the token is stale.
    Unauthorized,
    /// Any other event name.
    Other(String),
}

#[derive(Deserialize)]
struct RawEvent {
    event: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Parses a text frame received from the TV.
///
/// # Errors
///
/// [`ProtocolError::MalformedJson`] if the frame is not a JSON object and
/// [`ProtocolError::MissingField`] if it has no `event` name.
pub fn parse_event(text: &str) -> Result<ChannelEvent, ProtocolError> {
    let raw: RawEvent = serde_json::from_str(text)?;
    let event = raw.event.ok_or(ProtocolError::MissingField("event"))?;
    Ok(match event.as_str() {
        "ms.channel.connect" => ChannelEvent::Connected {
            token: raw
                .data
                .get("token")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        },
        "ms.channel.unauthorized" => ChannelEvent::Unauthorized,
        _ => ChannelEvent::Other(event),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
