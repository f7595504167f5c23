//! LG WebOS "SSAP" protocol over WebSocket (port 3000).
//!
//! A session starts with a `register` request.  If the TV does not know the
//! remote it shows a pairing prompt; once accepted it answers with
//! `{"type":"registered","payload":{"client-key":"..."}}`.  The client key is
//! sent back on later registrations to skip the prompt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProtocolError;

/// SSAP WebSocket port.
pub const PORT: u16 = 3000;
/// Name shown in the TV's pairing prompt.
pub const DEFAULT_APP_NAME: &str = "Smart Remote";
pub const APP_ID: &str = "com.smartremote.app";
pub const VENDOR_ID: &str = "com.smartremote";

/// Permissions requested in the signed manifest.
pub const PERMISSIONS: &[&str] = &[
    "LAUNCH",
    "LAUNCH_WEBAPP",
    "APP_TO_APP",
    "CONTROL_INPUT_MEDIA_PLAYBACK",
    "CONTROL_POWER",
    "CONTROL_AUDIO",
    "CONTROL_TV_SCREEN",
];

const SEND_KEY_URI: &str = "ssap://com.webos.service.ime/sendEnterKey";
const LAUNCH_URI: &str = "ssap://system.launcher/open";

#[derive(Serialize)]
struct Register<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'static str,
    payload: RegisterPayload<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload<'a> {
    force_pairing: bool,
    pairing_type: &'static str,
    #[serde(rename = "client-key", skip_serializing_if = "Option::is_none")]
    client_key: Option<&'a str>,
    manifest: Manifest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    manifest_version: u32,
    app_version: &'static str,
    signed: Signed<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Signed<'a> {
    created: &'static str,
    app_id: &'static str,
    vendor_id: &'static str,
    localized_app_names: BTreeMap<&'static str, &'a str>,
    permissions: &'static [&'static str],
}

#[derive(Serialize)]
struct Request<'a, P: Serialize> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    uri: &'static str,
    payload: P,
}

/// Builds the `register` message sent right after the socket opens.
pub fn register_request(app_name: &str, client_key: Option<&str>) -> String {
    let msg = Register {
        kind: "register",
        id: "register_0",
        payload: RegisterPayload {
            force_pairing: false,
            pairing_type: "PROMPT",
            client_key: client_key.filter(|k| !k.is_empty()),
            manifest: Manifest {
                manifest_version: 1,
                app_version: "1.0.0",
                signed: Signed {
                    created: "20200101",
                    app_id: APP_ID,
                    vendor_id: VENDOR_ID,
                    localized_app_names: BTreeMap::from([("", app_name)]),
                    permissions: PERMISSIONS,
                },
            },
        },
    };
    serde_json::to_string(&msg).unwrap_or_default()
}

/// Builds a key press request; `id` is e.g. `"key_3"`.
pub fn key_request(id: &str, key: &str) -> String {
    #[derive(Serialize)]
    struct KeyPayload<'a> {
        key: &'a str,
    }
    request(id, SEND_KEY_URI, KeyPayload { key })
}

/// Builds an app launch request; `id` is e.g. `"command_4"`.
pub fn launch_request(id: &str, app_id: &str) -> String {
    #[derive(Serialize)]
    struct LaunchPayload<'a> {
        id: &'a str,
    }
    request(id, LAUNCH_URI, LaunchPayload { id: app_id })
}

fn request<P: Serialize>(id: &str, uri: &'static str, payload: P) -> String {
    serde_json::to_string(&Request {
        kind: "request",
        id,
        uri,
        payload,
    })
    .unwrap_or_default()
}

/// A message received from the TV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebOsMessage {
    /// Registration accepted.  `client_key` is absent on some firmware when
    /// the supplied key was reused.
    Registered { client_key: Option<String> },
    /// The TV rejected a request (including registration).
    Error { id: Option<String>, reason: String },
    /// A normal reply, or a `response` to `register` meaning "prompt shown".
    Response { id: Option<String> },
    /// Unrecognised `type`.
    Other(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<String>,
    error: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Parses a text frame received from the TV.
///
/// # Errors
///
/// [`ProtocolError::MalformedJson`] for invalid JSON and
/// [`ProtocolError::MissingField`] when `type` is absent.
pub fn parse_message(text: &str) -> Result<WebOsMessage, ProtocolError> {
    let env: Envelope = serde_json::from_str(text)?;
    let kind = env.kind.ok_or(ProtocolError::MissingField("type"))?;
    Ok(match kind.as_str() {
        "registered" => WebOsMessage::Registered {
            client_key: env
                .payload
                .get("client-key")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        "error" => WebOsMessage::Error {
            id: env.id,
            reason: env.error.unwrap_or_else(|| "unknown error".to_string()),
        },
        "response" => WebOsMessage::Response { id: env.id },
        _ => WebOsMessage::Other(kind),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
