//! LG webOS client over the SSAP WebSocket on port 3000.
//!
//! Unlike Samsung, an open socket is not enough: the client must send a
//! `register` request and wait for `registered`.  On first contact the TV
//! shows a pairing prompt (answered with a plain `response`) and only sends
//! `registered` once the user accepts.  The `client-key` it issues is stored
//! and presented on later connections to skip the prompt.

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use tvremote_core::protocol::webos::{self, WebOsMessage};
use tvremote_core::protocol::RequestCounter;
use tvremote_core::{Brand, KeyMapper};

use super::session::{dial, WsSession, WsStream};
use crate::application::ports::SettingsStore;
use crate::application::remote_client::{ControlError, RemoteClient, SendOutcome};
use crate::infrastructure::storage::config::LgConfig;

pub struct LgClient {
    ip: Ipv4Addr,
    config: LgConfig,
    client_key: Option<String>,
    store: Arc<dyn SettingsStore>,
    requests: RequestCounter,
    session: Option<WsSession>,
}

impl LgClient {
    pub fn new(
        ip: Ipv4Addr,
        config: LgConfig,
        client_key: Option<String>,
        store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            ip,
            config,
            client_key,
            store,
            requests: RequestCounter::new(),
            session: None,
        }
    }

    pub fn client_key(&self) -> Option<&str> {
        self.client_key.as_deref()
    }

    fn transport_error(&self, reason: impl Into<String>) -> ControlError {
        ControlError::Transport {
            brand: Brand::Lg,
            address: format!("{}:{}", self.ip, self.config.port),
            reason: reason.into(),
        }
    }

    /// Opens the socket and runs the registration exchange.
    ///
    /// Returns the stream and the client key the TV issued, if any.
    async fn register(&self) -> Result<(WsStream, Option<String>), ControlError> {
        let url = format!("ws://{}:{}", self.ip, self.config.port);
        let mut stream = dial(&url).await.map_err(|e| self.transport_error(e))?;

        let request = webos::register_request(&self.config.app_name, self.client_key.as_deref());
        stream
            .send(Message::Text(request))
            .await
            .map_err(|e| self.transport_error(e.to_string()))?;
        debug!("LG TV {}: register sent", self.ip);

        while let Some(frame) = stream.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => return Err(self.transport_error(e.to_string())),
            };
            match webos::parse_message(&text) {
                Ok(WebOsMessage::Registered { client_key }) => return Ok((stream, client_key)),
                Ok(WebOsMessage::Error { reason, .. }) => {
                    return Err(ControlError::PairingRejected {
                        brand: Brand::Lg,
                        reason,
                    })
                }
                Ok(WebOsMessage::Response { .. }) => {
                    info!("LG TV {}: pairing prompt shown, waiting for the user", self.ip)
                }
                Ok(WebOsMessage::Other(kind)) => debug!("LG TV {}: ignoring {kind}", self.ip),
                Err(e) => debug!("LG TV {}: ignoring frame: {e}", self.ip),
            }
        }
        Err(self.transport_error("socket closed during registration"))
    }

    fn remember_key(&mut self, issued: Option<String>) {
        let Some(key) = issued.filter(|k| !k.is_empty()) else {
            return;
        };
        if self.client_key.as_deref() == Some(key.as_str()) {
            return;
        }
        if let Err(e) = self.store.save_token(self.ip, &key) {
            warn!("could not persist LG client key for {}: {e}", self.ip);
        }
        self.client_key = Some(key);
    }

    fn open_session(&self) -> Option<&WsSession> {
        self.session.as_ref().filter(|s| s.is_open())
    }
}

#[async_trait]
impl RemoteClient for LgClient {
    fn brand(&self) -> Brand {
        Brand::Lg
    }

    async fn connect(&mut self) -> Result<bool, ControlError> {
        if let Some(old) = self.session.take() {
            old.close();
        }
        let timeout = self.config.connect_timeout();
        info!("connecting to LG TV at {}:{}", self.ip, self.config.port);

        let (stream, issued) = match tokio::time::timeout(timeout, self.register()).await {
            Ok(Ok(registered)) => registered,
            Ok(Err(e)) => {
                warn!("LG TV {}: {e}", self.ip);
                return Err(e);
            }
            Err(_elapsed) => {
                warn!("LG TV {} did not register within {timeout:?}", self.ip);
                return Err(ControlError::Timeout {
                    brand: Brand::Lg,
                    after: timeout,
                });
            }
        };
        self.remember_key(issued);

        let ip = self.ip;
        let on_text = move |text: &str| match webos::parse_message(text) {
            Ok(WebOsMessage::Error { id, reason }) => warn!("LG TV {ip}: request {id:?} failed: {reason}"),
            Ok(msg) => debug!("LG TV {ip}: {msg:?}"),
            Err(e) => debug!("LG TV {ip}: ignoring frame: {e}"),
        };
        self.session = Some(WsSession::spawn(stream, format!("lg {ip}"), on_text));
        info!("LG TV {ip} registered");
        Ok(true)
    }

    fn send_key(&self, command: &str) -> SendOutcome {
        let Some(session) = self.open_session() else {
            warn!("LG: not connected, dropping {command:?}");
            return SendOutcome::NotConnected;
        };
        let Some(key) = KeyMapper::resolve(Brand::Lg, command) else {
            warn!("LG: no key for command {command:?}");
            return SendOutcome::Unmapped;
        };
        let id = self.requests.next_id("key");
        if session.send(webos::key_request(&id, &key)) {
            debug!("LG: sent {key} as {id}");
            SendOutcome::Sent
        } else {
            SendOutcome::NotConnected
        }
    }

    fn launch_app(&self, app_id: &str) -> SendOutcome {
        let Some(session) = self.open_session() else {
            warn!("LG: not connected, cannot launch {app_id}");
            return SendOutcome::NotConnected;
        };
        let id = self.requests.next_id("command");
        if session.send(webos::launch_request(&id, app_id)) {
            info!("LG: launching {app_id}");
            SendOutcome::Sent
        } else {
            SendOutcome::NotConnected
        }
    }

    fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
            info!("LG TV {} disconnected", self.ip);
        }
    }

    fn connection_status(&self) -> bool {
        self.open_session().is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
