//! Samsung Tizen client over the `samsung.remote.control` WebSocket channel.
//!
//! The channel counts as connected as soon as the socket opens; the TV sends
//! no application-level acknowledgement.  If the user accepts the pairing
//! prompt the TV pushes `ms.channel.connect` with a token, which is stored so
//! the next connection skips the prompt.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use tvremote_core::protocol::samsung::{self, ChannelEndpoint, ChannelEvent};
use tvremote_core::{Brand, KeyMapper};

use super::session::{dial, WsSession};
use crate::application::ports::SettingsStore;
use crate::application::remote_client::{ControlError, RemoteClient, SendOutcome};
use crate::infrastructure::storage::config::SamsungConfig;

pub struct SamsungClient {
    ip: Ipv4Addr,
    config: SamsungConfig,
    token: Arc<Mutex<Option<String>>>,
    store: Arc<dyn SettingsStore>,
    session: Option<WsSession>,
}

impl SamsungClient {
    pub fn new(
        ip: Ipv4Addr,
        config: SamsungConfig,
        token: Option<String>,
        store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            ip,
            config,
            token: Arc::new(Mutex::new(token)),
            store,
            session: None,
        }
    }

    /// The pairing token currently in use, if any.
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn endpoint(&self) -> ChannelEndpoint {
        ChannelEndpoint::resolve(self.config.port, self.config.secure_context)
    }

    /// The URL the next `connect()` will open.
    pub fn channel_url(&self) -> String {
        samsung::channel_url(
            self.ip,
            self.endpoint(),
            &self.config.app_name,
            self.token().as_deref(),
        )
    }

    /// Reader-task callback for frames pushed by the TV.
    fn event_handler(&self) -> impl FnMut(&str) + Send + 'static {
        let ip = self.ip;
        let token = Arc::clone(&self.token);
        let store = Arc::clone(&self.store);
        move |text: &str| match samsung::parse_event(text) {
            Ok(ChannelEvent::Connected { token: Some(issued) }) => {
                info!("Samsung TV {ip} issued a pairing token");
                if let Err(e) = store.save_token(ip, &issued) {
                    warn!("could not persist Samsung token for {ip}: {e}");
                }
                *token.lock().unwrap_or_else(PoisonError::into_inner) = Some(issued);
            }
            Ok(ChannelEvent::Connected { token: None }) => debug!("Samsung TV {ip}: channel ready"),
            Ok(ChannelEvent::Unauthorized) => {
                warn!("Samsung TV {ip} refused the remote; accept the prompt on the TV")
            }
            Ok(ChannelEvent::Other(event)) => debug!("Samsung TV {ip}: event {event}"),
            Err(e) => debug!("Samsung TV {ip}: ignoring frame: {e}"),
        }
    }
}

#[async_trait]
impl RemoteClient for SamsungClient {
    fn brand(&self) -> Brand {
        Brand::Samsung
    }

    async fn connect(&mut self) -> Result<bool, ControlError> {
        if let Some(old) = self.session.take() {
            old.close();
        }
        let endpoint = self.endpoint();
        let url = self.channel_url();
        let timeout = self.config.connect_timeout();
        info!("connecting to Samsung TV at {}:{}", self.ip, endpoint.port);

        let stream = match tokio::time::timeout(timeout, dial(&url)).await {
            Err(_elapsed) => {
                warn!("Samsung TV {} did not answer within {timeout:?}", self.ip);
                return Err(ControlError::Timeout {
                    brand: Brand::Samsung,
                    after: timeout,
                });
            }
            Ok(Err(reason)) => {
                warn!("Samsung connection to {} failed: {reason}", self.ip);
                return Err(ControlError::Transport {
                    brand: Brand::Samsung,
                    address: format!("{}:{}", self.ip, endpoint.port),
                    reason,
                });
            }
            Ok(Ok(stream)) => stream,
        };

        let label = format!("samsung {}", self.ip);
        self.session = Some(WsSession::spawn(stream, label, self.event_handler()));
        info!("Samsung TV {} connected", self.ip);
        Ok(true)
    }

    fn send_key(&self, command: &str) -> SendOutcome {
        let Some(session) = self.session.as_ref().filter(|s| s.is_open()) else {
            warn!("Samsung: not connected, dropping {command:?}");
            return SendOutcome::NotConnected;
        };
        let Some(key) = KeyMapper::resolve(Brand::Samsung, command) else {
            warn!("Samsung: no key for command {command:?}");
            return SendOutcome::Unmapped;
        };
        if session.send(samsung::key_press(&key)) {
            debug!("Samsung: sent {key}");
            SendOutcome::Sent
        } else {
            SendOutcome::NotConnected
        }
    }

    fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
            info!("Samsung TV {} disconnected", self.ip);
        }
    }

    fn connection_status(&self) -> bool {
        self.session.as_ref().is_some_and(WsSession::is_open)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
