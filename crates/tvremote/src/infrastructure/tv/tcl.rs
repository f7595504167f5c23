//! TCL Roku client over the External Control Protocol.
//!
//! ECP has no session: "connecting" is a reachability check against
//! `/query/device-info`, and each key press is an independent
//! `POST /keypress/<Key>`.  Presses are spawned onto the runtime that ran
//! `connect()`, so `send_key` returns immediately and failures only show up
//! in the log.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use tvremote_core::protocol::roku;
use tvremote_core::{Brand, KeyMapper};

use crate::application::remote_client::{ControlError, RemoteClient, SendOutcome};
use crate::infrastructure::storage::config::TclConfig;

pub struct TclClient {
    ip: Ipv4Addr,
    config: TclConfig,
    http: reqwest::Client,
    /// Runtime captured by a successful `connect()`; `None` while
    /// disconnected.
    runtime: Option<Handle>,
}

impl TclClient {
    pub fn new(ip: Ipv4Addr, config: TclConfig) -> Self {
        Self {
            ip,
            config,
            http: reqwest::Client::new(),
            runtime: None,
        }
    }
}

#[async_trait]
impl RemoteClient for TclClient {
    fn brand(&self) -> Brand {
        Brand::Tcl
    }

    /// Never returns `Err`: an unreachable or unhealthy TV is `Ok(false)`.
    async fn connect(&mut self) -> Result<bool, ControlError> {
        self.runtime = None;
        let url = roku::device_info_url(self.ip, self.config.port);
        info!("probing TCL TV at {url}");

        let reply = self
            .http
            .get(&url)
            .timeout(self.config.connect_timeout())
            .send()
            .await;
        match reply {
            Ok(response) if response.status().is_success() => {
                self.runtime = Some(Handle::current());
                info!("TCL TV {} connected", self.ip);
                Ok(true)
            }
            Ok(response) => {
                warn!("TCL TV {} answered {}", self.ip, response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("TCL TV {} unreachable: {e}", self.ip);
                Ok(false)
            }
        }
    }

    fn send_key(&self, command: &str) -> SendOutcome {
        let Some(runtime) = self.runtime.as_ref() else {
            warn!("TCL: not connected, dropping {command:?}");
            return SendOutcome::NotConnected;
        };
        let Some(key) = KeyMapper::resolve(Brand::Tcl, command) else {
            warn!("TCL: no key for command {command:?}");
            return SendOutcome::Unmapped;
        };

        let request = self
            .http
            .post(roku::keypress_url(self.ip, self.config.port, &key))
            .timeout(self.config.connect_timeout());
        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => debug!("TCL: sent {key}"),
                Ok(response) => warn!("TCL: {key} answered {}", response.status()),
                Err(e) => warn!("TCL: {key} failed: {e}"),
            }
        });
        SendOutcome::Sent
    }

    fn disconnect(&mut self) {
        if self.runtime.take().is_some() {
            info!("TCL TV {} disconnected", self.ip);
        }
    }

    fn connection_status(&self) -> bool {
        self.runtime.is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
