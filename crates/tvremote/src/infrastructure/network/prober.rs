//! Best-effort LAN prober.
//!
//! # How discovery works (for beginners)
//!
//! Most home networks are a single /24 (`192.168.1.x`, `192.168.0.x`,
//! `10.0.0.x`).  The prober:
//!
//! 1. Guesses the subnet by sending an HTTP request to the usual router
//!    addresses.  The first router that answers at all wins; if none does,
//!    the configured fallback subnet is used.
//! 2. Asks every host `1..=254` in that subnet for an endpoint only a TV of
//!    the selected brand serves (Samsung `:8001/api/v2/`, LG `:3000/`, TCL
//!    `:8060/query/device-info`).  Hosts are probed 50 at a time so the
//!    sweep does not open 254 sockets at once.
//!
//! A host counts as a TV if it returns *any* HTTP response; the body is not
//! inspected.  False positives are possible and acceptable: connecting is
//! what finally proves the device is a TV.
//!
//! The quick scan skips step 1 and probes a fixed set of commonly assigned
//! addresses on the three common subnets, all concurrently.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, info, warn};
use tvremote_core::protocol::{roku, samsung, webos};
use tvremote_core::{Brand, Device};

use super::Subnet24;
use crate::application::ports::{DeviceScanner, ScanMode};
use crate::infrastructure::storage::config::ScanConfig;

/// Endpoint that identifies a brand's TVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub port: u16,
    pub path: &'static str,
}

impl Fingerprint {
    /// The probe endpoint for `brand`, or `None` if the brand has no client.
    pub fn for_brand(brand: Brand) -> Option<Self> {
        match brand {
            Brand::Samsung => Some(Self {
                port: samsung::PLAIN_PORT,
                path: "/api/v2/",
            }),
            Brand::Lg => Some(Self {
                port: webos::PORT,
                path: "/",
            }),
            Brand::Tcl => Some(Self {
                port: roku::PORT,
                path: roku::DEVICE_INFO_PATH,
            }),
            Brand::Sony | Brand::Philips | Brand::Panasonic => None,
        }
    }

    fn url(self, ip: Ipv4Addr) -> String {
        format!("http://{ip}:{}{}", self.port, self.path)
    }
}

/// HTTP prober implementing the [`DeviceScanner`] port.
pub struct NetworkProber {
    config: ScanConfig,
    http: reqwest::Client,
}

impl NetworkProber {
    pub fn new(config: ScanConfig) -> Self {
        // Redirects would turn one probe into several requests; any 3xx
        // already proves something answered.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| {
                warn!("falling back to default HTTP client: {e}");
                reqwest::Client::new()
            });
        Self { config, http }
    }

    /// Guesses the local /24 from the first gateway that answers.
    pub async fn guess_subnet(&self) -> Subnet24 {
        for &gateway in &self.config.gateways {
            let url = format!("http://{gateway}:{}/", self.config.gateway_port);
            let answered = self
                .http
                .get(&url)
                .timeout(self.config.gateway_timeout())
                .send()
                .await
                .is_ok();
            if answered {
                debug!("gateway {gateway} answered");
                return Subnet24::of(gateway);
            }
        }
        debug!(
            "no gateway answered; falling back to {}",
            self.config.fallback_subnet
        );
        self.config.fallback_subnet
    }

    /// Sweeps the guessed /24 for TVs of `brand`.
    pub async fn scan(&self, brand: Brand) -> Vec<Device> {
        let Some(fingerprint) = self.fingerprint(brand) else {
            return Vec::new();
        };
        let subnet = self.guess_subnet().await;
        info!(%brand, %subnet, "sweeping subnet");

        let hosts: Vec<Ipv4Addr> = (1..=254).map(|h| subnet.host(h)).collect();
        let mut found = Vec::new();
        for batch in hosts.chunks(self.config.batch_size.max(1)) {
            found.extend(self.probe_all(brand, fingerprint, batch).await);
        }
        info!(%brand, found = found.len(), "sweep finished");
        found
    }

    /// Probes the commonly assigned addresses on the common subnets.
    pub async fn quick_scan(&self, brand: Brand) -> Vec<Device> {
        let Some(fingerprint) = self.fingerprint(brand) else {
            return Vec::new();
        };
        let candidates: Vec<Ipv4Addr> = self
            .config
            .quick_subnets
            .iter()
            .flat_map(|subnet| self.config.quick_hosts.iter().map(|&h| subnet.host(h)))
            .collect();
        info!(%brand, candidates = candidates.len(), "quick scan");
        self.probe_all(brand, fingerprint, &candidates).await
    }

    /// Fingerprint for `brand`, honouring the network switch and the port
    /// override.
    fn fingerprint(&self, brand: Brand) -> Option<Fingerprint> {
        if !self.config.network_access {
            debug!("network access disabled; skipping scan");
            return None;
        }
        let mut fingerprint = Fingerprint::for_brand(brand)?;
        if let Some(port) = self.config.fingerprint_port {
            fingerprint.port = port;
        }
        Some(fingerprint)
    }

    async fn probe_all(&self, brand: Brand, fingerprint: Fingerprint, ips: &[Ipv4Addr]) -> Vec<Device> {
        let probes = ips.iter().map(|&ip| async move {
            self.probe(fingerprint, ip)
                .await
                .then(|| Device::discovered(brand.display_name(), ip))
        });
        join_all(probes).await.into_iter().flatten().collect()
    }

    async fn probe(&self, fingerprint: Fingerprint, ip: Ipv4Addr) -> bool {
        self.http
            .get(fingerprint.url(ip))
            .timeout(self.config.probe_timeout())
            .send()
            .await
            .is_ok()
    }
}

#[async_trait]
impl DeviceScanner for NetworkProber {
    async fn scan(&self, brand: Brand, mode: ScanMode) -> Vec<Device> {
        match mode {
            ScanMode::Full => NetworkProber::scan(self, brand).await,
            ScanMode::Quick => self.quick_scan(brand).await,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
