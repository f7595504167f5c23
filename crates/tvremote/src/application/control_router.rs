//! ControlContext: the one object an embedding application talks to.
//!
//! It owns the selected brand, at most one live [`RemoteClient`], the device
//! the client is connected to, the known device list and the user settings.
//! Collaborators (store, notifier, haptics, client factory, scanner) are
//! injected through [`Collaborators`].
//!
//! # Connection state machine
//!
//! ```text
//!            connect_to_tv → Ok(true)
//! NoClient ───────────────────────────▶ Connected
//!    ▲                                      │
//!    └──── disconnect / transport closed ───┘
//! ```
//!
//! A failed connect (`Ok(false)` or `Err`) leaves the previous state
//! untouched, so a working session survives a failed attempt on another TV.
//! Methods that mutate take `&mut self`, so one owner can never run two
//! connects at the same time.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use tvremote_core::{AppSettings, Brand, Device, SettingsPatch};

use super::ports::{DeviceScanner, Haptics, NoticeLevel, Notifier, ScanMode, SettingsStore};
use super::remote_client::{ClientFactory, ControlError, RemoteClient, SendOutcome};

/// Length of the haptic pulse fired on every command.
pub const HAPTIC_PULSE: Duration = Duration::from_millis(10);

/// Everything [`ControlContext`] needs from the outside world.
pub struct Collaborators {
    pub store: Arc<dyn SettingsStore>,
    pub notifier: Arc<dyn Notifier>,
    pub haptics: Arc<dyn Haptics>,
    pub factory: Arc<dyn ClientFactory>,
    pub scanner: Arc<dyn DeviceScanner>,
}

/// Remote-control state for one embedding application.
pub struct ControlContext {
    store: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
    haptics: Arc<dyn Haptics>,
    factory: Arc<dyn ClientFactory>,
    scanner: Arc<dyn DeviceScanner>,
    brand: Brand,
    client: Option<Box<dyn RemoteClient>>,
    current_device: Option<Device>,
    devices: Vec<Device>,
    settings: AppSettings,
}

impl ControlContext {
    /// Creates the context and restores brand, settings and saved devices
    /// from the store.
    ///
    /// # Errors
    ///
    /// [`ControlError::Store`] if the store cannot be read.
    pub fn new(collaborators: Collaborators) -> Result<Self, ControlError> {
        let Collaborators {
            store,
            notifier,
            haptics,
            factory,
            scanner,
        } = collaborators;

        let brand = store.brand()?.unwrap_or_default();
        let settings = store.settings()?.unwrap_or_default();
        let devices = store.devices()?;
        info!(%brand, saved_devices = devices.len(), "control context ready");

        Ok(Self {
            store,
            notifier,
            haptics,
            factory,
            scanner,
            brand,
            client: None,
            current_device: None,
            devices,
            settings,
        })
    }

    // ── Connection ────────────────────────────────────────────────────────────

    /// Connects to `device` using the client for the selected brand.
    ///
    /// On `Ok(true)` the previous client (if any) is disconnected and the new
    /// client and device become current.  Any other result leaves the
    /// current state unchanged.  Every outcome is reported through the
    /// notifier.
    ///
    /// # Errors
    ///
    /// [`ControlError::UnsupportedBrand`] immediately for brands without a
    /// client, otherwise whatever the brand client's handshake returned.
    pub async fn connect_to_tv(&mut self, device: &Device) -> Result<bool, ControlError> {
        info!(brand = %self.brand, ip = %device.ip, name = %device.name, "connecting");

        let token = match self.store.token(device.ip) {
            Ok(token) => token,
            Err(e) => {
                warn!("could not read stored token for {}: {e}", device.ip);
                None
            }
        };

        let mut client = match self.factory.create(self.brand, device, token) {
            Ok(client) => client,
            Err(e) => {
                self.report_failure(device, &e);
                return Err(e);
            }
        };

        match client.connect().await {
            Ok(true) => {
                if let Some(mut previous) = self.client.take() {
                    previous.disconnect();
                }
                self.client = Some(client);
                self.current_device = Some(device.clone());
                self.notifier
                    .notify(NoticeLevel::Success, &format!("Connected to {}", device.name));
                Ok(true)
            }
            Ok(false) => {
                client.disconnect();
                self.notifier.notify(
                    NoticeLevel::Error,
                    &format!("Could not connect to {}", device.name),
                );
                Ok(false)
            }
            Err(e) => {
                client.disconnect();
                self.report_failure(device, &e);
                Err(e)
            }
        }
    }

    fn report_failure(&self, device: &Device, err: &ControlError) {
        warn!(ip = %device.ip, "connection failed: {err}");
        let message = match err.remediation() {
            Some(help) => format!("{err}\n{help}"),
            None => err.to_string(),
        };
        self.notifier.notify(NoticeLevel::Error, &message);
    }

    /// Sends an abstract command to the connected TV.
    ///
    /// Fires the haptic pulse first when vibration is enabled.  If the
    /// client has lost its transport it is released and the context goes
    /// back to having no client.
    pub fn send_command(&mut self, command: &str) -> SendOutcome {
        self.pulse();
        match self.live_client() {
            Some(client) => client.send_key(command),
            None => {
                warn!(command, "no TV connected; command dropped");
                SendOutcome::NotConnected
            }
        }
    }

    /// Opens an app on the connected TV (LG only).
    ///
    /// App shortcuts are buttons too, so the haptic pulse fires here as well.
    pub fn launch_app(&mut self, app_id: &str) -> SendOutcome {
        self.pulse();
        match self.live_client() {
            Some(client) => client.launch_app(app_id),
            None => {
                warn!(app_id, "no TV connected; launch dropped");
                SendOutcome::NotConnected
            }
        }
    }

    fn pulse(&self) {
        if self.settings.vibration_enabled {
            self.haptics.vibrate(HAPTIC_PULSE);
        }
    }

    /// Returns the active client if its session is still up, releasing it
    /// otherwise.
    fn live_client(&mut self) -> Option<&dyn RemoteClient> {
        let alive = self.client.as_ref().is_some_and(|c| c.connection_status());
        if !alive {
            if self.client.is_some() {
                info!("TV connection lost");
                self.release_client();
            }
            return None;
        }
        self.client.as_deref()
    }

    fn release_client(&mut self) {
        if let Some(mut client) = self.client.take() {
            client.disconnect();
        }
        self.current_device = None;
    }

    /// Disconnects from the current TV, if any.
    pub fn disconnect(&mut self) {
        if let Some(device) = &self.current_device {
            info!(ip = %device.ip, "disconnecting");
        }
        self.release_client();
    }

    /// `true` if a client exists and reports a live session.
    pub fn connection_status(&self) -> bool {
        self.client.as_ref().is_some_and(|c| c.connection_status())
    }

    /// The device of the live session, if any.
    pub fn current_device(&self) -> Option<&Device> {
        self.current_device.as_ref()
    }

    /// Releases every resource; call once when the application exits.
    pub fn shutdown(&mut self) {
        debug!("shutting down control context");
        self.release_client();
    }

    // ── Brand ─────────────────────────────────────────────────────────────────

    pub fn selected_brand(&self) -> Brand {
        self.brand
    }

    /// Selects and persists the brand used for the next connection.
    ///
    /// Switching to a different brand ends the current session, since its
    /// client speaks the old brand's protocol.
    ///
    /// # Errors
    ///
    /// [`ControlError::Store`] if the brand cannot be persisted; the
    /// selection and any live session are then left as they were.
    pub fn select_brand(&mut self, brand: Brand) -> Result<(), ControlError> {
        self.store.save_brand(brand)?;
        if brand != self.brand {
            self.release_client();
            self.brand = brand;
        }
        Ok(())
    }

    // ── Devices ───────────────────────────────────────────────────────────────

    pub fn available_devices(&self) -> &[Device] {
        &self.devices
    }

    /// Replaces the known device list.
    ///
    /// # Errors
    ///
    /// [`ControlError::Store`] if the list cannot be persisted; the previous
    /// list stays in place.
    pub fn set_available_devices(&mut self, devices: Vec<Device>) -> Result<(), ControlError> {
        self.commit_devices(devices)
    }

    /// Validates and saves a manually entered TV.
    ///
    /// # Errors
    ///
    /// [`ControlError::MissingName`] or [`ControlError::InvalidAddress`] for
    /// bad input, [`ControlError::Store`] if saving fails.
    pub fn add_manual_device(&mut self, name: &str, ip: &str) -> Result<Device, ControlError> {
        let device = Device::manual(name, ip)?;
        let mut devices = self.devices.clone();
        devices.push(device.clone());
        self.commit_devices(devices)?;
        self.notifier
            .notify(NoticeLevel::Success, &format!("{} added", device.name));
        Ok(device)
    }

    /// Removes a device by id.  Returns `false` if no device had that id.
    ///
    /// # Errors
    ///
    /// [`ControlError::Store`] if the list cannot be persisted.
    pub fn remove_device(&mut self, id: &str) -> Result<bool, ControlError> {
        if !self.devices.iter().any(|d| d.id == id) {
            return Ok(false);
        }
        let remaining = self.devices.iter().filter(|d| d.id != id).cloned().collect();
        self.commit_devices(remaining)?;
        Ok(true)
    }

    /// Probes the network for TVs of the selected brand and merges any new
    /// addresses into the known list.
    ///
    /// Returns the devices the scan found (including ones already known).
    ///
    /// # Errors
    ///
    /// [`ControlError::Store`] if the merged list cannot be persisted.
    pub async fn scan_for_devices(&mut self, mode: ScanMode) -> Result<Vec<Device>, ControlError> {
        info!(brand = %self.brand, ?mode, "scanning for TVs");
        let found = self.scanner.scan(self.brand, mode).await;

        let mut merged = self.devices.clone();
        for device in &found {
            if !merged.iter().any(|known| known.ip == device.ip) {
                merged.push(device.clone());
            }
        }
        if merged.len() > self.devices.len() {
            self.commit_devices(merged)?;
        }

        if found.is_empty() {
            self.notifier.notify(
                NoticeLevel::Info,
                "No TVs found. Make sure the TV is on and connected to the same Wi-Fi network.",
            );
        } else {
            self.notifier
                .notify(NoticeLevel::Success, &format!("Found {} TV(s)", found.len()));
        }
        Ok(found)
    }

    /// Saves `devices` and adopts them only once the store accepted them.
    fn commit_devices(&mut self, devices: Vec<Device>) -> Result<(), ControlError> {
        self.store.save_devices(&devices)?;
        self.devices = devices;
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────────────────────

    pub fn settings(&self) -> AppSettings {
        self.settings
    }

    /// Applies a partial update and persists the result.
    ///
    /// # Errors
    ///
    /// [`ControlError::Store`] if the settings cannot be persisted; the
    /// current settings are kept.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<AppSettings, ControlError> {
        let updated = self.settings.merged(patch);
        self.store.save_settings(&updated)?;
        self.settings = updated;
        Ok(updated)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockHaptics, StoreError};
    use crate::infrastructure::storage::state::MemoryStore;
    use async_trait::async_trait;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tvremote_core::{KeyMapper, Theme};

    // ── Test doubles ──────────────────────────────────────────────────────────

    /// Shared view into a [`ScriptedClient`] that outlives the boxed client.
    #[derive(Clone, Default)]
    struct Spy {
        connected: Arc<AtomicBool>,
        sent: Arc<Mutex<Vec<String>>>,
        disconnects: Arc<Mutex<u32>>,
    }

    struct ScriptedClient {
        brand: Brand,
        result: Option<Result<bool, ControlError>>,
        spy: Spy,
    }

    #[async_trait]
    impl RemoteClient for ScriptedClient {
        fn brand(&self) -> Brand {
            self.brand
        }

        async fn connect(&mut self) -> Result<bool, ControlError> {
            let result = self.result.take().unwrap_or(Ok(true));
            if matches!(result, Ok(true)) {
                self.spy.connected.store(true, Ordering::SeqCst);
            }
            result
        }

        fn send_key(&self, command: &str) -> SendOutcome {
            if !self.connection_status() {
                return SendOutcome::NotConnected;
            }
            match KeyMapper::resolve(self.brand, command) {
                Some(key) => {
                    self.spy.sent.lock().unwrap().push(key);
                    SendOutcome::Sent
                }
                None => SendOutcome::Unmapped,
            }
        }

        fn disconnect(&mut self) {
            self.spy.connected.store(false, Ordering::SeqCst);
            *self.spy.disconnects.lock().unwrap() += 1;
        }

        fn connection_status(&self) -> bool {
            self.spy.connected.load(Ordering::SeqCst)
        }
    }

    /// Hands out pre-scripted connect results in order.
    #[derive(Default)]
    struct ScriptedFactory {
        script: Mutex<Vec<(Result<bool, ControlError>, Spy)>>,
        tokens_seen: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedFactory {
        fn push(&self, result: Result<bool, ControlError>) -> Spy {
            let spy = Spy::default();
            self.script.lock().unwrap().push((result, spy.clone()));
            spy
        }
    }

    impl ClientFactory for ScriptedFactory {
        fn create(
            &self,
            brand: Brand,
            _device: &Device,
            token: Option<String>,
        ) -> Result<Box<dyn RemoteClient>, ControlError> {
            if !brand.is_supported() {
                return Err(ControlError::UnsupportedBrand(brand));
            }
            self.tokens_seen.lock().unwrap().push(token);
            let (result, spy) = self.script.lock().unwrap().remove(0);
            Ok(Box::new(ScriptedClient {
                brand,
                result: Some(result),
                spy,
            }))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<(NoticeLevel, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, level: NoticeLevel, message: &str) {
            self.notices.lock().unwrap().push((level, message.to_string()));
        }
    }

    /// Reads from an in-memory store but refuses every write, like a full
    /// disk.
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl ReadOnlyStore {
        fn refuse() -> StoreError {
            StoreError::Serialize("disk full".to_string())
        }
    }

    impl SettingsStore for ReadOnlyStore {
        fn token(&self, ip: Ipv4Addr) -> Result<Option<String>, StoreError> {
            self.0.token(ip)
        }
        fn save_token(&self, _ip: Ipv4Addr, _token: &str) -> Result<(), StoreError> {
            Err(Self::refuse())
        }
        fn devices(&self) -> Result<Vec<Device>, StoreError> {
            self.0.devices()
        }
        fn save_devices(&self, _devices: &[Device]) -> Result<(), StoreError> {
            Err(Self::refuse())
        }
        fn brand(&self) -> Result<Option<Brand>, StoreError> {
            self.0.brand()
        }
        fn save_brand(&self, _brand: Brand) -> Result<(), StoreError> {
            Err(Self::refuse())
        }
        fn settings(&self) -> Result<Option<AppSettings>, StoreError> {
            self.0.settings()
        }
        fn save_settings(&self, _settings: &AppSettings) -> Result<(), StoreError> {
            Err(Self::refuse())
        }
    }

    struct FixedScanner(Vec<Device>);

    #[async_trait]
    impl DeviceScanner for FixedScanner {
        async fn scan(&self, _brand: Brand, _mode: ScanMode) -> Vec<Device> {
            self.0.clone()
        }
    }

    struct Harness {
        ctx: ControlContext,
        factory: Arc<ScriptedFactory>,
        notifier: Arc<RecordingNotifier>,
        store: Arc<MemoryStore>,
    }

    fn harness_with(haptics: MockHaptics, scan: Vec<Device>) -> Harness {
        let factory = Arc::new(ScriptedFactory::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(MemoryStore::new());
        let ctx = ControlContext::new(Collaborators {
            store: store.clone(),
            notifier: notifier.clone(),
            haptics: Arc::new(haptics),
            factory: factory.clone(),
            scanner: Arc::new(FixedScanner(scan)),
        })
        .unwrap();
        Harness {
            ctx,
            factory,
            notifier,
            store,
        }
    }

    fn quiet_haptics() -> MockHaptics {
        let mut haptics = MockHaptics::new();
        haptics.expect_vibrate().return_const(());
        haptics
    }

    fn harness() -> Harness {
        harness_with(quiet_haptics(), Vec::new())
    }

    /// A context over `store` whose writes all fail.
    fn read_only_harness(store: ReadOnlyStore) -> (ControlContext, Arc<ScriptedFactory>) {
        let factory = Arc::new(ScriptedFactory::default());
        let ctx = ControlContext::new(Collaborators {
            store: Arc::new(store),
            notifier: Arc::new(RecordingNotifier::default()),
            haptics: Arc::new(quiet_haptics()),
            factory: factory.clone(),
            scanner: Arc::new(FixedScanner(vec![tv(30), tv(31)])),
        })
        .unwrap();
        (ctx, factory)
    }

    fn tv(last_octet: u8) -> Device {
        Device::discovered("Samsung", Ipv4Addr::new(192, 168, 1, last_octet))
    }

    // ── Connect ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_successful_connect_sets_current_device() {
        // Arrange
        let mut h = harness();
        h.factory.push(Ok(true));

        // Act
        let result = h.ctx.connect_to_tv(&tv(50)).await;

        // Assert
        assert!(matches!(result, Ok(true)));
        assert!(h.ctx.connection_status());
        assert_eq!(h.ctx.current_device().unwrap().ip, Ipv4Addr::new(192, 168, 1, 50));
        let notices = h.notifier.notices.lock().unwrap();
        assert_eq!(notices.last().unwrap().0, NoticeLevel::Success);
    }

    #[tokio::test]
    async fn test_soft_failure_leaves_state_unchanged() {
        // Arrange
        let mut h = harness();
        h.factory.push(Ok(false));

        // Act
        let result = h.ctx.connect_to_tv(&tv(51)).await;

        // Assert
        assert!(matches!(result, Ok(false)));
        assert!(!h.ctx.connection_status());
        assert!(h.ctx.current_device().is_none());
    }

    #[tokio::test]
    async fn test_failed_connect_keeps_previous_session() {
        // Arrange
        let mut h = harness();
        let first = h.factory.push(Ok(true));
        h.factory.push(Err(ControlError::Timeout {
            brand: Brand::Samsung,
            after: Duration::from_secs(10),
        }));
        h.ctx.connect_to_tv(&tv(1)).await.unwrap();

        // Act
        let result = h.ctx.connect_to_tv(&tv(2)).await;

        // Assert
        assert!(matches!(result, Err(ControlError::Timeout { .. })));
        assert!(first.connected.load(Ordering::SeqCst), "old session untouched");
        assert_eq!(h.ctx.current_device().unwrap().ip.octets()[3], 1);
        let notices = h.notifier.notices.lock().unwrap();
        let (level, text) = notices.last().unwrap();
        assert_eq!(*level, NoticeLevel::Error);
        assert!(text.contains("same Wi-Fi"), "remediation must be shown: {text}");
    }

    #[tokio::test]
    async fn test_new_connection_disconnects_previous_client() {
        let mut h = harness();
        let first = h.factory.push(Ok(true));
        h.factory.push(Ok(true));

        h.ctx.connect_to_tv(&tv(1)).await.unwrap();
        h.ctx.connect_to_tv(&tv(2)).await.unwrap();

        assert_eq!(*first.disconnects.lock().unwrap(), 1);
        assert_eq!(h.ctx.current_device().unwrap().ip.octets()[3], 2);
    }

    #[tokio::test]
    async fn test_unsupported_brand_fails_immediately() {
        let mut h = harness();
        h.ctx.select_brand(Brand::Philips).unwrap();

        let result = h.ctx.connect_to_tv(&tv(3)).await;

        assert!(matches!(result, Err(ControlError::UnsupportedBrand(Brand::Philips))));
        assert!(h.factory.tokens_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stored_token_is_passed_to_factory() {
        let mut h = harness();
        h.store.save_token(Ipv4Addr::new(192, 168, 1, 9), "tok").unwrap();
        h.factory.push(Ok(true));

        h.ctx.connect_to_tv(&tv(9)).await.unwrap();

        assert_eq!(*h.factory.tokens_seen.lock().unwrap(), vec![Some("tok".to_string())]);
    }

    // ── Send ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_command_translates_for_brand() {
        let mut h = harness();
        let spy = h.factory.push(Ok(true));
        h.ctx.connect_to_tv(&tv(4)).await.unwrap();

        assert_eq!(h.ctx.send_command("volume_up"), SendOutcome::Sent);
        assert_eq!(h.ctx.send_command("teleport"), SendOutcome::Unmapped);
        assert_eq!(*spy.sent.lock().unwrap(), vec!["KEY_VOLUP".to_string()]);
    }

    #[test]
    fn test_send_without_client_is_not_connected() {
        let mut h = harness();
        assert_eq!(h.ctx.send_command("home"), SendOutcome::NotConnected);
    }

    #[tokio::test]
    async fn test_lost_transport_releases_client() {
        // Arrange
        let mut h = harness();
        let spy = h.factory.push(Ok(true));
        h.ctx.connect_to_tv(&tv(5)).await.unwrap();

        // Act – the TV closes the socket
        spy.connected.store(false, Ordering::SeqCst);
        let outcome = h.ctx.send_command("home");

        // Assert
        assert_eq!(outcome, SendOutcome::NotConnected);
        assert!(h.ctx.current_device().is_none());
        assert!(spy.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_haptics_fire_once_per_command_when_enabled() {
        let mut haptics = MockHaptics::new();
        haptics
            .expect_vibrate()
            .withf(|d| *d == HAPTIC_PULSE)
            .times(2)
            .return_const(());
        let mut h = harness_with(haptics, Vec::new());

        h.ctx.send_command("up");
        h.ctx.send_command("down");
    }

    #[test]
    fn test_haptics_skipped_when_vibration_disabled() {
        let mut haptics = MockHaptics::new();
        haptics.expect_vibrate().never();
        let mut h = harness_with(haptics, Vec::new());
        h.ctx
            .update_settings(SettingsPatch {
                vibration_enabled: Some(false),
                ..SettingsPatch::default()
            })
            .unwrap();

        h.ctx.send_command("up");
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let mut h = harness();
        let spy = h.factory.push(Ok(true));
        h.ctx.connect_to_tv(&tv(6)).await.unwrap();

        h.ctx.disconnect();
        h.ctx.disconnect();

        assert!(!h.ctx.connection_status());
        assert!(h.ctx.current_device().is_none());
        assert_eq!(*spy.disconnects.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_launch_app_fires_haptic_pulse() {
        // Arrange
        let mut haptics = MockHaptics::new();
        haptics
            .expect_vibrate()
            .withf(|d| *d == HAPTIC_PULSE)
            .times(1)
            .return_const(());
        let mut h = harness_with(haptics, Vec::new());
        h.factory.push(Ok(true));
        h.ctx.connect_to_tv(&tv(12)).await.unwrap();

        // Act
        h.ctx.launch_app("youtube.leanback.v4");
    }

    #[tokio::test]
    async fn test_launch_app_on_brand_without_support() {
        let mut h = harness();
        h.factory.push(Ok(true));
        h.ctx.connect_to_tv(&tv(7)).await.unwrap();

        assert_eq!(h.ctx.launch_app("netflix"), SendOutcome::Unsupported);
    }

    // ── Brand, devices, settings ──────────────────────────────────────────────

    #[tokio::test]
    async fn test_changing_brand_ends_session_and_persists() {
        let mut h = harness();
        h.factory.push(Ok(true));
        h.ctx.connect_to_tv(&tv(8)).await.unwrap();

        h.ctx.select_brand(Brand::Lg).unwrap();

        assert!(!h.ctx.connection_status());
        assert_eq!(h.store.brand().unwrap(), Some(Brand::Lg));
    }

    #[test]
    fn test_add_and_remove_manual_device_persist() {
        // Arrange
        let mut h = harness();

        // Act
        let device = h.ctx.add_manual_device("Bedroom", "10.0.0.20").unwrap();

        // Assert
        assert_eq!(h.store.devices().unwrap(), vec![device.clone()]);
        assert!(h.ctx.remove_device(&device.id).unwrap());
        assert!(!h.ctx.remove_device(&device.id).unwrap());
        assert!(h.store.devices().unwrap().is_empty());
    }

    #[test]
    fn test_manual_device_validation() {
        let mut h = harness();
        assert!(matches!(
            h.ctx.add_manual_device("TV", "999.1.1.1"),
            Err(ControlError::InvalidAddress(_))
        ));
        assert!(matches!(
            h.ctx.add_manual_device("", "10.0.0.1"),
            Err(ControlError::MissingName)
        ));
        assert!(h.ctx.available_devices().is_empty());
    }

    #[tokio::test]
    async fn test_scan_merges_without_duplicating_addresses() {
        // Arrange
        let mut h = harness_with(quiet_haptics(), vec![tv(10), tv(11)]);
        h.ctx.set_available_devices(vec![tv(10)]).unwrap();

        // Act
        let found = h.ctx.scan_for_devices(ScanMode::Quick).await.unwrap();

        // Assert
        assert_eq!(found.len(), 2);
        assert_eq!(h.ctx.available_devices().len(), 2);
        let notices = h.notifier.notices.lock().unwrap();
        assert_eq!(notices.last().unwrap().1, "Found 2 TV(s)");
    }

    #[tokio::test]
    async fn test_empty_scan_notifies_info() {
        let mut h = harness();
        let found = h.ctx.scan_for_devices(ScanMode::Full).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(h.notifier.notices.lock().unwrap()[0].0, NoticeLevel::Info);
    }

    #[test]
    fn test_settings_update_is_persisted_and_restored() {
        // Arrange
        let mut h = harness();

        // Act
        h.ctx
            .update_settings(SettingsPatch {
                theme: Some(Theme::Dark),
                ..SettingsPatch::default()
            })
            .unwrap();
        let restored = ControlContext::new(Collaborators {
            store: h.store.clone(),
            notifier: h.notifier.clone(),
            haptics: Arc::new(quiet_haptics()),
            factory: h.factory.clone(),
            scanner: Arc::new(FixedScanner(Vec::new())),
        })
        .unwrap();

        // Assert
        assert_eq!(restored.settings().theme, Theme::Dark);
        assert!(restored.settings().vibration_enabled);
    }

    // ── Store failures ────────────────────────────────────────────────────────

    #[test]
    fn test_failed_device_save_leaves_list_unchanged() {
        // Arrange
        let (mut ctx, _factory) = read_only_harness(ReadOnlyStore::default());

        // Act
        let added = ctx.add_manual_device("Kitchen", "10.0.0.30");
        let replaced = ctx.set_available_devices(vec![tv(1)]);

        // Assert
        assert!(matches!(added, Err(ControlError::Store(_))));
        assert!(matches!(replaced, Err(ControlError::Store(_))));
        assert!(ctx.available_devices().is_empty());
    }

    #[test]
    fn test_failed_removal_keeps_device() {
        let inner = MemoryStore::new();
        inner.save_devices(&[tv(20)]).unwrap();
        let (mut ctx, _factory) = read_only_harness(ReadOnlyStore(inner));
        let id = ctx.available_devices()[0].id.clone();

        assert!(ctx.remove_device(&id).is_err());

        assert_eq!(ctx.available_devices().len(), 1);
        assert_eq!(ctx.available_devices()[0].id, id);
    }

    #[tokio::test]
    async fn test_failed_brand_save_keeps_brand_and_session() {
        // Arrange
        let (mut ctx, factory) = read_only_harness(ReadOnlyStore::default());
        let spy = factory.push(Ok(true));
        ctx.connect_to_tv(&tv(21)).await.unwrap();

        // Act
        let result = ctx.select_brand(Brand::Lg);

        // Assert
        assert!(matches!(result, Err(ControlError::Store(_))));
        assert_eq!(ctx.selected_brand(), Brand::Samsung);
        assert!(ctx.connection_status());
        assert_eq!(*spy.disconnects.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_scan_merge_is_not_adopted() {
        let (mut ctx, _factory) = read_only_harness(ReadOnlyStore::default());

        let result = ctx.scan_for_devices(ScanMode::Quick).await;

        assert!(matches!(result, Err(ControlError::Store(_))));
        assert!(ctx.available_devices().is_empty());
    }

    #[test]
    fn test_failed_settings_save_keeps_settings() {
        let (mut ctx, _factory) = read_only_harness(ReadOnlyStore::default());

        let result = ctx.update_settings(SettingsPatch {
            theme: Some(Theme::Dark),
            ..SettingsPatch::default()
        });

        assert!(result.is_err());
        assert_eq!(ctx.settings().theme, Theme::Light);
    }
}
