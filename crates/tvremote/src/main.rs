//! Smart Remote headless driver.
//!
//! A small terminal front end over the `tvremote` library: it wires the
//! control context to the TOML state file, the log-backed notifier and the
//! real network clients, runs one subcommand and exits.
//!
//! # Usage
//!
//! ```text
//! tvremote [OPTIONS] <COMMAND>
//!
//! Commands:
//!   brands                         List brands and whether they are supported
//!   devices                        List saved TVs
//!   add-device --name N --ip IP    Save a TV by address
//!   remove-device <ID>             Forget a saved TV
//!   scan [--quick] [--brand B]     Look for TVs on the LAN
//!   send --ip IP [--brand B] CMD.. Connect and press keys
//!   launch --ip IP --app APP       Connect and open an app (LG)
//!
//! Options:
//!   --config <PATH>   Config file [env: TVREMOTE_CONFIG]
//!   --state  <PATH>   State file  [env: TVREMOTE_STATE]
//! ```
//!
//! Log verbosity follows `RUST_LOG`, falling back to `general.log_level` from
//! the config file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tvremote::application::control_router::{Collaborators, ControlContext};
use tvremote::application::ports::{ScanMode, SettingsStore};
use tvremote::application::remote_client::SendOutcome;
use tvremote::infrastructure::feedback::{NoopHaptics, TracingNotifier};
use tvremote::infrastructure::network::NetworkProber;
use tvremote::infrastructure::storage::config::{config_dir, config_file_path};
use tvremote::infrastructure::storage::{load_config_from, RemoteConfig, TomlStateStore};
use tvremote::infrastructure::tv::BrandClientFactory;
use tvremote_core::{Brand, Device};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Control Samsung, LG and TCL smart TVs over the local network.
#[derive(Debug, Parser)]
#[command(name = "tvremote", about = "Multi-brand smart TV remote", version)]
struct Cli {
    /// Path to `config.toml`.  Defaults to the platform config directory.
    #[arg(long, env = "TVREMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Path to `state.toml` (tokens, saved TVs, brand, settings).
    #[arg(long, env = "TVREMOTE_STATE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List brands and whether they are supported.
    Brands,
    /// List saved TVs.
    Devices,
    /// Save a TV by name and IPv4 address.
    AddDevice {
        #[arg(long)]
        name: String,
        #[arg(long)]
        ip: String,
    },
    /// Forget a saved TV by id.
    RemoveDevice { id: String },
    /// Look for TVs of the selected brand on the LAN.
    Scan {
        /// Probe only commonly assigned addresses.
        #[arg(long)]
        quick: bool,
        /// Brand to scan for; also becomes the selected brand.
        #[arg(long)]
        brand: Option<Brand>,
    },
    /// Connect to a TV and press keys, e.g. `send --ip 192.168.1.50 power`.
    Send {
        #[arg(long)]
        ip: String,
        #[arg(long)]
        brand: Option<Brand>,
        /// Pause between key presses in milliseconds.
        #[arg(long, default_value_t = 300)]
        delay_ms: u64,
        /// Abstract commands (`volume_up`) or native key codes.
        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// Connect to a TV and open an app by platform id.
    Launch {
        #[arg(long)]
        ip: String,
        #[arg(long)]
        brand: Option<Brand>,
        #[arg(long)]
        app: String,
    },
}

impl Cli {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path().context("cannot locate the config directory"),
        }
    }

    fn state_path(&self) -> anyhow::Result<PathBuf> {
        match &self.state {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()
                .context("cannot locate the config directory")?
                .join("state.toml")),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config_path()?;
    let config = load_config_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    let state_path = cli.state_path()?;
    let store: Arc<dyn SettingsStore> = Arc::new(
        TomlStateStore::open(&state_path)
            .with_context(|| format!("failed to open {}", state_path.display()))?,
    );
    let mut context = build_context(config, store)?;

    let result = run(&mut context, cli.command).await;
    context.shutdown();
    result
}

fn build_context(config: RemoteConfig, store: Arc<dyn SettingsStore>) -> anyhow::Result<ControlContext> {
    let collaborators = Collaborators {
        store: Arc::clone(&store),
        notifier: Arc::new(TracingNotifier),
        haptics: Arc::new(NoopHaptics),
        factory: Arc::new(BrandClientFactory::new(config.clone(), store)),
        scanner: Arc::new(NetworkProber::new(config.scan)),
    };
    ControlContext::new(collaborators).context("failed to restore saved state")
}

async fn run(context: &mut ControlContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Brands => {
            for info in Brand::catalog() {
                let marker = if info.brand == context.selected_brand() { "*" } else { " " };
                let status = if info.supported { "" } else { "  (not supported yet)" };
                println!("{marker} {:<10} {:<12} {}{status}", info.brand.id(), info.name, info.platform);
            }
        }
        Command::Devices => print_devices(context.available_devices()),
        Command::AddDevice { name, ip } => {
            let device = context.add_manual_device(&name, &ip)?;
            println!("saved {} ({}) as {}", device.name, device.ip, device.id);
        }
        Command::RemoveDevice { id } => {
            if !context.remove_device(&id)? {
                bail!("no saved TV with id {id}");
            }
        }
        Command::Scan { quick, brand } => {
            if let Some(brand) = brand {
                context.select_brand(brand)?;
            }
            let mode = if quick { ScanMode::Quick } else { ScanMode::Full };
            let found = context.scan_for_devices(mode).await?;
            print_devices(&found);
        }
        Command::Send {
            ip,
            brand,
            delay_ms,
            commands,
        } => {
            connect(context, &ip, brand).await?;
            let delay = Duration::from_millis(delay_ms);
            for (i, command) in commands.iter().enumerate() {
                if i > 0 {
                    tokio::time::sleep(delay).await;
                }
                match context.send_command(command) {
                    SendOutcome::Sent => info!("sent {command}"),
                    other => println!("{command}: {other:?}"),
                }
            }
            // Key presses are queued; give the writer a moment to flush.
            tokio::time::sleep(delay).await;
        }
        Command::Launch { ip, brand, app } => {
            connect(context, &ip, brand).await?;
            let outcome = context.launch_app(&app);
            if outcome != SendOutcome::Sent {
                bail!("could not launch {app}: {outcome:?}");
            }
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
    }
    Ok(())
}

/// Connects to the saved TV at `ip`, or to an unsaved one at that address.
async fn connect(context: &mut ControlContext, ip: &str, brand: Option<Brand>) -> anyhow::Result<()> {
    if let Some(brand) = brand {
        context.select_brand(brand)?;
    }
    let saved = context
        .available_devices()
        .iter()
        .find(|d| d.ip.to_string() == ip)
        .cloned();
    let device = match saved {
        Some(device) => device,
        None => Device::manual("TV", ip)?,
    };

    match context.connect_to_tv(&device).await {
        Ok(true) => Ok(()),
        Ok(false) => bail!("{} TV at {ip} did not accept the connection", context.selected_brand()),
        Err(e) => {
            if let Some(help) = e.remediation() {
                eprintln!("{help}");
            }
            Err(e).with_context(|| format!("cannot connect to {ip}"))
        }
    }
}

fn print_devices(devices: &[Device]) {
    if devices.is_empty() {
        println!("no TVs");
        return;
    }
    for device in devices {
        println!("{:<40} {:<15} {:<28} {}", device.id, device.ip, device.name, device.model);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
