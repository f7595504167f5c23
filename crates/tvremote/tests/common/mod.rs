//! Shared fixtures for the integration tests: loopback TVs and a notifier
//! that remembers what it was told.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use tvremote::application::control_router::{Collaborators, ControlContext};
use tvremote::application::ports::{NoticeLevel, Notifier, SettingsStore};
use tvremote::infrastructure::feedback::NoopHaptics;
use tvremote::infrastructure::network::NetworkProber;
use tvremote::infrastructure::storage::{MemoryStore, RemoteConfig};
use tvremote::infrastructure::tv::BrandClientFactory;

pub type Log = Arc<Mutex<Vec<String>>>;

pub async fn wait_for(log: &Log, n: usize) -> Vec<String> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let snapshot = log.lock().unwrap().clone();
        if snapshot.len() >= n || tokio::time::Instant::now() >= deadline {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ── Notifier ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<(NoticeLevel, String)> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

pub struct Harness {
    pub context: ControlContext,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// A context wired to the real clients and prober, with in-memory state.
pub fn harness(config: RemoteConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let shared: Arc<dyn SettingsStore> = store.clone();
    let context = ControlContext::new(Collaborators {
        store: Arc::clone(&shared),
        notifier: notifier.clone(),
        haptics: Arc::new(NoopHaptics),
        factory: Arc::new(BrandClientFactory::new(config.clone(), shared)),
        scanner: Arc::new(NetworkProber::new(config.scan)),
    })
    .unwrap();
    Harness {
        context,
        store,
        notifier,
    }
}

// ── Loopback TVs ──────────────────────────────────────────────────────────────

/// Roku-style HTTP endpoint answering every request with `status`.
/// Returns the address and the request lines it received.
pub async fn roku_tv(status: u16) -> (SocketAddr, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::default();
    let requests = Arc::clone(&log);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let requests = Arc::clone(&requests);
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let line = String::from_utf8_lossy(&head)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                requests.lock().unwrap().push(line);
                let reply =
                    format!("HTTP/1.1 {status} X\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    (addr, log)
}

/// webOS-style WebSocket endpoint that accepts registration with
/// `client_key`.  Returns the address and the text frames it received.
pub async fn webos_tv(client_key: &'static str) -> (SocketAddr, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::default();
    let frames = Arc::clone(&log);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                continue;
            };
            while let Some(Ok(Message::Text(text))) = ws.next().await {
                frames.lock().unwrap().push(text.clone());
                if text.contains(r#""type":"register""#) {
                    let registered = format!(
                        r#"{{"type":"registered","id":"register_0","payload":{{"client-key":"{client_key}"}}}}"#
                    );
                    let _ = ws.send(Message::Text(registered)).await;
                }
            }
        }
    });
    (addr, log)
}
