//! A live WebSocket session to a TV, shared by the Samsung and LG clients.
//!
//! # Structure (for beginners)
//!
//! The stream is split into a write sink and a read stream, each driven by
//! its own Tokio task:
//!
//! ```text
//!  send_key() ──► mpsc ──► [writer task] ──► sink ──► TV
//!                                                      │
//!  on_text()  ◄────────── [reader task] ◄── stream ◄───┘
//! ```
//!
//! Sending only pushes a string into an unbounded channel, so callers never
//! wait on the network.  The `connected` flag is cleared by whichever task
//! notices the socket died first, and by [`WsSession::close`].
//!
//! After `close` the writer gets [`CLOSE_GRACE`] to flush queued frames and
//! the close frame.  A TV that stops reading cannot keep it alive longer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{Connector, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a closed session's writer may keep flushing.
pub(crate) const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Opens a WebSocket to `url`.
///
/// TVs present self-signed certificates issued to no particular host name,
/// so `wss://` connections skip certificate and host name verification.
pub(crate) async fn dial(url: &str) -> Result<WsStream, String> {
    let connector = if url.starts_with("wss://") {
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|e| format!("TLS setup failed: {e}"))?;
        Some(Connector::NativeTls(tls))
    } else {
        None
    };
    let (stream, _response) =
        tokio_tungstenite::connect_async_tls_with_config(url, None, false, connector)
            .await
            .map_err(|e| e.to_string())?;
    Ok(stream)
}

pub(crate) struct WsSession {
    outbound: mpsc::UnboundedSender<String>,
    connected: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl WsSession {
    /// Starts the reader and writer tasks for an already-open stream.
    ///
    /// `on_text` runs on the reader task for every text frame.
    pub(crate) fn spawn<F>(stream: WsStream, label: String, mut on_text: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        let (mut sink, mut source) = stream.split();
        let (outbound, mut queue) = mpsc::unbounded_channel::<String>();
        let connected = Arc::new(AtomicBool::new(true));

        // ── Writer ────────────────────────────────────────────────────────────
        let alive = Arc::clone(&connected);
        let writer_label = label.clone();
        let writer = tokio::spawn(async move {
            while let Some(text) = queue.recv().await {
                if let Err(e) = sink.send(Message::Text(text)).await {
                    warn!("{writer_label}: send failed: {e}");
                    alive.store(false, Ordering::SeqCst);
                    return;
                }
            }
            // Every sender dropped: the session was closed locally.
            let shutdown = async {
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
            };
            if tokio::time::timeout(CLOSE_GRACE, shutdown).await.is_err() {
                warn!("{writer_label}: TV did not take the close frame");
            }
            debug!("{writer_label}: writer finished");
        });

        // ── Reader ────────────────────────────────────────────────────────────
        let alive = Arc::clone(&connected);
        let reader = tokio::spawn(async move {
            loop {
                match source.next().await {
                    Some(Ok(Message::Text(text))) => on_text(&text),
                    Some(Ok(Message::Close(frame))) => {
                        debug!("{label}: closed by TV: {frame:?}");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                        debug!("{label}: stream ended");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("{label}: socket error: {e}");
                        break;
                    }
                }
            }
            alive.store(false, Ordering::SeqCst);
        });

        Self {
            outbound,
            connected,
            reader,
            writer,
        }
    }

    /// Queues a text frame.  Returns `false` if the session is gone.
    pub(crate) fn send(&self, text: String) -> bool {
        self.is_open() && self.outbound.send(text).is_ok()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.writer.is_finished()
    }

    /// Sends a close frame (if the socket is still up) and stops both tasks.
    pub(crate) fn close(self) {
        self.connected.store(false, Ordering::SeqCst);
        // Dropping the only sender ends the writer loop, which then sends the
        // close frame on its own.
        drop(self.outbound);
        self.reader.abort();
        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(reap_writer(self.writer));
            }
            Err(_) => self.writer.abort(),
        }
    }
}

/// Waits up to [`CLOSE_GRACE`] for a closing writer, then aborts it.
/// Returns `true` if it finished on its own.
async fn reap_writer(mut writer: JoinHandle<()>) -> bool {
    if tokio::time::timeout(CLOSE_GRACE, &mut writer).await.is_ok() {
        return true;
    }
    writer.abort();
    false
}

// ── Tests ─────────────────────────────────────────────────────────────────────
