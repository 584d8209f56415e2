//! TCP transport for a single peer connection
//!
//! One task per link reads `\n`-framed lines from the socket, parses them
//! into [`Message`]s and forwards them as [`LinkEvent`]s, while writing
//! outbound messages in the order they were queued. Uses tokio for async
//! networking.
//!
//! The host accepts exactly one peer and then closes its listener.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::Message;

/// Something the game loop needs to know about the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Connected { peer: SocketAddr },
    Message(Message),
    /// The connection closed, failed, or could not be established.
    /// No further events follow.
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Serialize)]
struct WireRecord {
    dir: WireDirection,
    ts: u64,
    line: String,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Appends every wire line to a file as one JSON object per line.
#[derive(Debug, Clone)]
pub struct WireLog {
    tx: mpsc::UnboundedSender<WireRecord>,
}

impl WireLog {
    /// Spawn the writer task on `handle`. Open failures disable the log.
    pub fn spawn(handle: &Handle, path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
        handle.spawn(async move {
            use tokio::fs::OpenOptions;

            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot open wire log");
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(512);
            while let Some(rec) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &rec).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });
        Self { tx }
    }

    pub fn record(&self, dir: WireDirection, line: &str) {
        let _ = self.tx.send(WireRecord {
            dir,
            ts: now_ms(),
            line: line.to_string(),
        });
    }
}

/// Channels shared between a link task and its owner.
#[derive(Debug, Clone)]
pub struct LinkShared {
    pub events: mpsc::UnboundedSender<LinkEvent>,
    pub connected: Arc<AtomicBool>,
    pub wire_log: Option<WireLog>,
}

impl LinkShared {
    pub fn new(events: mpsc::UnboundedSender<LinkEvent>) -> Self {
        Self {
            events,
            connected: Arc::new(AtomicBool::new(false)),
            wire_log: None,
        }
    }

    fn log(&self, dir: WireDirection, line: &str) {
        if let Some(log) = self.wire_log.as_ref() {
            log.record(dir, line);
        }
    }

    /// Mark the link down and tell the owner. Called exactly once per link.
    pub fn finish(&self) {
        self.connected.store(false, Ordering::SeqCst);
        let _ = self.events.send(LinkEvent::Disconnected);
    }
}

/// Accept one peer on `listener` and serve it until either side closes.
pub async fn run_host(
    listener: TcpListener,
    shared: LinkShared,
    outbound: mpsc::UnboundedReceiver<Message>,
) -> anyhow::Result<()> {
    info!(addr = ?listener.local_addr().ok(), "waiting for peer");
    let (socket, peer) = listener.accept().await.context("accept failed")?;
    // One opponent per match
    drop(listener);
    serve(socket, peer, shared, outbound).await
}

/// Connect to a host and serve the connection until either side closes.
pub async fn run_client(
    addr: SocketAddr,
    shared: LinkShared,
    outbound: mpsc::UnboundedReceiver<Message>,
) -> anyhow::Result<()> {
    info!(%addr, "connecting to host");
    let socket = TcpStream::connect(addr)
        .await
        .with_context(|| format!("connect to {addr} failed"))?;
    serve(socket, addr, shared, outbound).await
}

/// Pump lines in both directions over an established connection.
async fn serve(
    socket: TcpStream,
    peer: SocketAddr,
    shared: LinkShared,
    mut outbound: mpsc::UnboundedReceiver<Message>,
) -> anyhow::Result<()> {
    socket.set_nodelay(true).context("set TCP_NODELAY")?;
    info!(%peer, "peer connected");
    shared.connected.store(true, Ordering::SeqCst);
    let _ = shared.events.send(LinkEvent::Connected { peer });

    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    let result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        shared.log(WireDirection::In, trimmed);

                        let msg = Message::parse(trimmed);
                        if msg.is_unknown() {
                            warn!(%peer, line = trimmed, "unrecognized message");
                        } else {
                            debug!(%peer, line = trimmed, "recv");
                        }
                        if shared.events.send(LinkEvent::Message(msg)).is_err() {
                            // Owner is gone
                            break Ok(());
                        }
                    }
                }
                Ok(None) => {
                    info!(%peer, "peer closed the connection");
                    break Ok(());
                }
                Err(e) => break Err(anyhow::Error::new(e).context("read failed")),
            },
            out = outbound.recv() => match out {
                Some(msg) => {
                    let mut line = msg.to_line();
                    shared.log(WireDirection::Out, &line);
                    debug!(%peer, line = %line, "send");
                    line.push('\n');
                    if let Err(e) = writer.write_all(line.as_bytes()).await {
                        break Err(anyhow::Error::new(e).context("write failed"));
                    }
                }
                None => {
                    debug!(%peer, "link closed locally");
                    break Ok(());
                }
            },
        }
    };

    let _ = writer.shutdown().await;
    result
}
