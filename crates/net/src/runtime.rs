//! Link runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP transport. The game
//! loop never blocks on the network: it drains whatever arrived since the
//! last frame with [`PeerLink::poll`] and queues outbound messages with
//! [`PeerLink::send`].
//!
//! A `PeerLink` owns its tokio runtime, so it must be created and dropped
//! outside of any async context.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::NetConfig;
use crate::protocol::Message;
use crate::transport::{run_client, run_host, LinkEvent, LinkShared, WireLog};

/// Which end of the connection this link is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Host,
    Client,
}

/// Running connection to the opponent.
pub struct PeerLink {
    role: LinkRole,
    local_addr: Option<SocketAddr>,
    shared: LinkShared,
    events_rx: mpsc::UnboundedReceiver<LinkEvent>,
    out_tx: mpsc::UnboundedSender<Message>,
    _rt: Runtime,
}

impl PeerLink {
    /// Bind a listener and wait for one opponent in the background.
    ///
    /// Bind errors are returned here; accept errors surface later as
    /// [`LinkEvent::Disconnected`].
    pub fn host(config: &NetConfig) -> anyhow::Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let addr = config.socket_addr()?;
        let listener = rt
            .block_on(TcpListener::bind(addr))
            .with_context(|| format!("bind {addr} failed"))?;
        let local_addr = listener.local_addr().context("listener address")?;

        let (shared, events_rx, out_tx, out_rx) = Self::channels(&rt, config);
        let task_shared = shared.clone();
        rt.spawn(async move {
            if let Err(e) = run_host(listener, task_shared.clone(), out_rx).await {
                warn!(error = %format!("{e:#}"), "host link ended with error");
            }
            task_shared.finish();
        });

        Ok(Self {
            role: LinkRole::Host,
            local_addr: Some(local_addr),
            shared,
            events_rx,
            out_tx,
            _rt: rt,
        })
    }

    /// Connect to a host in the background. Connection failures surface as
    /// [`LinkEvent::Disconnected`].
    pub fn connect(config: &NetConfig, addr: SocketAddr) -> anyhow::Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;

        let (shared, events_rx, out_tx, out_rx) = Self::channels(&rt, config);
        let task_shared = shared.clone();
        rt.spawn(async move {
            if let Err(e) = run_client(addr, task_shared.clone(), out_rx).await {
                warn!(error = %format!("{e:#}"), "client link ended with error");
            }
            task_shared.finish();
        });

        Ok(Self {
            role: LinkRole::Client,
            local_addr: None,
            shared,
            events_rx,
            out_tx,
            _rt: rt,
        })
    }

    #[allow(clippy::type_complexity)]
    fn channels(
        rt: &Runtime,
        config: &NetConfig,
    ) -> (
        LinkShared,
        mpsc::UnboundedReceiver<LinkEvent>,
        mpsc::UnboundedSender<Message>,
        mpsc::UnboundedReceiver<Message>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel::<LinkEvent>();
        let (out_tx, out_rx) = mpsc::unbounded_channel::<Message>();
        let mut shared = LinkShared::new(events_tx);
        shared.wire_log = config
            .wire_log_path
            .clone()
            .map(|path| WireLog::spawn(rt.handle(), path));
        (shared, events_rx, out_tx, out_rx)
    }

    pub fn role(&self) -> LinkRole {
        self.role
    }

    /// Address the host is listening on (useful with port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Next pending event, if any. Never blocks.
    pub fn try_recv(&mut self) -> Option<LinkEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Drain every event that arrived since the last call, in arrival order.
    pub fn poll(&mut self) -> Vec<LinkEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Queue a message for the peer. Dropped while not connected.
    pub fn send(&self, msg: Message) {
        if !self.is_connected() {
            debug!(line = %msg, "not connected, dropping outbound message");
            return;
        }
        let _ = self.out_tx.send(msg);
    }

    pub fn send_all(&self, msgs: impl IntoIterator<Item = Message>) {
        for msg in msgs {
            self.send(msg);
        }
    }
}
