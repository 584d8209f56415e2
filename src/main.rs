//! Terminal duel client (default binary).
//!
//! `tetris-duel host` waits for one opponent; `tetris-duel join <addr>`
//! connects to a host. Both then play side by side in raw mode. Logs go to
//! a file because the terminal is taken.

use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tetris_duel::cli::{parse_args, Mode};
use tetris_duel::input::{map_key, KeyCommand};
use tetris_duel::net::{resolve_peer, NetConfig, PeerLink};
use tetris_duel::screen::TerminalScreen;
use tetris_duel::session::{Role, Session, SessionConfig};
use tetris_duel::types::{GameAction, TICK_MS};
use tetris_duel::view;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    init_logging()?;

    let mut net = NetConfig::from_env();
    if let Some(port) = cli.port {
        net.port = port;
    }
    let config = SessionConfig::from_env();

    let (link, role) = match &cli.mode {
        Mode::Host => (PeerLink::host(&net)?, Role::Host),
        Mode::Join(addr) => {
            let addr = resolve_peer(addr, net.port)?;
            (PeerLink::connect(&net, addr)?, Role::Client)
        }
    };
    info!(?role, name = %config.player_name, "starting");

    let mut screen = TerminalScreen::new();
    screen.enter()?;

    let result = run(&mut screen, link, Session::new(role, config));

    // Always try to restore terminal state.
    let _ = screen.exit();
    info!("exiting");
    result
}

fn init_logging() -> Result<()> {
    let path = std::env::var("TETRIS_DUEL_LOG").unwrap_or_else(|_| "tetris-duel.log".to_string());
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {path}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(screen: &mut TerminalScreen, mut link: PeerLink, mut session: Session) -> Result<()> {
    let listen = link.local_addr().map(|a| a.to_string());
    let frame = Duration::from_millis(u64::from(TICK_MS));
    let mut last_frame = Instant::now();
    let mut pressed: Vec<GameAction> = Vec::new();

    loop {
        screen.draw(view::render(&session.snapshot(), listen.as_deref()))?;

        // Input with timeout until next frame.
        let timeout = frame
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match map_key(key) {
                    Some(KeyCommand::Quit) => return Ok(()),
                    Some(KeyCommand::Rematch) => {
                        if let Some(seed) = session.start_match() {
                            info!(seed, "rematch");
                        }
                    }
                    Some(KeyCommand::Action(action)) => pressed.push(action),
                    None => {}
                },
                Event::Resize(..) => screen.invalidate(),
                _ => {}
            }
        }

        if last_frame.elapsed() >= frame {
            let elapsed_ms = u32::try_from(last_frame.elapsed().as_millis()).unwrap_or(u32::MAX);
            last_frame = Instant::now();

            let outbound = session.frame(link.poll(), pressed.drain(..), elapsed_ms);
            link.send_all(outbound);
        }
    }
}
