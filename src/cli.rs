//! Command-line arguments of the `tetris-duel` binary.

use anyhow::{anyhow, Result};

pub const USAGE: &str = "usage: tetris-duel host [--port <port>]\n       tetris-duel join <addr[:port]> [--port <port>]";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Listen for one opponent.
    Host,
    /// Connect to a host.
    Join(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub mode: Mode,
    /// Overrides `TETRIS_DUEL_PORT`.
    pub port: Option<u16>,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mode = match args.first().map(String::as_str) {
        Some("host") => Mode::Host,
        Some("join") => {
            let addr = args
                .get(1)
                .filter(|a| !a.starts_with("--"))
                .ok_or_else(|| anyhow!("join: missing host address\n{USAGE}"))?;
            Mode::Join(addr.clone())
        }
        Some(other) => return Err(anyhow!("unknown command: {other}\n{USAGE}")),
        None => return Err(anyhow!(USAGE)),
    };

    let mut port = None;
    let mut i = if mode == Mode::Host { 1 } else { 2 };
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --port"))?;
                port = Some(
                    v.parse::<u16>()
                        .map_err(|_| anyhow!("invalid --port value: {}", v))?,
                );
            }
            other => return Err(anyhow!("unknown argument: {other}\n{USAGE}")),
        }
        i += 1;
    }

    Ok(CliArgs { mode, port })
}
