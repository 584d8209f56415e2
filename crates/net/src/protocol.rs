//! Protocol module - line-oriented text messages exchanged between peers
//!
//! Every message is one line of UTF-8 text: a tag, optionally followed by
//! `;KEY:VALUE` fields. The transport appends the terminating `\n`.
//!
//! ```text
//! MOVE_LR;DIR:-1
//! ROTATE
//! MOVE_DOWN
//! GAME_START_HOST;SEED:12345;P1_NAME:Alice
//! SYNC_STATE;SCORE:300;NEXT:3;BOARD:0000...0011111111
//! PLAYER_DEAD;ID:2
//! CLIENT_READY;P2_NAME:Bob
//! ```
//!
//! The seed is a signed 32-bit int on the wire and a `u32` in memory; the
//! bits are reinterpreted, never clamped.
//!
//! Parsing never fails. Unrecognized tags and malformed payloads become
//! [`Message::Unknown`]; numeric fields that are missing or unparseable read
//! as `0`.

use std::fmt;

use tetris_duel_types::{Grid, PieceKind, BOARD_CELLS, BOARD_WIDTH, EMPTY_GRID, MAX_CELL, MAX_NAME_LEN};

pub const TAG_MOVE_LR: &str = "MOVE_LR";
pub const TAG_ROTATE: &str = "ROTATE";
pub const TAG_MOVE_DOWN: &str = "MOVE_DOWN";
pub const TAG_GAME_START: &str = "GAME_START_HOST";
pub const TAG_GAME_START_ALIAS: &str = "GAME_START";
pub const TAG_SYNC_STATE: &str = "SYNC_STATE";
pub const TAG_PLAYER_DEAD: &str = "PLAYER_DEAD";
pub const TAG_CLIENT_READY: &str = "CLIENT_READY";

const FIELD_SEP: char = ';';
const KV_SEP: char = ':';

/// Full-board snapshot carried by `SYNC_STATE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncState {
    pub score: u32,
    /// Next piece; `None` is sent as `0`.
    pub next: Option<PieceKind>,
    pub board: Grid,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            score: 0,
            next: None,
            board: EMPTY_GRID,
        }
    }
}

/// One peer-to-peer message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Message {
    /// Peer moved horizontally once (`dir` is -1 or 1).
    MoveLr { dir: i32 },
    /// Peer rotated once.
    Rotate,
    /// Peer took one forced downward step (gravity or soft drop).
    MoveDown,
    /// Host announces the shared seed and its name.
    GameStart { seed: u32, host_name: String },
    /// Sender's board, score and next piece after a lock.
    SyncState(Box<SyncState>),
    /// Player `id` (1 = host, 2 = client) reached game over.
    PlayerDead { id: u8 },
    /// Client announces itself to the host.
    ClientReady { name: String },
    /// Anything that did not parse.
    Unknown,
}

impl Message {
    pub fn move_lr(dir: i32) -> Self {
        Message::MoveLr { dir }
    }

    pub fn game_start(seed: u32, host_name: &str) -> Self {
        Message::GameStart {
            seed,
            host_name: sanitize_name(host_name),
        }
    }

    pub fn client_ready(name: &str) -> Self {
        Message::ClientReady {
            name: sanitize_name(name),
        }
    }

    pub fn sync_state(score: u32, next: Option<PieceKind>, board: Grid) -> Self {
        Message::SyncState(Box::new(SyncState { score, next, board }))
    }

    pub fn player_dead(id: u8) -> Self {
        Message::PlayerDead { id }
    }

    /// Wire tag of this message, `None` for [`Message::Unknown`].
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Message::MoveLr { .. } => Some(TAG_MOVE_LR),
            Message::Rotate => Some(TAG_ROTATE),
            Message::MoveDown => Some(TAG_MOVE_DOWN),
            Message::GameStart { .. } => Some(TAG_GAME_START),
            Message::SyncState(_) => Some(TAG_SYNC_STATE),
            Message::PlayerDead { .. } => Some(TAG_PLAYER_DEAD),
            Message::ClientReady { .. } => Some(TAG_CLIENT_READY),
            Message::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Message::Unknown)
    }

    /// Serialize to a single line (without the trailing `\n`).
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// Parse one line. Never fails; see the module docs for the tolerance rules.
    pub fn parse(line: &str) -> Message {
        let line = line.trim_end_matches(['\n', '\r']).trim();
        let mut parts = line.split(FIELD_SEP);
        let tag = parts.next().unwrap_or("").trim();
        let fields = Fields::new(parts);

        match tag {
            TAG_MOVE_LR => Message::MoveLr {
                dir: fields.int("DIR"),
            },
            TAG_ROTATE => Message::Rotate,
            TAG_MOVE_DOWN => Message::MoveDown,
            TAG_GAME_START | TAG_GAME_START_ALIAS => Message::GameStart {
                // Signed on the wire; same 32 bits either way
                seed: fields.int("SEED") as u32,
                host_name: fields.text("P1_NAME"),
            },
            TAG_SYNC_STATE => {
                let Some(board) = fields.get("BOARD").and_then(parse_board) else {
                    return Message::Unknown;
                };
                let next = u8::try_from(fields.uint("NEXT"))
                    .ok()
                    .and_then(PieceKind::from_id);
                Message::SyncState(Box::new(SyncState {
                    score: fields.uint("SCORE"),
                    next,
                    board,
                }))
            }
            TAG_PLAYER_DEAD => Message::PlayerDead {
                id: u8::try_from(fields.uint("ID")).unwrap_or(0),
            },
            TAG_CLIENT_READY => Message::ClientReady {
                name: fields.text("P2_NAME"),
            },
            _ => Message::Unknown,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::MoveLr { dir } => write!(f, "{TAG_MOVE_LR};DIR:{dir}"),
            Message::Rotate => f.write_str(TAG_ROTATE),
            Message::MoveDown => f.write_str(TAG_MOVE_DOWN),
            Message::GameStart { seed, host_name } => write!(
                f,
                "{TAG_GAME_START};SEED:{};P1_NAME:{}",
                *seed as i32,
                sanitize_name(host_name)
            ),
            Message::SyncState(state) => {
                write!(
                    f,
                    "{TAG_SYNC_STATE};SCORE:{};NEXT:{};BOARD:",
                    state.score,
                    state.next.map(PieceKind::id).unwrap_or(0)
                )?;
                for row in state.board.iter() {
                    for &cell in row.iter() {
                        // Cells are single digits by invariant
                        let digit = char::from(b'0' + cell.min(MAX_CELL));
                        fmt::Write::write_char(f, digit)?;
                    }
                }
                Ok(())
            }
            Message::PlayerDead { id } => write!(f, "{TAG_PLAYER_DEAD};ID:{id}"),
            Message::ClientReady { name } => {
                write!(f, "{TAG_CLIENT_READY};P2_NAME:{}", sanitize_name(name))
            }
            Message::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// Strip characters that would break framing or field splitting, and cap the
/// length at [`MAX_NAME_LEN`] characters.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\n' | '\r' | ';'))
        .take(MAX_NAME_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

/// `KEY:VALUE` fields following the tag, first occurrence wins.
struct Fields<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Fields<'a> {
    fn new(parts: impl Iterator<Item = &'a str>) -> Self {
        let pairs = parts
            .filter_map(|p| p.split_once(KV_SEP))
            .map(|(k, v)| (k.trim(), v))
            .collect();
        Self { pairs }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
    }

    fn int(&self, key: &str) -> i32 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn uint(&self, key: &str) -> u32 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    fn text(&self, key: &str) -> String {
        self.get(key).map(sanitize_name).unwrap_or_default()
    }
}

/// Exactly [`BOARD_CELLS`] digits in `0..=7`, row-major.
fn parse_board(digits: &str) -> Option<Grid> {
    let digits = digits.trim().as_bytes();
    if digits.len() != BOARD_CELLS {
        return None;
    }

    let mut grid = EMPTY_GRID;
    let width = BOARD_WIDTH as usize;
    for (i, &b) in digits.iter().enumerate() {
        let value = b.checked_sub(b'0')?;
        if value > MAX_CELL {
            return None;
        }
        grid[i / width][i % width] = value;
    }
    Some(grid)
}
