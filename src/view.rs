//! Text view of a match: both boards side by side.
//!
//! Pure (no I/O), so it can be unit-tested.

use tetris_duel_core::EngineSnapshot;
use tetris_duel_session::{MatchSnapshot, Outcome, Phase, Role};
use tetris_duel_types::{PlayerId, BOARD_HEIGHT, BOARD_WIDTH};

const EMPTY: &str = " .";
const BLOCK: &str = "[]";
const GHOST: &str = "::";
const GAP: &str = "    ";

/// Inner board width in terminal columns.
const BOARD_COLS: usize = BOARD_WIDTH as usize * 2;

/// Render a whole frame. `listen` is shown while the host waits.
pub fn render(snapshot: &MatchSnapshot, listen: Option<&str>) -> Vec<String> {
    let left = player_column(snapshot, PlayerId::One);
    let right = player_column(snapshot, PlayerId::Two);

    let mut lines: Vec<String> = left
        .into_iter()
        .zip(right)
        .map(|(l, r)| format!("{l}{GAP}{r}"))
        .collect();

    lines.push(String::new());
    lines.push(status_line(snapshot, listen));
    lines.push(help_line(snapshot));
    lines
}

fn player_column(snapshot: &MatchSnapshot, id: PlayerId) -> Vec<String> {
    let engine = snapshot.player(id);
    let name = match snapshot.name(id) {
        "" => "?",
        name => name,
    };
    let you = if id == snapshot.local_id { " *" } else { "" };
    let width = BOARD_COLS + 2;

    let mut lines = Vec::with_capacity(BOARD_HEIGHT as usize + 4);
    lines.push(fit(&format!("P{} {name}{you}", id.id()), width));
    lines.push(fit(&format!("score {}  lines {}", engine.score, engine.lines), width));

    let border = format!("+{}+", "-".repeat(BOARD_COLS));
    lines.push(border.clone());
    let dead = snapshot.is_dead(id);
    for row in board_rows(engine, dead) {
        lines.push(format!("|{row}|"));
    }
    lines.push(border);

    let next = if dead {
        "OUT".to_string()
    } else {
        format!("next {}", engine.next.as_str())
    };
    lines.push(fit(&next, width));
    lines
}

/// Board cells with the falling piece and its landing shadow drawn in.
fn board_rows(engine: &EngineSnapshot, dead: bool) -> Vec<String> {
    let w = BOARD_WIDTH as usize;
    let h = BOARD_HEIGHT as usize;
    let mut cells = vec![EMPTY; w * h];

    for (y, row) in engine.board.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            if cell != 0 {
                cells[y * w + x] = BLOCK;
            }
        }
    }

    if !dead && !engine.game_over {
        let mut paint = |x: i8, y: i8, glyph: &'static str| {
            if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                let i = y as usize * w + x as usize;
                if cells[i] == EMPTY {
                    cells[i] = glyph;
                }
            }
        };

        let current = engine.current;
        if let Some(ghost_y) = engine.ghost_y {
            let dy = ghost_y - current.y;
            for (x, y) in current.blocks() {
                paint(x, y + dy, GHOST);
            }
        }
        for (x, y) in current.blocks() {
            paint(x, y, BLOCK);
        }
    }

    cells.chunks(w).map(|row| row.concat()).collect()
}

fn status_line(snapshot: &MatchSnapshot, listen: Option<&str>) -> String {
    match snapshot.phase {
        Phase::AwaitingPeer => match (snapshot.role, listen) {
            (Role::Host, Some(addr)) => format!("waiting for an opponent on {addr}"),
            (Role::Host, None) => "waiting for an opponent".to_string(),
            (Role::Client, _) => "connecting...".to_string(),
        },
        Phase::AwaitingSeed => "waiting for the host to start".to_string(),
        Phase::Active => "playing".to_string(),
        Phase::OneDead if snapshot.local_dead => "you are out, opponent still playing".to_string(),
        Phase::OneDead => "opponent is out, keep going".to_string(),
        Phase::MatchOver => match snapshot.outcome {
            Some(Outcome::Winner(id)) if id == snapshot.local_id => "you win!".to_string(),
            Some(Outcome::Winner(_)) => "you lose".to_string(),
            Some(Outcome::Tie) | None => "tie".to_string(),
        },
        Phase::Disconnected => "connection lost".to_string(),
    }
}

fn help_line(snapshot: &MatchSnapshot) -> String {
    match (snapshot.phase, snapshot.role) {
        (Phase::MatchOver, Role::Host) => "r rematch  q quit".to_string(),
        (Phase::Active | Phase::OneDead, _) => {
            "<- -> move  up rotate  down soft drop  space hard drop  q quit".to_string()
        }
        _ => "q quit".to_string(),
    }
}

fn fit(text: &str, width: usize) -> String {
    let mut s: String = text.chars().take(width).collect();
    let len = s.chars().count();
    s.extend(std::iter::repeat(' ').take(width - len));
    s
}
