//! Match coordinator
//!
//! A [`Session`] owns two engines: the local player's, driven by key input
//! and gravity, and a mirror of the opponent's, driven only by messages
//! from the peer. It performs no I/O. The caller feeds it link events, input
//! and elapsed time, and drains the messages it wants sent.

use std::cmp::Ordering;

use tetris_duel_core::{fresh_seed, Engine, TickOutcome};
use tetris_duel_net::{LinkEvent, Message};
use tetris_duel_types::{GameAction, PlayerId, BOARD_HEIGHT};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::snapshot::MatchSnapshot;

/// Which side of the connection this session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Listens, picks the seed, plays as player 1.
    Host,
    /// Connects, receives the seed, plays as player 2.
    Client,
}

impl Role {
    pub fn player_id(self) -> PlayerId {
        match self {
            Role::Host => PlayerId::One,
            Role::Client => PlayerId::Two,
        }
    }
}

/// Match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No peer yet (host: waiting for `CLIENT_READY`; client: not connected).
    AwaitingPeer,
    /// Client is connected and announced itself; waiting for the seed.
    AwaitingSeed,
    /// Both players alive.
    Active,
    /// Exactly one player is dead; the other keeps playing.
    OneDead,
    /// Both dead, outcome decided.
    MatchOver,
    /// The link went down. Terminal for this session.
    Disconnected,
}

impl Phase {
    /// Whether engines are accepting input and peer actions.
    pub fn is_playing(self) -> bool {
        matches!(self, Phase::Active | Phase::OneDead)
    }
}

/// Result of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Winner(PlayerId),
    Tie,
}

impl Outcome {
    /// Strictly higher score wins; equal scores tie.
    pub fn from_scores(p1_score: u32, p2_score: u32) -> Self {
        match p1_score.cmp(&p2_score) {
            Ordering::Greater => Outcome::Winner(PlayerId::One),
            Ordering::Less => Outcome::Winner(PlayerId::Two),
            Ordering::Equal => Outcome::Tie,
        }
    }

    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(id) => Some(id),
            Outcome::Tie => None,
        }
    }
}

/// One side of a match.
///
/// The mirror's own game-over flag is display-only: the peer's death is
/// taken from its `PLAYER_DEAD`, which the ordered stream always delivers
/// after the `SYNC_STATE` that preceded it.
pub struct Session {
    role: Role,
    config: SessionConfig,
    phase: Phase,
    local: Engine,
    remote: Engine,
    peer_name: String,
    /// Host: the client has announced itself.
    peer_ready: bool,
    local_dead: bool,
    remote_dead: bool,
    outcome: Option<Outcome>,
    gravity_acc_ms: u32,
    matches_started: u32,
    outbox: Vec<Message>,
}

impl Session {
    pub fn new(role: Role, config: SessionConfig) -> Self {
        Self {
            role,
            config,
            phase: Phase::AwaitingPeer,
            local: Engine::new(0),
            remote: Engine::new(0),
            peer_name: String::new(),
            peer_ready: false,
            local_dead: false,
            remote_dead: false,
            outcome: None,
            gravity_acc_ms: 0,
            matches_started: 0,
            outbox: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Link events
    // ---------------------------------------------------------------------

    pub fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connected { peer } => {
                info!(%peer, role = ?self.role, "link up");
                self.on_connected();
            }
            LinkEvent::Message(msg) => self.handle_message(msg),
            LinkEvent::Disconnected => self.on_disconnected(),
        }
    }

    /// The transport reached the peer. The client announces itself.
    pub fn on_connected(&mut self) {
        if self.phase != Phase::AwaitingPeer {
            return;
        }
        if self.role == Role::Client {
            self.push(Message::client_ready(&self.config.player_name));
            self.phase = Phase::AwaitingSeed;
        }
    }

    /// Route one message from the peer.
    ///
    /// Gameplay messages only ever touch the mirrored engine, and only while
    /// a match is in progress.
    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            Message::ClientReady { name } => self.on_client_ready(name),
            Message::GameStart { seed, host_name } => self.on_game_start(seed, host_name),
            Message::Unknown => debug!("dropping unrecognized message"),
            other if !self.phase.is_playing() => {
                debug!(tag = ?other.tag(), phase = ?self.phase, "no match in progress, dropping");
            }
            Message::MoveLr { dir } => {
                // Direction only; the magnitude is always one column
                let dx = dir.signum() as i8;
                if dx != 0 {
                    self.remote.move_piece(dx, 0);
                }
            }
            Message::Rotate => {
                self.remote.rotate();
            }
            Message::MoveDown => {
                self.remote.tick();
            }
            Message::SyncState(state) => {
                self.remote
                    .apply_sync(&state.board, state.score, state.next);
            }
            Message::PlayerDead { id } => self.on_player_dead(id),
        }
    }

    /// The link closed. Stop relaying; local state is kept for display.
    pub fn on_disconnected(&mut self) {
        if self.phase == Phase::Disconnected {
            return;
        }
        warn!(phase = ?self.phase, "peer disconnected");
        self.phase = Phase::Disconnected;
        self.peer_ready = false;
        self.gravity_acc_ms = 0;
        self.outbox.clear();
    }

    fn on_client_ready(&mut self, name: String) {
        if self.role != Role::Host {
            warn!("CLIENT_READY received by a client, ignoring");
            return;
        }
        if self.phase == Phase::Disconnected {
            return;
        }
        info!(name = %name, "client ready");
        self.peer_name = name;
        self.peer_ready = true;
        if self.phase == Phase::AwaitingPeer {
            self.start_match();
        }
    }

    fn on_game_start(&mut self, seed: u32, host_name: String) {
        if self.role != Role::Client {
            warn!("GAME_START received by the host, ignoring");
            return;
        }
        if self.phase == Phase::Disconnected {
            return;
        }
        self.peer_name = host_name;
        self.peer_ready = true;
        self.begin(seed);
    }

    fn on_player_dead(&mut self, id: u8) {
        match PlayerId::from_id(id) {
            Some(player) if player == self.peer_id() => {
                if !self.remote_dead {
                    info!(id, score = self.remote.score(), "opponent is out");
                    self.remote_dead = true;
                    self.update_phase();
                }
            }
            Some(_) => debug!(id, "echo of our own death, ignoring"),
            None => warn!(id, "PLAYER_DEAD with invalid id"),
        }
    }

    // ---------------------------------------------------------------------
    // Match lifecycle
    // ---------------------------------------------------------------------

    /// Host only: pick a seed, reset both engines and announce the match.
    ///
    /// Also used for rematches. Returns the seed, or `None` when this
    /// session cannot start a match (client role, no peer, or disconnected).
    pub fn start_match(&mut self) -> Option<u32> {
        if self.role != Role::Host {
            debug!("only the host starts matches");
            return None;
        }
        if !self.peer_ready || self.phase == Phase::Disconnected {
            return None;
        }

        let seed = self.config.seed_override.unwrap_or_else(fresh_seed);
        self.begin(seed);
        self.push(Message::game_start(seed, &self.config.player_name));
        Some(seed)
    }

    fn begin(&mut self, seed: u32) {
        self.local.reset(Some(seed));
        self.remote.reset(Some(seed));
        self.local_dead = false;
        self.remote_dead = false;
        self.outcome = None;
        self.gravity_acc_ms = 0;
        self.matches_started += 1;
        self.phase = Phase::Active;
        info!(seed, role = ?self.role, peer = %self.peer_name, "match started");
    }

    fn update_phase(&mut self) {
        if !self.phase.is_playing() {
            return;
        }
        self.phase = match (self.local_dead, self.remote_dead) {
            (false, false) => Phase::Active,
            (true, true) => {
                let outcome = self.decide_outcome();
                info!(
                    ?outcome,
                    local = self.local.score(),
                    remote = self.remote.score(),
                    "match over"
                );
                self.outcome = Some(outcome);
                Phase::MatchOver
            }
            _ => Phase::OneDead,
        };
    }

    fn decide_outcome(&self) -> Outcome {
        let (p1, p2) = match self.role {
            Role::Host => (self.local.score(), self.remote.score()),
            Role::Client => (self.remote.score(), self.local.score()),
        };
        Outcome::from_scores(p1, p2)
    }

    // ---------------------------------------------------------------------
    // Local play
    // ---------------------------------------------------------------------

    /// Apply one local action and relay it if the engine accepted it.
    pub fn apply_input(&mut self, action: GameAction) -> bool {
        if !self.phase.is_playing() || self.local_dead {
            return false;
        }

        match action {
            GameAction::MoveLeft => self.shift(-1),
            GameAction::MoveRight => self.shift(1),
            GameAction::RotateCw => {
                if self.local.rotate() {
                    self.push(Message::Rotate);
                    true
                } else {
                    false
                }
            }
            GameAction::SoftDrop => self.step_down() != TickOutcome::Ignored,
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    fn shift(&mut self, dx: i8) -> bool {
        if self.local.move_piece(dx, 0) {
            self.push(Message::move_lr(i32::from(dx)));
            true
        } else {
            false
        }
    }

    fn hard_drop(&mut self) -> bool {
        // A piece can fall at most the board height before it locks
        for _ in 0..=BOARD_HEIGHT {
            match self.step_down() {
                TickOutcome::Fell => {}
                TickOutcome::Locked(_) => return true,
                TickOutcome::Ignored => return false,
            }
        }
        true
    }

    /// One forced downward step of the local piece, relayed as `MOVE_DOWN`.
    /// A lock is followed by a `SYNC_STATE`, and a lock that ends the game by
    /// `PLAYER_DEAD`.
    fn step_down(&mut self) -> TickOutcome {
        let outcome = self.local.tick();
        match &outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Fell => self.push(Message::MoveDown),
            TickOutcome::Locked(event) => {
                self.push(Message::MoveDown);
                debug!(
                    kind = ?event.kind,
                    lines = event.lines(),
                    score = self.local.score(),
                    "local lock"
                );
                self.push(Message::sync_state(
                    self.local.score(),
                    Some(self.local.next()),
                    self.local.board().grid(),
                ));
                if event.game_over {
                    self.on_local_dead();
                }
            }
        }
        outcome
    }

    fn on_local_dead(&mut self) {
        if self.local_dead {
            return;
        }
        self.local_dead = true;
        info!(score = self.local.score(), lines = self.local.lines(), "local player is out");
        self.push(Message::player_dead(self.local_id().id()));
        self.update_phase();
    }

    /// Advance the gravity timer, stepping the local piece once per elapsed
    /// interval.
    pub fn update(&mut self, elapsed_ms: u32) {
        if !self.phase.is_playing() || self.local_dead {
            self.gravity_acc_ms = 0;
            return;
        }

        let interval = self.config.gravity_ms.max(1);
        self.gravity_acc_ms = self.gravity_acc_ms.saturating_add(elapsed_ms);
        while self.gravity_acc_ms >= interval {
            self.gravity_acc_ms -= interval;
            self.step_down();
            if self.local_dead || !self.phase.is_playing() {
                self.gravity_acc_ms = 0;
                break;
            }
        }
    }

    /// One frame: network first, then local input, then gravity. Returns the
    /// messages to send.
    pub fn frame(
        &mut self,
        events: impl IntoIterator<Item = LinkEvent>,
        inputs: impl IntoIterator<Item = GameAction>,
        elapsed_ms: u32,
    ) -> Vec<Message> {
        for event in events {
            self.handle_event(event);
        }
        for action in inputs {
            self.apply_input(action);
        }
        self.update(elapsed_ms);
        self.drain_outbox()
    }

    fn push(&mut self, msg: Message) {
        if self.phase == Phase::Disconnected {
            debug!(tag = ?msg.tag(), "disconnected, not relaying");
            return;
        }
        self.outbox.push(msg);
    }

    /// Take every queued outbound message, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending(&self) -> &[Message] {
        &self.outbox
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn local_id(&self) -> PlayerId {
        self.role.player_id()
    }

    pub fn peer_id(&self) -> PlayerId {
        self.local_id().other()
    }

    pub fn local(&self) -> &Engine {
        &self.local
    }

    /// Mirror of the opponent's engine.
    pub fn remote(&self) -> &Engine {
        &self.remote
    }

    pub fn engine(&self, player: PlayerId) -> &Engine {
        if player == self.local_id() {
            &self.local
        } else {
            &self.remote
        }
    }

    pub fn is_dead(&self, player: PlayerId) -> bool {
        if player == self.local_id() {
            self.local_dead
        } else {
            self.remote_dead
        }
    }

    pub fn local_name(&self) -> &str {
        &self.config.player_name
    }

    pub fn peer_name(&self) -> &str {
        &self.peer_name
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn matches_started(&self) -> u32 {
        self.matches_started
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            role: self.role,
            phase: self.phase,
            local_id: self.local_id(),
            local: self.local.snapshot(),
            remote: self.remote.snapshot(),
            local_name: self.config.player_name.clone(),
            peer_name: self.peer_name.clone(),
            local_dead: self.local_dead,
            remote_dead: self.remote_dead,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_duel_types::SPAWN_X;

    fn host() -> Session {
        Session::new(Role::Host, SessionConfig::default().with_name("Alice").with_seed(42))
    }

    fn client() -> Session {
        Session::new(Role::Client, SessionConfig::default().with_name("Bob"))
    }

    fn started_host() -> Session {
        let mut s = host();
        s.handle_message(Message::client_ready("Bob"));
        s.drain_outbox();
        s
    }

    #[test]
    fn test_host_starts_on_client_ready() {
        let mut s = host();
        assert_eq!(s.phase(), Phase::AwaitingPeer);
        s.on_connected();
        assert!(s.pending().is_empty());

        s.handle_message(Message::client_ready("Bob"));
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.peer_name(), "Bob");
        assert_eq!(s.local().seed(), 42);
        assert_eq!(s.remote().seed(), 42);
        assert_eq!(s.drain_outbox(), vec![Message::game_start(42, "Alice")]);
    }

    #[test]
    fn test_client_announces_then_waits_for_seed() {
        let mut s = client();
        assert_eq!(s.start_match(), None);

        s.on_connected();
        assert_eq!(s.phase(), Phase::AwaitingSeed);
        assert_eq!(s.drain_outbox(), vec![Message::client_ready("Bob")]);

        s.handle_message(Message::game_start(77, "Alice"));
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.local().seed(), 77);
        assert_eq!(s.peer_name(), "Alice");
    }

    #[test]
    fn test_local_move_is_relayed_and_mirror_untouched() {
        let mut s = started_host();
        assert!(s.apply_input(GameAction::MoveLeft));
        assert_eq!(s.local().current().x, SPAWN_X - 1);
        assert_eq!(s.remote().current().x, SPAWN_X);
        assert_eq!(s.drain_outbox(), vec![Message::move_lr(-1)]);
    }

    #[test]
    fn test_rejected_move_is_not_relayed() {
        let mut s = started_host();
        let mut accepted = 0;
        for _ in 0..20 {
            if s.apply_input(GameAction::MoveLeft) {
                accepted += 1;
            }
        }
        assert!(accepted < 20);
        assert_eq!(s.drain_outbox().len(), accepted);
    }

    #[test]
    fn test_remote_actions_only_touch_mirror() {
        let mut s = started_host();
        s.handle_message(Message::move_lr(1));
        s.handle_message(Message::MoveDown);
        assert_eq!(s.remote().current().x, SPAWN_X + 1);
        assert_eq!(s.remote().current().y, 1);
        assert_eq!(s.local().current().x, SPAWN_X);
        assert_eq!(s.local().current().y, 0);
        assert!(s.pending().is_empty());
    }

    #[test]
    fn test_gameplay_before_start_is_dropped() {
        let mut s = client();
        s.on_connected();
        s.drain_outbox();
        s.handle_message(Message::move_lr(1));
        assert_eq!(s.remote().current().x, SPAWN_X);
        assert!(!s.apply_input(GameAction::MoveLeft));
        assert!(s.pending().is_empty());
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut s = started_host();
        s.update(999);
        assert_eq!(s.local().current().y, 0);
        s.update(1);
        assert_eq!(s.local().current().y, 1);
        s.update(2500);
        assert_eq!(s.local().current().y, 3);
        assert_eq!(s.drain_outbox(), vec![Message::MoveDown; 3]);
    }

    #[test]
    fn test_hard_drop_relays_steps_and_sync() {
        let mut s = started_host();
        assert!(s.apply_input(GameAction::HardDrop));
        let out = s.drain_outbox();
        assert!(matches!(out.last(), Some(Message::SyncState(_))));
        let downs = out.iter().filter(|m| **m == Message::MoveDown).count();
        assert_eq!(downs, out.len() - 1);
        assert_eq!(s.local().spawn_counter(), 2);
        assert_eq!(s.local().board().filled_count(), 4);
    }

    #[test]
    fn test_death_is_announced_once_and_match_ends() {
        let mut s = started_host();
        for _ in 0..100 {
            if s.is_dead(PlayerId::One) {
                break;
            }
            s.apply_input(GameAction::HardDrop);
        }
        assert!(s.is_dead(PlayerId::One));
        assert_eq!(s.phase(), Phase::OneDead);

        let out = s.drain_outbox();
        let deaths = out
            .iter()
            .filter(|m| **m == Message::player_dead(1))
            .count();
        assert_eq!(deaths, 1);

        assert!(!s.apply_input(GameAction::HardDrop));
        s.update(10_000);
        assert!(s.pending().is_empty());

        s.handle_message(Message::player_dead(1));
        assert_eq!(s.phase(), Phase::OneDead);

        s.handle_message(Message::sync_state(
            s.local().score() + 100,
            None,
            tetris_duel_types::EMPTY_GRID,
        ));
        s.handle_message(Message::player_dead(2));
        assert_eq!(s.phase(), Phase::MatchOver);
        assert_eq!(s.outcome(), Some(Outcome::Winner(PlayerId::Two)));
    }

    #[test]
    fn test_mirror_game_over_waits_for_player_dead() {
        let mut s = started_host();
        for _ in 0..2_000 {
            if s.remote().is_game_over() {
                break;
            }
            s.handle_message(Message::MoveDown);
        }
        assert!(s.remote().is_game_over());
        assert!(!s.is_dead(PlayerId::Two));
        assert_eq!(s.phase(), Phase::Active);

        s.handle_message(Message::player_dead(2));
        assert!(s.is_dead(PlayerId::Two));
        assert_eq!(s.phase(), Phase::OneDead);
    }

    #[test]
    fn test_disconnect_stops_relaying() {
        let mut s = started_host();
        s.apply_input(GameAction::MoveRight);
        s.on_disconnected();
        assert_eq!(s.phase(), Phase::Disconnected);
        assert!(s.pending().is_empty());

        let x = s.local().current().x;
        assert!(!s.apply_input(GameAction::MoveRight));
        assert_eq!(s.local().current().x, x);
        assert_eq!(s.start_match(), None);
    }

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(Outcome::from_scores(300, 100), Outcome::Winner(PlayerId::One));
        assert_eq!(Outcome::from_scores(0, 100), Outcome::Winner(PlayerId::Two));
        assert_eq!(Outcome::from_scores(500, 500), Outcome::Tie);
        assert_eq!(Outcome::Tie.winner(), None);
    }
}
