//! Two sessions wired back to back, exchanging wire text each frame.

use tetris_duel::net::{LinkEvent, Message};
use tetris_duel::session::{Outcome, Phase, Role, Session, SessionConfig};
use tetris_duel::types::{GameAction, PlayerId, SPAWN_X};

struct Pair {
    host: Session,
    client: Session,
    to_host: Vec<LinkEvent>,
    to_client: Vec<LinkEvent>,
}

/// Through text, so every message takes the same path as over TCP.
fn wire(msgs: Vec<Message>) -> Vec<LinkEvent> {
    msgs.iter()
        .map(|m| LinkEvent::Message(Message::parse(&m.to_line())))
        .collect()
}

impl Pair {
    fn connected(seed: u32) -> Self {
        let host = Session::new(
            Role::Host,
            SessionConfig::default().with_name("Alice").with_seed(seed),
        );
        let client = Session::new(Role::Client, SessionConfig::default().with_name("Bob"));
        let peer = "127.0.0.1:7777".parse().unwrap();
        let mut pair = Self {
            host,
            client,
            to_host: vec![LinkEvent::Connected { peer }],
            to_client: vec![LinkEvent::Connected { peer }],
        };
        // connect, CLIENT_READY, GAME_START
        pair.frame(&[], &[], 0);
        pair.frame(&[], &[], 0);
        pair.frame(&[], &[], 0);
        pair
    }

    fn frame(&mut self, host_keys: &[GameAction], client_keys: &[GameAction], elapsed_ms: u32) {
        let from_host = self.host.frame(
            std::mem::take(&mut self.to_host),
            host_keys.iter().copied(),
            elapsed_ms,
        );
        let from_client = self.client.frame(
            std::mem::take(&mut self.to_client),
            client_keys.iter().copied(),
            elapsed_ms,
        );
        self.to_client.extend(wire(from_host));
        self.to_host.extend(wire(from_client));
    }

    /// Deliver whatever is in flight without new input or time.
    fn settle(&mut self) {
        self.frame(&[], &[], 0);
    }

    fn assert_mirrors_match(&self) {
        assert_mirror(&self.host, &self.client);
        assert_mirror(&self.client, &self.host);
    }
}

fn assert_mirror(player: &Session, observer: &Session) {
    let real = player.local().snapshot();
    let mirror = observer.remote().snapshot();
    assert_eq!(mirror.board, real.board);
    assert_eq!(mirror.current, real.current);
    assert_eq!(mirror.next, real.next);
    assert_eq!(mirror.score, real.score);
    assert_eq!(mirror.game_over, real.game_over);
}

#[test]
fn test_handshake_shares_seed_and_names() {
    let pair = Pair::connected(42);
    assert_eq!(pair.host.phase(), Phase::Active);
    assert_eq!(pair.client.phase(), Phase::Active);
    assert_eq!(pair.client.local().seed(), 42);
    assert_eq!(pair.host.peer_name(), "Bob");
    assert_eq!(pair.client.peer_name(), "Alice");
    assert_eq!(pair.host.local_id(), PlayerId::One);
    assert_eq!(pair.client.local_id(), PlayerId::Two);
    pair.assert_mirrors_match();
}

#[test]
fn test_move_left_reaches_the_mirror() {
    let mut pair = Pair::connected(42);
    pair.frame(&[GameAction::MoveLeft], &[], 0);
    pair.settle();

    assert_eq!(pair.host.local().current().x, SPAWN_X - 1);
    assert_eq!(pair.client.remote().current().x, SPAWN_X - 1);
    // the client's own piece did not move
    assert_eq!(pair.client.local().current().x, SPAWN_X);
    pair.assert_mirrors_match();
}

#[test]
fn test_mirrors_stay_in_step_through_locks_and_gravity() {
    let mut pair = Pair::connected(7);
    let script = [
        GameAction::MoveLeft,
        GameAction::RotateCw,
        GameAction::HardDrop,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::MoveLeft,
        GameAction::MoveLeft,
        GameAction::MoveLeft,
        GameAction::HardDrop,
    ];

    for (i, &action) in script.iter().enumerate() {
        let other = script[(i + 5) % script.len()];
        pair.frame(&[action], &[other], 250);
        pair.settle();
        pair.assert_mirrors_match();
    }

    for _ in 0..30 {
        pair.frame(&[], &[], 1000);
        pair.settle();
        pair.assert_mirrors_match();
    }
    assert!(pair.host.local().spawn_counter() > 3);
}

#[test]
fn test_both_dead_decides_winner_on_both_sides() {
    let mut pair = Pair::connected(9);

    // client scores nothing and tops out first
    for _ in 0..100 {
        if pair.client.is_dead(PlayerId::Two) {
            break;
        }
        pair.frame(&[], &[GameAction::HardDrop], 0);
        pair.settle();
    }
    assert!(pair.client.is_dead(PlayerId::Two));
    assert!(pair.host.is_dead(PlayerId::Two));
    assert_eq!(pair.host.phase(), Phase::OneDead);
    assert_eq!(pair.client.phase(), Phase::OneDead);

    for _ in 0..100 {
        if pair.host.is_dead(PlayerId::One) {
            break;
        }
        pair.frame(&[GameAction::HardDrop], &[], 0);
        pair.settle();
    }

    assert_eq!(pair.host.phase(), Phase::MatchOver);
    assert_eq!(pair.client.phase(), Phase::MatchOver);
    assert_eq!(pair.host.outcome(), pair.client.outcome());
    // neither side cleared a row
    assert_eq!(pair.host.outcome(), Some(Outcome::Tie));
}

#[test]
fn test_rematch_resets_both_sides() {
    let mut pair = Pair::connected(9);
    for _ in 0..3 {
        pair.frame(&[GameAction::HardDrop], &[GameAction::HardDrop], 0);
    }
    pair.settle();

    let seed = pair.host.start_match().expect("host can restart");
    assert_eq!(seed, 9);
    pair.settle();
    pair.settle();

    assert_eq!(pair.host.matches_started(), 2);
    assert_eq!(pair.client.matches_started(), 2);
    assert_eq!(pair.client.local().board().filled_count(), 0);
    assert_eq!(pair.host.remote().board().filled_count(), 0);
    pair.assert_mirrors_match();
}

#[test]
fn test_disconnect_is_observed_without_touching_local_state() {
    let mut pair = Pair::connected(42);
    pair.frame(&[GameAction::MoveRight], &[], 0);

    let before = pair.client.local().snapshot();
    pair.to_client.push(LinkEvent::Disconnected);
    pair.frame(&[], &[GameAction::MoveLeft], 5000);

    assert_eq!(pair.client.phase(), Phase::Disconnected);
    assert_eq!(pair.client.local().snapshot(), before);
    assert!(pair.to_host.is_empty());
}
