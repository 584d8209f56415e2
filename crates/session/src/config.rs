//! Session configuration read from the environment.

use tetris_duel_net::sanitize_name;
use tetris_duel_types::GRAVITY_MS;

/// Per-player match settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name announced to the peer.
    pub player_name: String,
    /// Interval between gravity steps of the local piece.
    pub gravity_ms: u32,
    /// Host only: use this seed instead of a fresh one.
    pub seed_override: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            gravity_ms: GRAVITY_MS,
            seed_override: None,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    ///
    /// - `TETRIS_DUEL_NAME`: display name (default `Player`)
    /// - `TETRIS_DUEL_GRAVITY_MS`: gravity interval (default 1000, minimum 1)
    /// - `TETRIS_DUEL_SEED`: fixed match seed when hosting
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let player_name = env::var("TETRIS_DUEL_NAME")
            .ok()
            .map(|s| sanitize_name(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.player_name);

        let gravity_ms = env::var("TETRIS_DUEL_GRAVITY_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .map(|ms| ms.max(1))
            .unwrap_or(defaults.gravity_ms);

        let seed_override = env::var("TETRIS_DUEL_SEED")
            .ok()
            .and_then(|s| parse_seed(&s));

        Self {
            player_name,
            gravity_ms,
            seed_override,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.player_name = sanitize_name(name);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed_override = Some(seed);
        self
    }

    pub fn with_gravity_ms(mut self, ms: u32) -> Self {
        self.gravity_ms = ms.max(1);
        self
    }
}

/// Seeds may be given as any 32-bit int, signed or not.
fn parse_seed(s: &str) -> Option<u32> {
    let s = s.trim();
    s.parse::<u32>()
        .ok()
        .or_else(|| s.parse::<i32>().ok().map(|v| v as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_sanitize_and_clamp() {
        let config = SessionConfig::default()
            .with_name("A;B\n")
            .with_gravity_ms(0)
            .with_seed(42);
        assert_eq!(config.player_name, "AB");
        assert_eq!(config.gravity_ms, 1);
        assert_eq!(config.seed_override, Some(42));
    }

    #[test]
    fn test_parse_seed_accepts_signed_ints() {
        assert_eq!(parse_seed(" 7 "), Some(7));
        assert_eq!(parse_seed("-5"), Some(-5i32 as u32));
        assert_eq!(parse_seed("4294967295"), Some(u32::MAX));
        assert_eq!(parse_seed("seed"), None);
    }
}
