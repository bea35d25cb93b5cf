//! Test utilities & fixtures shared by the integration tests.

use argon2::Params;
use chrono::{DateTime, Utc};
use petkeeper::game::{Game, PetRules, PetStoreBuilder, PinHasher, SocialRules};
use tempfile::TempDir;

/// Fixed reference instant; tests add offsets in seconds.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).expect("valid timestamp")
}

/// Game over a throwaway store with cheap Argon2 parameters. Keep the
/// returned directory alive for the duration of the test.
pub fn setup_game() -> (Game, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = PetStoreBuilder::new(dir.path()).open().expect("store");
    let hasher = PinHasher::new(Params::new(8, 1, 1, None).ok());
    let game = Game::new(store, hasher, PetRules::default(), SocialRules::default());
    (game, dir)
}

/// Logged-in game for `alice` at `at(0)`.
#[allow(dead_code)]
pub fn logged_in_game() -> (Game, TempDir) {
    let (game, dir) = setup_game();
    game.login("alice", "1234", at(0)).expect("login");
    (game, dir)
}
