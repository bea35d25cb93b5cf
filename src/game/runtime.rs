//! Interactive loop driving the pet's timers.
//!
//! A single task selects over the decay-check interval, the wake-up
//! deadline of a sleeping pet, user input lines and Ctrl-C. Timers live only
//! as long as the loop; on the next start the store's timestamps are settled.

use chrono::Utc;
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Duration, Instant};

use crate::game::commands::{execute, parse_command, settle_lines, GameCommand};
use crate::game::errors::PetError;
use crate::game::session::{Game, SettleReport};

/// Settle timers for the logged-in user, if any. Returns the lines to show.
fn settle_now(game: &Game) -> Vec<String> {
    timer_lines(game.settle(Utc::now()))
}

/// Storage failures during a timer tick are reported and the loop keeps going.
fn timer_lines(result: Result<SettleReport, PetError>) -> Vec<String> {
    match result {
        Ok(report) => settle_lines(&report),
        Err(PetError::NotLoggedIn) => Vec::new(),
        Err(e) => {
            warn!("timer settle failed: {}", e);
            vec![format!("Error: {}", e)]
        }
    }
}

/// Tokio deadline for the pet's wake-up, if it is sleeping.
fn wake_instant(game: &Game) -> Option<Instant> {
    let at = match game.wake_deadline() {
        Ok(at) => at?,
        Err(e) => {
            warn!("could not read wake deadline: {}", e);
            return None;
        }
    };
    let left = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
    Some(Instant::now() + left)
}

/// Run the read-eval loop until `quit`, end of input or Ctrl-C.
///
/// Every output line is handed to `emit`.
pub async fn run_interactive<R>(
    game: &Game,
    input: R,
    mut emit: impl FnMut(&str),
) -> Result<(), PetError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let check_every = Duration::from_secs(game.pet_rules().decay_check_secs.max(1));
    let mut decay_check = tokio::time::interval(check_every);
    decay_check.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut wake_at = wake_instant(game);

    emit("Type 'help' for commands, 'quit' to leave.");
    info!("interactive loop started");

    loop {
        let wake = wake_at;
        tokio::select! {
            _ = decay_check.tick() => {
                for line in settle_now(game) {
                    emit(&line);
                }
            }

            _ = async move {
                match wake {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            } => {
                debug!("wake timer fired");
                wake_at = None;
                for line in settle_now(game) {
                    emit(&line);
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("input closed");
                    break;
                };
                let command = parse_command(&line);
                if command == GameCommand::Quit {
                    break;
                }
                match execute(game, &command, Utc::now()) {
                    Ok(output) => {
                        for out in output {
                            emit(&out);
                        }
                    }
                    Err(e) => {
                        warn!("command failed: {}", e);
                        emit(&format!("Error: {}", e));
                    }
                }
                wake_at = wake_instant(game);
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    emit("Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::auth::PinHasher;
    use crate::game::storage::PetStoreBuilder;
    use crate::game::types::{PetRules, SocialRules};
    use argon2::Params;
    use tempfile::TempDir;

    fn setup_game() -> (Game, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = PetStoreBuilder::new(dir.path()).open().expect("store");
        let hasher = PinHasher::new(Params::new(8, 1, 1, None).ok());
        let game = Game::new(store, hasher, PetRules::default(), SocialRules::default());
        (game, dir)
    }

    #[tokio::test]
    async fn scripted_session_runs_to_quit() {
        let (game, _dir) = setup_game();
        let script: &[u8] = b"status\nlogin alice 1234\nfeed\nfeed\nquit\nstatus\n";
        let mut out = Vec::new();
        run_interactive(&game, script, |line| out.push(line.to_string()))
            .await
            .unwrap();

        assert!(out.iter().any(|l| l.starts_with("Not logged in")));
        assert!(out.iter().any(|l| l == "Welcome, alice!"));
        assert!(out.iter().any(|l| l == "You fed your pet. Yum!"));
        assert!(out.iter().any(|l| l.starts_with("Feed is on cooldown")));
        assert!(out.iter().any(|l| l.starts_with("Achievement unlocked: ")));
        assert_eq!(out.last().map(String::as_str), Some("Bye!"));

        let pet = game
            .store()
            .get_pet(&game.whoami().unwrap().unwrap().id)
            .unwrap()
            .unwrap();
        assert_eq!(pet.hunger, 70);
    }

    #[test]
    fn timer_errors_become_output_lines() {
        let failed = timer_lines(Err(PetError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk gone",
        ))));
        assert_eq!(failed.len(), 1);
        assert!(failed[0].starts_with("Error: "));
        assert!(failed[0].contains("disk gone"));

        assert!(timer_lines(Err(PetError::NotLoggedIn)).is_empty());
        let woke = SettleReport {
            woke: true,
            decayed: false,
            died: false,
        };
        assert_eq!(timer_lines(Ok(woke)), vec!["Your pet woke up refreshed.".to_string()]);
    }

    #[tokio::test]
    async fn end_of_input_stops_the_loop() {
        let (game, _dir) = setup_game();
        let mut out = Vec::new();
        run_interactive(&game, &b""[..], |line| out.push(line.to_string()))
            .await
            .unwrap();
        assert_eq!(out.last().map(String::as_str), Some("Bye!"));
    }
}
