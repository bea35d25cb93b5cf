/// Integration tests for the pet stat state machine driven through the game facade.
/// Covers cooldowns, sleep and wake, decay, death and the click game.
mod common;

use chrono::Duration;
use common::{at, logged_in_game};
use petkeeper::game::{ActionRefused, Mood, PetRecord};

#[test]
fn feed_play_sleep_and_wake() {
    let (game, _dir) = logged_in_game();

    let fed = game.feed(at(0)).unwrap();
    assert_eq!(fed.outcome, Ok(()));
    assert_eq!(fed.unlocked.iter().map(|a| a.id).collect::<Vec<_>>(), vec!["first_feed"]);

    let again = game.feed(at(30)).unwrap();
    assert_eq!(
        again.outcome,
        Err(ActionRefused::OnCooldown {
            action: "feed",
            remaining: Duration::seconds(30)
        })
    );
    assert!(again.unlocked.is_empty());

    let played = game.play(25, at(1)).unwrap();
    assert_eq!(played.outcome, Ok(2));
    assert_eq!(played.unlocked[0].id, "first_play");

    let slept = game.sleep(at(2)).unwrap();
    assert_eq!(slept.outcome, Ok(()));
    assert_eq!(game.feed(at(20)).unwrap().outcome, Err(ActionRefused::Sleeping));
    assert_eq!(game.play(0, at(20)).unwrap().outcome, Err(ActionRefused::Sleeping));

    let status = game.status(at(40)).unwrap();
    assert!(status.settle.woke);
    let pet = &status.outcome.pet;
    assert_eq!((pet.hunger, pet.energy, pet.happiness), (70, 65, 65));
    assert!(!pet.sleeping);
    assert_eq!(status.outcome.mood, Mood::Happy);
    // 10 + 2 + 10 + 10 from rewards and the click game
    assert_eq!(status.outcome.coins, 32);
}

#[test]
fn decay_applies_one_step_per_check() {
    let (game, _dir) = logged_in_game();

    let early = game.status(at(119)).unwrap();
    assert!(!early.settle.decayed);

    let late = game.status(at(1_000)).unwrap();
    assert!(late.settle.decayed);
    let pet = &late.outcome.pet;
    assert_eq!((pet.hunger, pet.energy, pet.happiness), (45, 45, 45));

    let soon_after = game.status(at(1_060)).unwrap();
    assert!(!soon_after.settle.decayed);
    assert_eq!(soon_after.outcome.pet.hunger, 45);
}

#[test]
fn pet_sleeping_across_restarts_wakes_on_next_load() {
    let (game, _dir) = logged_in_game();
    game.sleep(at(0)).unwrap();
    assert!(game.wake_deadline().unwrap().is_some());

    let settle = game.settle(at(45)).unwrap();
    assert!(settle.woke);
    assert!(game.wake_deadline().unwrap().is_none());
}

#[test]
fn death_resets_pet_and_inventory() {
    let (game, _dir) = logged_in_game();
    let user = game.whoami().unwrap().unwrap();

    let mut pet = PetRecord::new(at(0));
    pet.hunger = 3;
    game.store().put_pet(&user.id, &pet).unwrap();
    game.store().put_coins(&user.id, 77).unwrap();

    let status = game.status(at(130)).unwrap();
    assert!(status.settle.died);
    let pet = &status.outcome.pet;
    assert_eq!((pet.hunger, pet.energy, pet.happiness), (50, 50, 50));
    assert_eq!(pet.last_tick, at(130));
    assert_eq!(status.outcome.coins, 0);

    let inventory = game.inventory(at(131)).unwrap().outcome;
    assert_eq!(inventory.quantity("apple"), 1);
    assert_eq!(inventory.coins, 0);
}

#[test]
fn out_of_range_stats_are_clamped_on_load() {
    let (game, _dir) = logged_in_game();
    let user = game.whoami().unwrap().unwrap();
    game.store()
        .set_item(
            &format!("mv:pet:{}", user.id),
            r#"{"hunger":250,"energy":80,"happiness":100,"sleeping":false,
                "lastTick":1700000000000,"cooldowns":{"feed":0,"play":0,"sleep":0}}"#,
        )
        .unwrap();
    let status = game.status(at(5)).unwrap();
    assert_eq!(status.outcome.pet.hunger, 100);
}

#[test]
fn action_that_kills_the_pet_resets_in_the_same_turn() {
    let (game, _dir) = logged_in_game();
    let user = game.whoami().unwrap().unwrap();

    let mut pet = PetRecord::new(at(0));
    pet.energy = 10;
    game.store().put_pet(&user.id, &pet).unwrap();
    game.store().put_coins(&user.id, 40).unwrap();

    let played = game.play(25, at(1)).unwrap();
    assert_eq!(played.outcome, Ok(2));
    assert!(played.settle.died);

    let status = game.status(at(2)).unwrap();
    assert!(!status.settle.died);
    let pet = &status.outcome.pet;
    assert_eq!((pet.hunger, pet.energy, pet.happiness), (50, 50, 50));
    assert_eq!(pet.cooldowns, PetRecord::new(at(0)).cooldowns);
    assert_eq!(status.outcome.coins, 0);

    let inventory = game.inventory(at(3)).unwrap().outcome;
    assert_eq!(inventory.quantity("apple"), 1);
}
