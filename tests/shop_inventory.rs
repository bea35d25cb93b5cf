/// Integration tests for the wallet, shop purchases and using items on the pet.
mod common;

use common::{at, logged_in_game, setup_game};
use petkeeper::game::{execute, ActionRefused, BuyOutcome, EatOutcome, GameCommand, PetError};

#[test]
fn buying_needs_enough_coins() {
    let (game, _dir) = logged_in_game();
    let user = game.whoami().unwrap().unwrap();

    let refused = game.buy("apple", 1, at(0)).unwrap().outcome;
    assert_eq!(refused, BuyOutcome::NotEnoughCoins { needed: 5, have: 0 });

    game.store().put_coins(&user.id, 100).unwrap();
    match game.buy("Super Food", 2, at(1)).unwrap().outcome {
        BuyOutcome::Bought {
            item,
            qty,
            coins_left,
        } => {
            assert_eq!(item.id, "super_food");
            assert_eq!(qty, 2);
            assert_eq!(coins_left, 50);
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let inventory = game.inventory(at(2)).unwrap().outcome;
    assert_eq!(inventory.quantity("super_food"), 2);
    assert_eq!(inventory.coins, 50);
}

#[test]
fn eating_food_counts_as_feeding() {
    let (game, _dir) = logged_in_game();

    let turn = game.eat("apple", at(0)).unwrap();
    assert!(matches!(turn.outcome, EatOutcome::Ate(item) if item.id == "apple"));
    assert_eq!(turn.unlocked.iter().map(|a| a.id).collect::<Vec<_>>(), vec!["first_feed"]);

    let status = game.status(at(1)).unwrap().outcome;
    assert_eq!(
        (status.pet.hunger, status.pet.energy, status.pet.happiness),
        (65, 50, 55)
    );

    let none_left = game.eat("apple", at(2)).unwrap().outcome;
    assert!(matches!(none_left, EatOutcome::NotOwned(item) if item.id == "apple"));

    // The feed cooldown is untouched by eating.
    assert_eq!(game.feed(at(3)).unwrap().outcome, Ok(()));
}

#[test]
fn medicine_does_not_count_as_feeding() {
    let (game, _dir) = logged_in_game();
    let user = game.whoami().unwrap().unwrap();
    game.store().put_coins(&user.id, 12).unwrap();
    game.buy("energy-drink", 1, at(0)).unwrap();

    let turn = game.eat("energy_drink", at(1)).unwrap();
    assert!(matches!(turn.outcome, EatOutcome::Ate(_)));
    assert!(turn.unlocked.is_empty());
    assert_eq!(game.status(at(2)).unwrap().outcome.pet.energy, 70);
}

#[test]
fn unknown_items_are_reported() {
    let (game, _dir) = logged_in_game();
    assert!(matches!(
        game.buy("brick", 1, at(0)),
        Err(PetError::UnknownItem(id)) if id == "brick"
    ));
    let lines = execute(&game, &GameCommand::Eat("brick".into()), at(0)).unwrap();
    assert_eq!(lines, vec!["Unknown item: brick".to_string()]);
}

#[test]
fn commands_require_login() {
    let (game, _dir) = setup_game();
    assert!(matches!(game.feed(at(0)), Err(PetError::NotLoggedIn)));
    let lines = execute(&game, &GameCommand::Shop, at(0)).unwrap();
    assert!(lines[0].starts_with("Not logged in"));
}

#[test]
fn shop_listing_shows_prices_and_balance() {
    let (game, _dir) = logged_in_game();
    let lines = execute(&game, &GameCommand::Shop, at(0)).unwrap();
    assert!(lines[0].contains("0 coins"));
    assert!(lines.iter().any(|l| l.contains("Miracle Cure")));
    assert!(lines.iter().any(|l| l == "-- Medicine --"));
}

#[test]
fn sleeping_pet_cannot_eat() {
    let (game, _dir) = logged_in_game();
    game.sleep(at(0)).unwrap();

    let turn = game.eat("apple", at(5)).unwrap();
    assert_eq!(turn.outcome, EatOutcome::Refused(ActionRefused::Sleeping));
    assert!(turn.unlocked.is_empty());
    assert_eq!(game.inventory(at(6)).unwrap().outcome.quantity("apple"), 1);

    let lines = execute(&game, &GameCommand::Eat("orange".into()), at(7)).unwrap();
    assert!(lines.iter().any(|l| l.contains("sleeping")));

    // Awake again after the nap.
    assert!(matches!(game.eat("apple", at(40)).unwrap().outcome, EatOutcome::Ate(_)));
}
