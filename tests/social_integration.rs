/// Integration tests for friends, the life companion and the social bonus.
mod common;

use chrono::Duration;
use common::{at, logged_in_game};
use petkeeper::game::{
    execute, CompanionKind, GameCommand, PetError, SocialEffects, SocialOutcome,
};

#[test]
fn friends_and_companion_flow() {
    let (game, _dir) = logged_in_game();
    let user = game.whoami().unwrap().unwrap();

    let broke = game.add_friend("dog", at(0)).unwrap().outcome;
    assert_eq!(broke, SocialOutcome::NotEnoughCoins { needed: 50, have: 0 });

    game.store().put_coins(&user.id, 300).unwrap();
    let added = game.add_friend("Puppy", at(1)).unwrap();
    let SocialOutcome::Done(dog) = added.outcome else {
        panic!("dog should be added");
    };
    assert_eq!(added.unlocked[0].id, "first_friend");

    let visit = game.interact(&dog.id, at(10)).unwrap().outcome;
    assert_eq!(
        visit,
        SocialOutcome::Done(SocialEffects {
            happiness: 8,
            energy: -3
        })
    );
    let status = game.status(at(11)).unwrap().outcome;
    assert_eq!((status.pet.happiness, status.pet.energy), (58, 47));
    // 300 - 50 + 20 reward + 5 visit
    assert_eq!(status.coins, 275);

    let too_soon = game.interact(&dog.id, at(20)).unwrap().outcome;
    assert_eq!(
        too_soon,
        SocialOutcome::OnCooldown {
            remaining: Duration::seconds(3590)
        }
    );

    let companion = game.set_companion("robot", at(30)).unwrap();
    assert!(matches!(companion.outcome, SocialOutcome::Done(ref c) if c.kind == CompanionKind::Robot));
    assert_eq!(companion.unlocked[0].id, "first_companion");

    let status = game.status(at(31)).unwrap().outcome;
    assert_eq!(status.effects, SocialEffects { happiness: 16, energy: 5 });
    assert_eq!(status.coins, 125);

    let view = game.friends(at(35)).unwrap().outcome;
    assert!(!view.can_visit);
    assert_eq!(view.next_visit_in, Duration::seconds(3575));
    let lines = execute(&game, &GameCommand::Friends, at(35)).unwrap();
    assert!(lines.iter().any(|l| l == "Next visit in 59m 35s."));
    let later = execute(&game, &GameCommand::Friends, at(3610)).unwrap();
    assert!(later.iter().any(|l| l == "Your pet can visit a friend now."));

    game.remove_friend(&dog.id, at(3620)).unwrap();
    let view = game.friends(at(3621)).unwrap().outcome;
    assert!(view.friends.is_empty());
    assert!(view.companion.is_some());

    assert_eq!(
        game.remove_companion(at(3622)).unwrap().outcome.map(|c| c.kind),
        Some(CompanionKind::Robot)
    );
    assert_eq!(game.status(at(3623)).unwrap().outcome.effects, SocialEffects::default());
}

#[test]
fn unknown_kinds_and_friends_are_errors() {
    let (game, _dir) = logged_in_game();
    assert!(matches!(game.add_friend("dragon", at(0)), Err(PetError::UnknownKind(_))));
    assert!(matches!(game.set_companion("knight", at(0)), Err(PetError::UnknownKind(_))));
    assert!(matches!(game.interact("nobody", at(0)), Err(PetError::FriendNotFound(_))));
}
