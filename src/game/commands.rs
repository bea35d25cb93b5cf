//! Text command parsing and execution.
//!
//! Both the one-shot CLI subcommands and the interactive loop resolve to a
//! [`GameCommand`], run it against the [`Game`] facade and print the
//! returned lines.

use chrono::{DateTime, Duration, Utc};

use crate::game::achievement::format_achievements;
use crate::game::catalog::AchievementDef;
use crate::game::errors::PetError;
use crate::game::inventory::{format_inventory, format_shop};
use crate::game::session::{BuyOutcome, EatOutcome, Game, SettleReport, StatusView, Turn};
use crate::game::social::{format_companion, format_friends, SocialOutcome};
use crate::game::types::PetAction;

/// Commands understood by the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    // Session
    Login { username: String, pin: String },
    Logout,
    WhoAmI,

    // Pet
    Status,
    Feed,
    Play { clicks: u32 },
    Sleep,
    Eat(String),

    // Inventory and shop
    Shop,
    Buy { item: String, qty: u32 },
    Inventory,
    Achievements,

    // Social
    Friends,
    AddFriend(String),
    Interact(String),
    RemoveFriend(String),
    Companion,
    SetCompanion(String),
    RemoveCompanion,

    // Interactive loop only
    Help,
    Quit,

    Unknown(String),
}

/// Parse one line typed into the interactive loop.
pub fn parse_command(input: &str) -> GameCommand {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(verb) = parts.first() else {
        return GameCommand::Unknown(String::new());
    };
    let rest = parts[1..].join(" ");

    match verb.to_lowercase().as_str() {
        "login" if parts.len() == 3 => GameCommand::Login {
            username: parts[1].to_string(),
            pin: parts[2].to_string(),
        },
        "logout" => GameCommand::Logout,
        "whoami" => GameCommand::WhoAmI,

        "s" | "status" => GameCommand::Status,
        "f" | "feed" => GameCommand::Feed,
        "p" | "play" => {
            let clicks = parts.get(1).and_then(|c| c.parse().ok()).unwrap_or(0);
            GameCommand::Play { clicks }
        }
        "z" | "sleep" => GameCommand::Sleep,
        "eat" | "use" if !rest.is_empty() => GameCommand::Eat(rest),

        "shop" => GameCommand::Shop,
        "buy" if parts.len() > 1 => {
            // Optional trailing quantity: `buy super food 2`.
            let (item, qty) = match parts.last().and_then(|q| q.parse::<u32>().ok()) {
                Some(qty) if parts.len() > 2 => (parts[1..parts.len() - 1].join(" "), qty),
                _ => (rest, 1),
            };
            GameCommand::Buy { item, qty }
        }
        "i" | "inv" | "inventory" => GameCommand::Inventory,
        "a" | "achievements" => GameCommand::Achievements,

        "friends" => match parts.get(1).map(|s| s.to_lowercase()).as_deref() {
            None | Some("list") => GameCommand::Friends,
            Some("add") if parts.len() > 2 => GameCommand::AddFriend(parts[2].to_string()),
            Some("interact") if parts.len() > 2 => GameCommand::Interact(parts[2].to_string()),
            Some("remove") if parts.len() > 2 => GameCommand::RemoveFriend(parts[2].to_string()),
            _ => GameCommand::Unknown(input.trim().to_string()),
        },
        "companion" => match parts.get(1).map(|s| s.to_lowercase()).as_deref() {
            None | Some("show") => GameCommand::Companion,
            Some("set") if parts.len() > 2 => GameCommand::SetCompanion(parts[2].to_string()),
            Some("remove") => GameCommand::RemoveCompanion,
            _ => GameCommand::Unknown(input.trim().to_string()),
        },

        "h" | "help" | "?" => GameCommand::Help,
        "q" | "quit" | "exit" => GameCommand::Quit,
        _ => GameCommand::Unknown(input.trim().to_string()),
    }
}

pub fn help_lines() -> Vec<String> {
    [
        "login <user> <pin> | logout | whoami",
        "status (s) | feed (f) | play [clicks] (p) | sleep (z) | eat <item>",
        "shop | buy <item> [qty] | inventory (i) | achievements (a)",
        "friends [list|add <kind>|interact <id>|remove <id>]",
        "companion [show|set <kind>|remove]",
        "help | quit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Run a command and render its result as text lines.
///
/// Refusals and missing sessions are reported as lines; only storage and
/// credential failures surface as `Err`.
pub fn execute(game: &Game, command: &GameCommand, now: DateTime<Utc>) -> Result<Vec<String>, PetError> {
    let result = run(game, command, now);
    match result {
        Err(PetError::NotLoggedIn) => Ok(vec!["Not logged in. Use: login <user> <pin>".to_string()]),
        Err(PetError::IncorrectPin) => Ok(vec!["Incorrect PIN.".to_string()]),
        Err(e @ PetError::InvalidUsername(_))
        | Err(e @ PetError::InvalidPinFormat(_))
        | Err(e @ PetError::UnknownItem(_))
        | Err(e @ PetError::UnknownKind(_))
        | Err(e @ PetError::FriendNotFound(_)) => Ok(vec![capitalize(&e.to_string())]),
        other => other,
    }
}

fn run(game: &Game, command: &GameCommand, now: DateTime<Utc>) -> Result<Vec<String>, PetError> {
    match command {
        GameCommand::Login { username, pin } => {
            let user = game.login(username, pin, now)?;
            let mut lines = vec![format!("Welcome, {}!", user.username)];
            lines.extend(render(game.status(now)?, |v| format_status(&v, now)));
            Ok(lines)
        }
        GameCommand::Logout => Ok(match game.logout()? {
            Some(user) => vec![format!("Goodbye, {}. Your pet will wait for you.", user.username)],
            None => vec!["Nobody is logged in.".to_string()],
        }),
        GameCommand::WhoAmI => Ok(match game.whoami()? {
            Some(user) => vec![format!(
                "{} (id {}, since {})",
                user.username,
                user.id,
                user.created_at.format("%Y-%m-%d")
            )],
            None => vec!["Nobody is logged in.".to_string()],
        }),

        GameCommand::Status => Ok(render(game.status(now)?, |v| format_status(&v, now))),
        GameCommand::Feed => Ok(render(game.feed(now)?, |r| match r {
            Ok(()) => vec!["You fed your pet. Yum!".to_string()],
            Err(refused) => vec![capitalize(&refused.to_string())],
        })),
        GameCommand::Play { clicks } => Ok(render(game.play(*clicks, now)?, |r| match r {
            Ok(0) => vec!["You played with your pet!".to_string()],
            Ok(coins) => vec![format!("You played with your pet and earned {} coins!", coins)],
            Err(refused) => vec![capitalize(&refused.to_string())],
        })),
        GameCommand::Sleep => Ok(render(game.sleep(now)?, |r| match r {
            Ok(()) => vec![format!(
                "Your pet curls up for a {}s nap.",
                game.pet_rules().sleep_secs
            )],
            Err(refused) => vec![capitalize(&refused.to_string())],
        })),
        GameCommand::Eat(item) => Ok(render(game.eat(item, now)?, |r| match r {
            EatOutcome::Ate(spec) => vec![format!("Your pet enjoyed the {} {}.", spec.emoji, spec.name)],
            EatOutcome::NotOwned(spec) => vec![format!("You have no {} left. Try the shop.", spec.name)],
            EatOutcome::Refused(refused) => vec![capitalize(&refused.to_string())],
        })),

        GameCommand::Shop => Ok(render(game.inventory(now)?, |inv| format_shop(&inv))),
        GameCommand::Buy { item, qty } => Ok(render(game.buy(item, *qty, now)?, |r| match r {
            BuyOutcome::Bought {
                item,
                qty,
                coins_left,
            } => vec![format!(
                "Bought {} {} x{}. {} coins left.",
                item.emoji, item.name, qty, coins_left
            )],
            BuyOutcome::NotEnoughCoins { needed, have } => {
                vec![format!("Not enough coins: need {}, have {}.", needed, have)]
            }
        })),
        GameCommand::Inventory => Ok(render(game.inventory(now)?, |inv| format_inventory(&inv))),
        GameCommand::Achievements => Ok(render(game.achievements(now)?, |list| {
            format_achievements(&list)
        })),

        GameCommand::Friends => Ok(render(game.friends(now)?, |view| format_friends(&view))),
        GameCommand::AddFriend(kind) => Ok(render(game.add_friend(kind, now)?, |r| match r {
            SocialOutcome::Done(friend) => {
                let spec = friend.kind.spec();
                vec![format!("{} {} is now your pet's friend! [{}]", spec.emoji, spec.name, friend.id)]
            }
            other => refusal_lines(&other),
        })),
        GameCommand::Interact(id) => Ok(render(game.interact(id, now)?, |r| match r {
            SocialOutcome::Done(effects) => vec![format!(
                "A lovely visit! +{} coins, happiness {:+}, energy {:+}.",
                game.social_rules().interaction_reward,
                effects.happiness,
                effects.energy
            )],
            other => refusal_lines(&other),
        })),
        GameCommand::RemoveFriend(id) => Ok(render(game.remove_friend(id, now)?, |friend| {
            vec![format!("Said goodbye to {}.", friend.kind.spec().name)]
        })),
        GameCommand::Companion => Ok(render(game.friends(now)?, |view| match view.companion {
            Some(c) => format_companion(&c),
            None => vec!["Your pet has no companion yet.".to_string()],
        })),
        GameCommand::SetCompanion(kind) => Ok(render(game.set_companion(kind, now)?, |r| match r {
            SocialOutcome::Done(companion) => {
                let spec = companion.kind.spec();
                vec![format!("{} {} is now your pet's companion!", spec.emoji, spec.name)]
            }
            other => refusal_lines(&other),
        })),
        GameCommand::RemoveCompanion => Ok(render(game.remove_companion(now)?, |r| match r {
            Some(c) => vec![format!("{} has left.", c.kind.spec().name)],
            None => vec!["Your pet has no companion.".to_string()],
        })),

        GameCommand::Help => Ok(help_lines()),
        GameCommand::Quit => Ok(Vec::new()),
        GameCommand::Unknown(raw) if raw.is_empty() => Ok(Vec::new()),
        GameCommand::Unknown(raw) => Ok(vec![format!("Unknown command: '{}'. Type help.", raw)]),
    }
}

/// Settle notes, then the outcome, then achievement notifications.
fn render<T>(turn: Turn<T>, body: impl FnOnce(T) -> Vec<String>) -> Vec<String> {
    let mut lines = settle_lines(&turn.settle);
    lines.extend(body(turn.outcome));
    lines.extend(unlocked_lines(&turn.unlocked));
    lines
}

pub fn settle_lines(settle: &SettleReport) -> Vec<String> {
    let mut lines = Vec::new();
    if settle.woke {
        lines.push("Your pet woke up refreshed.".to_string());
    }
    if settle.died {
        lines.push("Your pet has passed away... A new pet has arrived.".to_string());
    }
    lines
}

fn unlocked_lines(unlocked: &[&'static AchievementDef]) -> Vec<String> {
    unlocked
        .iter()
        .map(|def| {
            format!(
                "Achievement unlocked: {} {} (+{} coins)",
                def.emoji, def.name, def.reward_coins
            )
        })
        .collect()
}

fn refusal_lines<T>(outcome: &SocialOutcome<T>) -> Vec<String> {
    match outcome {
        SocialOutcome::Done(_) => Vec::new(),
        SocialOutcome::NotEnoughCoins { needed, have } => {
            vec![format!("Not enough coins: need {}, have {}.", needed, have)]
        }
        SocialOutcome::OnCooldown { remaining } => {
            vec![format!("Your pet needs a rest from socializing ({}).", format_wait(*remaining))]
        }
    }
}

fn stat_bar(value: u8) -> String {
    let filled = (value as usize + 5) / 10;
    format!("[{}{}] {:>3}", "#".repeat(filled), ".".repeat(10 - filled), value)
}

pub fn format_wait(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs.max(1))
    }
}

pub fn format_status(view: &StatusView, now: DateTime<Utc>) -> Vec<String> {
    let pet = &view.pet;
    let mut lines = vec![
        format!("{}'s pet {}", view.user.username, view.mood.describe()),
        format!("Hunger    {}", stat_bar(pet.hunger)),
        format!("Energy    {}", stat_bar(pet.energy)),
        format!("Happiness {}", stat_bar(pet.happiness)),
        format!("Coins: {}", view.coins),
    ];
    if let Some(until) = pet.sleep_until.filter(|_| pet.sleeping) {
        let left = if until > now { until - now } else { Duration::zero() };
        lines.push(format!("Sleeping, wakes in {}", format_wait(left)));
    }
    for action in [PetAction::Feed, PetAction::Play, PetAction::Sleep] {
        let left = pet.cooldown_remaining(action, now);
        if left > Duration::zero() {
            lines.push(format!("{} ready in {}", action.label(), format_wait(left)));
        }
    }
    if view.effects.happiness != 0 || view.effects.energy != 0 {
        lines.push(format!(
            "Social bonus: happiness {:+} energy {:+}",
            view.effects.happiness, view.effects.energy
        ));
    }
    lines
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_verbs() {
        assert_eq!(parse_command("FEED"), GameCommand::Feed);
        assert_eq!(parse_command("  s "), GameCommand::Status);
        assert_eq!(parse_command("play 37"), GameCommand::Play { clicks: 37 });
        assert_eq!(parse_command("play"), GameCommand::Play { clicks: 0 });
        assert_eq!(
            parse_command("login Alice 1234"),
            GameCommand::Login { username: "Alice".into(), pin: "1234".into() }
        );
        assert!(matches!(parse_command("login alice"), GameCommand::Unknown(_)));
        assert_eq!(parse_command(""), GameCommand::Unknown(String::new()));
    }

    #[test]
    fn parses_buy_with_optional_quantity() {
        assert_eq!(
            parse_command("buy apple"),
            GameCommand::Buy { item: "apple".into(), qty: 1 }
        );
        assert_eq!(
            parse_command("buy super food 3"),
            GameCommand::Buy { item: "super food".into(), qty: 3 }
        );
        assert_eq!(parse_command("eat energy drink"), GameCommand::Eat("energy drink".into()));
    }

    #[test]
    fn parses_social_subcommands() {
        assert_eq!(parse_command("friends"), GameCommand::Friends);
        assert_eq!(parse_command("friends add dog"), GameCommand::AddFriend("dog".into()));
        assert_eq!(
            parse_command("friends interact dog_1a2b"),
            GameCommand::Interact("dog_1a2b".into())
        );
        assert_eq!(parse_command("companion set robot"), GameCommand::SetCompanion("robot".into()));
        assert_eq!(parse_command("companion remove"), GameCommand::RemoveCompanion);
        assert!(matches!(parse_command("friends add"), GameCommand::Unknown(_)));
    }

    #[test]
    fn waits_are_human_readable() {
        assert_eq!(format_wait(Duration::seconds(42)), "42s");
        assert_eq!(format_wait(Duration::seconds(125)), "2m 5s");
        assert_eq!(format_wait(Duration::seconds(3600)), "1h 0m");
        assert_eq!(format_wait(Duration::milliseconds(300)), "1s");
    }

    #[test]
    fn stat_bar_scales() {
        assert_eq!(stat_bar(0), "[..........]   0");
        assert_eq!(stat_bar(100), "[##########] 100");
        assert_eq!(stat_bar(54), "[#####.....]  54");
    }
}
