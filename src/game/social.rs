/// Friends and the single life companion.
///
/// Friends and companions cost coins to acquire. Interacting with a friend
/// is rate limited by one cooldown shared across all friends.
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use crate::game::commands::format_wait;
use crate::game::errors::PetError;
use crate::game::session::SocialView;
use crate::game::storage::PetStore;
use crate::game::types::{
    CompanionKind, CompanionRecord, FriendKind, FriendRecord, Inventory, SocialEffects,
    SocialRules,
};

fn new_instance_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &uuid[..8])
}

/// Combined bonuses: friends add happiness and cost energy, the companion
/// adds both.
pub fn social_effects(friends: &[FriendRecord], companion: Option<&CompanionRecord>) -> SocialEffects {
    let mut effects = SocialEffects::default();
    for friend in friends {
        let spec = friend.kind.spec();
        effects.happiness += spec.happiness_bonus;
        effects.energy -= spec.energy_cost;
    }
    if let Some(companion) = companion {
        let spec = companion.kind.spec();
        effects.happiness += spec.happiness_bonus;
        effects.energy += spec.energy_bonus;
    }
    effects
}

/// Time left before the next friend interaction; zero when allowed.
pub fn time_until_next_interaction(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    rules: &SocialRules,
) -> Duration {
    let Some(last) = last else {
        return Duration::zero();
    };
    let ready_at = last + Duration::seconds(rules.interaction_cooldown_secs);
    if ready_at > now {
        ready_at - now
    } else {
        Duration::zero()
    }
}

pub fn can_interact(last: Option<DateTime<Utc>>, now: DateTime<Utc>, rules: &SocialRules) -> bool {
    time_until_next_interaction(last, now, rules) == Duration::zero()
}

/// Outcome of a social purchase or interaction that may be refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialOutcome<T> {
    Done(T),
    NotEnoughCoins { needed: u32, have: u32 },
    OnCooldown { remaining: Duration },
}

/// Buy a new friend of `kind`. Multiple friends of one kind are allowed.
pub fn add_friend(
    store: &PetStore,
    user_id: &str,
    inventory: &mut Inventory,
    kind: FriendKind,
    rules: &SocialRules,
    now: DateTime<Utc>,
) -> Result<SocialOutcome<FriendRecord>, PetError> {
    if !inventory.spend_coins(rules.friend_cost) {
        return Ok(SocialOutcome::NotEnoughCoins {
            needed: rules.friend_cost,
            have: inventory.coins,
        });
    }
    let mut friends = store.get_friends(user_id)?;
    let friend = FriendRecord {
        id: new_instance_id(kind.id_prefix()),
        kind,
        added_at: now,
        interactions: 0,
    };
    friends.push(friend.clone());
    store.put_friends(user_id, &friends)?;
    info!("{} made a new friend {}", user_id, friend.id);
    Ok(SocialOutcome::Done(friend))
}

/// Remove a friend by instance id. Coins are not refunded.
pub fn remove_friend(store: &PetStore, user_id: &str, friend_id: &str) -> Result<FriendRecord, PetError> {
    let mut friends = store.get_friends(user_id)?;
    let Some(pos) = friends.iter().position(|f| f.id == friend_id) else {
        return Err(PetError::FriendNotFound(friend_id.to_string()));
    };
    let removed = friends.remove(pos);
    store.put_friends(user_id, &friends)?;
    debug!("{} removed friend {}", user_id, friend_id);
    Ok(removed)
}

/// Interact with one friend. Pays the interaction reward and returns the
/// social effects to apply to the pet.
pub fn interact_with_friend(
    store: &PetStore,
    user_id: &str,
    inventory: &mut Inventory,
    friend_id: &str,
    rules: &SocialRules,
    now: DateTime<Utc>,
) -> Result<SocialOutcome<SocialEffects>, PetError> {
    let mut friends = store.get_friends(user_id)?;
    let Some(friend) = friends.iter_mut().find(|f| f.id == friend_id) else {
        return Err(PetError::FriendNotFound(friend_id.to_string()));
    };

    let last = store.get_last_interaction(user_id)?;
    let remaining = time_until_next_interaction(last, now, rules);
    if remaining > Duration::zero() {
        return Ok(SocialOutcome::OnCooldown { remaining });
    }

    friend.interactions = friend.interactions.saturating_add(1);
    store.put_friends(user_id, &friends)?;
    store.put_last_interaction(user_id, now)?;
    inventory.add_coins(rules.interaction_reward);

    let companion = store.get_companion(user_id)?;
    Ok(SocialOutcome::Done(social_effects(&friends, companion.as_ref())))
}

/// Adopt a companion, replacing any current one.
pub fn set_companion(
    store: &PetStore,
    user_id: &str,
    inventory: &mut Inventory,
    kind: CompanionKind,
    rules: &SocialRules,
    now: DateTime<Utc>,
) -> Result<SocialOutcome<CompanionRecord>, PetError> {
    if !inventory.spend_coins(rules.companion_cost) {
        return Ok(SocialOutcome::NotEnoughCoins {
            needed: rules.companion_cost,
            have: inventory.coins,
        });
    }
    let companion = CompanionRecord {
        id: new_instance_id(kind.id_prefix()),
        kind,
        set_at: now,
    };
    store.put_companion(user_id, Some(&companion))?;
    info!("{} found companion {}", user_id, companion.id);
    Ok(SocialOutcome::Done(companion))
}

pub fn remove_companion(store: &PetStore, user_id: &str) -> Result<Option<CompanionRecord>, PetError> {
    let previous = store.get_companion(user_id)?;
    store.put_companion(user_id, None)?;
    Ok(previous)
}

pub fn format_friends(view: &SocialView) -> Vec<String> {
    let friends = view.friends.as_slice();
    let companion = view.companion.as_ref();
    let mut lines = Vec::new();
    if friends.is_empty() {
        lines.push("No friends yet.".to_string());
    } else {
        lines.push(format!("Friends ({}):", friends.len()));
        for friend in friends {
            let spec = friend.kind.spec();
            lines.push(format!(
                "{} {} [{}] happiness +{} energy -{} ({} visits)",
                spec.emoji,
                spec.name,
                friend.id,
                spec.happiness_bonus,
                spec.energy_cost,
                friend.interactions
            ));
        }
    }
    if let Some(companion) = companion {
        lines.extend(format_companion(companion));
    }
    let effects = social_effects(friends, companion);
    lines.push(format!(
        "Social bonus: happiness {:+} energy {:+}",
        effects.happiness, effects.energy
    ));
    if !friends.is_empty() {
        if view.can_visit {
            lines.push("Your pet can visit a friend now.".to_string());
        } else {
            lines.push(format!("Next visit in {}.", format_wait(view.next_visit_in)));
        }
    }
    lines
}

pub fn format_companion(companion: &CompanionRecord) -> Vec<String> {
    let spec = companion.kind.spec();
    vec![
        format!("Companion: {} {} [{}]", spec.emoji, spec.name, companion.id),
        format!("  {}", spec.description),
        format!(
            "  happiness +{} energy +{} | {}",
            spec.happiness_bonus, spec.energy_bonus, spec.special_power
        ),
    ]
}
