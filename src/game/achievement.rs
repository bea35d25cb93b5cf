/// Achievement tracking: activity counters, unlocks and coin rewards.
///
/// Every recorded event bumps its counter, then each definition that is not
/// yet unlocked is re-evaluated against the new counters.
use chrono::{DateTime, Utc};
use log::info;

use crate::game::catalog::{AchievementDef, ACHIEVEMENTS};
use crate::game::errors::PetError;
use crate::game::storage::PetStore;
use crate::game::types::{ActivityEvent, ActivityStats, Inventory, UnlockedAchievement};

fn apply_event(stats: &mut ActivityStats, event: ActivityEvent) {
    match event {
        ActivityEvent::Fed => stats.feeds = stats.feeds.saturating_add(1),
        ActivityEvent::Played => stats.plays = stats.plays.saturating_add(1),
        ActivityEvent::Slept => stats.sleeps = stats.sleeps.saturating_add(1),
        ActivityEvent::FriendAdded => stats.friends = stats.friends.saturating_add(1),
        ActivityEvent::CompanionFound => stats.companion = true,
    }
}

pub fn load_stats(store: &PetStore, user_id: &str) -> Result<ActivityStats, PetError> {
    Ok(store.get_activity_stats(user_id)?.unwrap_or_default())
}

/// Record an event and unlock whatever it newly satisfies.
///
/// Rewards are credited to `inventory`; the caller persists it. Returns the
/// newly unlocked definitions in catalog order.
pub fn record_event(
    store: &PetStore,
    user_id: &str,
    inventory: &mut Inventory,
    event: ActivityEvent,
    now: DateTime<Utc>,
) -> Result<Vec<&'static AchievementDef>, PetError> {
    let mut stats = load_stats(store, user_id)?;
    apply_event(&mut stats, event);
    store.put_activity_stats(user_id, &stats)?;

    let mut unlocked = store.get_achievements(user_id)?;
    let mut awarded = Vec::new();
    for def in ACHIEVEMENTS.iter() {
        if unlocked.contains_key(def.id) || !def.condition.is_met(&stats) {
            continue;
        }
        unlocked.insert(
            def.id.to_string(),
            UnlockedAchievement {
                id: def.id.to_string(),
                unlocked_at: now,
            },
        );
        awarded.push(def);
    }

    if awarded.is_empty() {
        return Ok(awarded);
    }

    store.put_achievements(user_id, &unlocked)?;
    for def in &awarded {
        inventory.add_coins(def.reward_coins);
        info!("{} unlocked achievement {}", user_id, def.id);
    }
    Ok(awarded)
}

/// One row of the achievement listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStatus {
    pub def: &'static AchievementDef,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub progress: (u32, u32),
}

pub fn list_achievements(
    store: &PetStore,
    user_id: &str,
) -> Result<Vec<AchievementStatus>, PetError> {
    let stats = load_stats(store, user_id)?;
    let unlocked = store.get_achievements(user_id)?;
    Ok(ACHIEVEMENTS
        .iter()
        .map(|def| AchievementStatus {
            def,
            unlocked_at: unlocked.get(def.id).map(|u| u.unlocked_at),
            progress: def.condition.progress(&stats),
        })
        .collect())
}

pub fn format_achievements(statuses: &[AchievementStatus]) -> Vec<String> {
    let earned = statuses.iter().filter(|s| s.unlocked_at.is_some()).count();
    let mut lines = vec![format!("=== ACHIEVEMENTS === {}/{}", earned, statuses.len())];
    for status in statuses {
        let def = status.def;
        match status.unlocked_at {
            Some(at) => lines.push(format!(
                "{} {} - {} (+{}c, {})",
                def.emoji,
                def.name,
                def.description,
                def.reward_coins,
                at.format("%Y-%m-%d")
            )),
            None => lines.push(format!(
                "   {} - {} [{}/{}] (+{}c)",
                def.name, def.description, status.progress.0, status.progress.1, def.reward_coins
            )),
        }
    }
    lines
}
