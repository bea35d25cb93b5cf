use std::collections::BTreeMap;

use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const STAT_MIN: u8 = 0;
pub const STAT_MAX: u8 = 100;
pub const STAT_DEFAULT: u8 = 50;

/// Add a signed delta to a stat and clamp the result to `[STAT_MIN, STAT_MAX]`.
pub fn adjust_stat(value: u8, delta: i32) -> u8 {
    (value as i32)
        .saturating_add(delta)
        .clamp(STAT_MIN as i32, STAT_MAX as i32) as u8
}

// ============================================================================
// Users
// ============================================================================

/// Entry in the user directory (`mv:users`). Never handed to callers outside
/// the auth module: the session view drops the credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string for the PIN.
    pub pin_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The logged-in user as persisted under `mv:user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for SessionUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            created_at: record.created_at,
        }
    }
}

// ============================================================================
// Pet
// ============================================================================

/// Timed actions that carry a cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PetAction {
    Feed,
    Play,
    Sleep,
}

impl PetAction {
    pub fn label(&self) -> &'static str {
        match self {
            PetAction::Feed => "feed",
            PetAction::Play => "play",
            PetAction::Sleep => "sleep",
        }
    }
}

/// Per-action cooldown deadlines. The epoch means "never used".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cooldowns {
    #[serde(with = "ts_milliseconds")]
    pub feed: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub play: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub sleep: DateTime<Utc>,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            feed: DateTime::<Utc>::default(),
            play: DateTime::<Utc>::default(),
            sleep: DateTime::<Utc>::default(),
        }
    }
}

impl Cooldowns {
    pub fn get(&self, action: PetAction) -> DateTime<Utc> {
        match action {
            PetAction::Feed => self.feed,
            PetAction::Play => self.play,
            PetAction::Sleep => self.sleep,
        }
    }

    pub fn set(&mut self, action: PetAction, until: DateTime<Utc>) {
        match action {
            PetAction::Feed => self.feed = until,
            PetAction::Play => self.play = until,
            PetAction::Sleep => self.sleep = until,
        }
    }
}

/// Persisted pet state (`mv:pet:<user id>`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    /// Satiety: higher is better, decays toward 0.
    pub hunger: u8,
    pub energy: u8,
    pub happiness: u8,
    pub sleeping: bool,
    /// Wake deadline while sleeping.
    #[serde(default, with = "ts_milliseconds_option")]
    pub sleep_until: Option<DateTime<Utc>>,
    /// Last time a decay step was applied.
    #[serde(with = "ts_milliseconds")]
    pub last_tick: DateTime<Utc>,
    #[serde(default)]
    pub cooldowns: Cooldowns,
}

/// Signed change to the three stats. Applied with clamping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatDelta {
    pub hunger: i32,
    pub energy: i32,
    pub happiness: i32,
}

impl StatDelta {
    pub const fn new(hunger: i32, energy: i32, happiness: i32) -> Self {
        Self {
            hunger,
            energy,
            happiness,
        }
    }
}

/// Display state derived from the stats, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Sleeping,
    Hungry,
    Tired,
    Sad,
    Happy,
}

impl Mood {
    pub fn describe(&self) -> &'static str {
        match self {
            Mood::Sleeping => "is sleeping",
            Mood::Hungry => "is hungry!",
            Mood::Tired => "is tired!",
            Mood::Sad => "is sad!",
            Mood::Happy => "is happy!",
        }
    }
}

/// Tunable constants for the stat state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PetRules {
    pub feed_hunger: i32,
    pub feed_cooldown_secs: i64,
    pub play_happiness: i32,
    pub play_energy_cost: i32,
    pub play_cooldown_secs: i64,
    /// How long a nap lasts; also the sleep cooldown.
    pub sleep_secs: i64,
    pub sleep_energy: i32,
    /// Minimum time between two decay steps.
    pub decay_interval_secs: i64,
    /// How often the interactive loop checks for decay.
    pub decay_check_secs: u64,
    pub decay_amount: i32,
    /// Mini-game clicks per coin earned.
    pub clicks_per_coin: u32,
    /// Stats below this make the pet hungry/tired/sad.
    pub low_stat_threshold: u8,
}

impl Default for PetRules {
    fn default() -> Self {
        Self {
            feed_hunger: 20,
            feed_cooldown_secs: 60,
            play_happiness: 15,
            play_energy_cost: 10,
            play_cooldown_secs: 60,
            sleep_secs: 30,
            sleep_energy: 25,
            decay_interval_secs: 120,
            decay_check_secs: 60,
            decay_amount: 5,
            clicks_per_coin: 10,
            low_stat_threshold: 20,
        }
    }
}

impl PetRules {
    pub fn cooldown_for(&self, action: PetAction) -> Duration {
        match action {
            PetAction::Feed => Duration::seconds(self.feed_cooldown_secs),
            PetAction::Play => Duration::seconds(self.play_cooldown_secs),
            PetAction::Sleep => Duration::seconds(self.sleep_secs),
        }
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Item quantities and coin balance for one user.
///
/// Stored under two keys (`mv:inventory:<id>` and `mv:coins:<id>`) but
/// always loaded and saved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub items: BTreeMap<String, u32>,
    pub coins: u32,
}

// ============================================================================
// Achievements
// ============================================================================

/// Counters that achievement conditions are evaluated against (`mv:stats:<id>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActivityStats {
    pub feeds: u32,
    pub plays: u32,
    pub sleeps: u32,
    pub friends: u32,
    pub companion: bool,
}

/// Events that move the activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    Fed,
    Played,
    Slept,
    FriendAdded,
    CompanionFound,
}

/// Per-user unlock record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    pub id: String,
    #[serde(with = "ts_milliseconds")]
    pub unlocked_at: DateTime<Utc>,
}

// ============================================================================
// Social
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FriendKind {
    Cat,
    Dog,
    Rabbit,
    Bird,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CompanionKind {
    Fairy,
    Robot,
    Princess,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendRecord {
    pub id: String,
    pub kind: FriendKind,
    #[serde(with = "ts_milliseconds")]
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub interactions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanionRecord {
    pub id: String,
    pub kind: CompanionKind,
    #[serde(with = "ts_milliseconds")]
    pub set_at: DateTime<Utc>,
}

/// Combined stat bonus from all friends and the companion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocialEffects {
    pub happiness: i32,
    pub energy: i32,
}

/// Costs and timings for the social module.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SocialRules {
    pub friend_cost: u32,
    pub companion_cost: u32,
    pub interaction_cooldown_secs: i64,
    pub interaction_reward: u32,
}

impl Default for SocialRules {
    fn default() -> Self {
        Self {
            friend_cost: 50,
            companion_cost: 200,
            interaction_cooldown_secs: 3600,
            interaction_reward: 5,
        }
    }
}
