//! Static game tables: shop items, friend and companion kinds, achievements.
//!
//! Everything here is fixed at compile time; per-user state refers to these
//! entries by id or kind.

use super::types::{ActivityStats, CompanionKind, FriendKind, StatDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Food,
    Medicine,
}

impl ItemCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ItemCategory::Food => "Food",
            ItemCategory::Medicine => "Medicine",
        }
    }
}

/// A purchasable item and what it does to the pet when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub category: ItemCategory,
    pub effect: StatDelta,
    pub price: u32,
}

const fn food(
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    hunger: i32,
    happiness: i32,
    energy: i32,
    price: u32,
) -> ItemSpec {
    ItemSpec {
        id,
        name,
        emoji,
        category: ItemCategory::Food,
        effect: StatDelta::new(hunger, energy, happiness),
        price,
    }
}

const fn medicine(
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    hunger: i32,
    happiness: i32,
    energy: i32,
    price: u32,
) -> ItemSpec {
    ItemSpec {
        id,
        name,
        emoji,
        category: ItemCategory::Medicine,
        effect: StatDelta::new(hunger, energy, happiness),
        price,
    }
}

pub static FOODS: [ItemSpec; 10] = [
    food("apple", "Apple", "🍎", 15, 5, 0, 5),
    food("orange", "Orange", "🍊", 12, 8, 3, 6),
    food("cucumber", "Cucumber", "🥒", 8, 2, 5, 3),
    food("banana", "Banana", "🍌", 18, 10, 8, 8),
    food("carrot", "Carrot", "🥕", 10, 3, 7, 4),
    food("grapes", "Grapes", "🍇", 14, 12, 4, 7),
    food("strawberry", "Strawberry", "🍓", 6, 15, 2, 9),
    food("watermelon", "Watermelon", "🍉", 25, 8, 10, 12),
    food("pizza", "Pizza", "🍕", 30, 20, -5, 20),
    food("cake", "Cake", "🍰", 20, 25, -3, 18),
];

pub static MEDICINES: [ItemSpec; 5] = [
    medicine("vitamin", "Vitamin", "💊", 5, 5, 10, 8),
    medicine("energy_drink", "Energy Drink", "🥤", 0, 5, 20, 12),
    medicine("happiness_pill", "Happiness Pill", "😊", 0, 20, 0, 15),
    medicine("super_food", "Super Food", "🌟", 15, 15, 15, 25),
    medicine("miracle_cure", "Miracle Cure", "✨", 25, 25, 25, 40),
];

/// Items every fresh inventory starts with.
pub const STARTER_ITEMS: [(&str, u32); 3] = [("apple", 1), ("orange", 1), ("cucumber", 1)];

/// Look up an item in either catalog. Accepts the camelCase ids older saves used.
pub fn find_item(id: &str) -> Option<&'static ItemSpec> {
    let wanted = canonical_item_id(id);
    FOODS
        .iter()
        .chain(MEDICINES.iter())
        .find(|item| item.id == wanted)
}

fn canonical_item_id(id: &str) -> String {
    let id = id.trim();
    let mut out = String::with_capacity(id.len() + 2);
    for ch in id.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch == ' ' || ch == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn items_in(category: ItemCategory) -> &'static [ItemSpec] {
    match category {
        ItemCategory::Food => &FOODS,
        ItemCategory::Medicine => &MEDICINES,
    }
}

// ============================================================================
// Social
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriendSpec {
    pub kind: FriendKind,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub happiness_bonus: i32,
    pub energy_cost: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanionSpec {
    pub kind: CompanionKind,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub happiness_bonus: i32,
    pub energy_bonus: i32,
    pub special_power: &'static str,
}

pub static FRIENDS: [FriendSpec; 4] = [
    FriendSpec {
        kind: FriendKind::Cat,
        name: "Kitten",
        emoji: "🐱",
        description: "A friendly cat who loves to play",
        happiness_bonus: 5,
        energy_cost: 2,
    },
    FriendSpec {
        kind: FriendKind::Dog,
        name: "Puppy",
        emoji: "🐶",
        description: "A loyal dog who is always happy",
        happiness_bonus: 8,
        energy_cost: 3,
    },
    FriendSpec {
        kind: FriendKind::Rabbit,
        name: "Bunny",
        emoji: "🐰",
        description: "A bouncy, fun rabbit",
        happiness_bonus: 6,
        energy_cost: 1,
    },
    FriendSpec {
        kind: FriendKind::Bird,
        name: "Birdie",
        emoji: "🐦",
        description: "A cheerful songbird",
        happiness_bonus: 4,
        energy_cost: 1,
    },
];

pub static COMPANIONS: [CompanionSpec; 3] = [
    CompanionSpec {
        kind: CompanionKind::Fairy,
        name: "Fairy",
        emoji: "🧚",
        description: "A magical fairy who looks after your pet",
        happiness_bonus: 10,
        energy_bonus: 5,
        special_power: "Occasional magical healing",
    },
    CompanionSpec {
        kind: CompanionKind::Robot,
        name: "Robot",
        emoji: "🤖",
        description: "A clever robot who helps your pet",
        happiness_bonus: 8,
        energy_bonus: 8,
        special_power: "Energy efficiency",
    },
    CompanionSpec {
        kind: CompanionKind::Princess,
        name: "Princess",
        emoji: "👸",
        description: "An elegant, caring princess",
        happiness_bonus: 12,
        energy_bonus: 3,
        special_power: "Extra happiness",
    },
];

impl FriendKind {
    pub fn spec(&self) -> &'static FriendSpec {
        match self {
            FriendKind::Cat => &FRIENDS[0],
            FriendKind::Dog => &FRIENDS[1],
            FriendKind::Rabbit => &FRIENDS[2],
            FriendKind::Bird => &FRIENDS[3],
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "cat" | "kitten" => Some(FriendKind::Cat),
            "dog" | "puppy" => Some(FriendKind::Dog),
            "rabbit" | "bunny" => Some(FriendKind::Rabbit),
            "bird" | "birdie" => Some(FriendKind::Bird),
            _ => None,
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            FriendKind::Cat => "cat",
            FriendKind::Dog => "dog",
            FriendKind::Rabbit => "rabbit",
            FriendKind::Bird => "bird",
        }
    }
}

impl CompanionKind {
    pub fn spec(&self) -> &'static CompanionSpec {
        match self {
            CompanionKind::Fairy => &COMPANIONS[0],
            CompanionKind::Robot => &COMPANIONS[1],
            CompanionKind::Princess => &COMPANIONS[2],
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "fairy" => Some(CompanionKind::Fairy),
            "robot" => Some(CompanionKind::Robot),
            "princess" => Some(CompanionKind::Princess),
            _ => None,
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            CompanionKind::Fairy => "fairy",
            CompanionKind::Robot => "robot",
            CompanionKind::Princess => "princess",
        }
    }
}

// ============================================================================
// Achievements
// ============================================================================

/// Predicate over the activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCondition {
    FeedsAtLeast(u32),
    PlaysAtLeast(u32),
    SleepsAtLeast(u32),
    FriendsAtLeast(u32),
    HasCompanion,
}

impl AchievementCondition {
    pub fn is_met(&self, stats: &ActivityStats) -> bool {
        match *self {
            AchievementCondition::FeedsAtLeast(n) => stats.feeds >= n,
            AchievementCondition::PlaysAtLeast(n) => stats.plays >= n,
            AchievementCondition::SleepsAtLeast(n) => stats.sleeps >= n,
            AchievementCondition::FriendsAtLeast(n) => stats.friends >= n,
            AchievementCondition::HasCompanion => stats.companion,
        }
    }

    /// `(current, required)` for progress display.
    pub fn progress(&self, stats: &ActivityStats) -> (u32, u32) {
        match *self {
            AchievementCondition::FeedsAtLeast(n) => (stats.feeds.min(n), n),
            AchievementCondition::PlaysAtLeast(n) => (stats.plays.min(n), n),
            AchievementCondition::SleepsAtLeast(n) => (stats.sleeps.min(n), n),
            AchievementCondition::FriendsAtLeast(n) => (stats.friends.min(n), n),
            AchievementCondition::HasCompanion => (u32::from(stats.companion), 1),
        }
    }
}

/// Achievement template. Unlocks once, when `condition` first holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub condition: AchievementCondition,
    pub reward_coins: u32,
}

pub static ACHIEVEMENTS: [AchievementDef; 8] = [
    AchievementDef {
        id: "first_feed",
        name: "First Meal",
        description: "Feed your pet for the first time",
        emoji: "🍎",
        condition: AchievementCondition::FeedsAtLeast(1),
        reward_coins: 10,
    },
    AchievementDef {
        id: "five_feeds",
        name: "Expert Feeder",
        description: "Feed your pet 5 times",
        emoji: "🍽️",
        condition: AchievementCondition::FeedsAtLeast(5),
        reward_coins: 25,
    },
    AchievementDef {
        id: "ten_feeds",
        name: "Professional Chef",
        description: "Feed your pet 10 times",
        emoji: "👨‍🍳",
        condition: AchievementCondition::FeedsAtLeast(10),
        reward_coins: 50,
    },
    AchievementDef {
        id: "first_play",
        name: "First Game",
        description: "Play with your pet for the first time",
        emoji: "🎮",
        condition: AchievementCondition::PlaysAtLeast(1),
        reward_coins: 10,
    },
    AchievementDef {
        id: "five_plays",
        name: "Playmate",
        description: "Play with your pet 5 times",
        emoji: "🎯",
        condition: AchievementCondition::PlaysAtLeast(5),
        reward_coins: 25,
    },
    AchievementDef {
        id: "first_sleep",
        name: "First Nap",
        description: "Put your pet to sleep for the first time",
        emoji: "😴",
        condition: AchievementCondition::SleepsAtLeast(1),
        reward_coins: 10,
    },
    AchievementDef {
        id: "first_friend",
        name: "First Friend",
        description: "Help your pet make its first friend",
        emoji: "👫",
        condition: AchievementCondition::FriendsAtLeast(1),
        reward_coins: 20,
    },
    AchievementDef {
        id: "first_companion",
        name: "Life Companion",
        description: "Find a life companion for your pet",
        emoji: "💕",
        condition: AchievementCondition::HasCompanion,
        reward_coins: 50,
    },
];

pub fn find_achievement(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}
