//! Virtual pet game model and persistence.
//!
//! State containers (pet, inventory, achievements, friends, companion) are
//! stored as JSON strings in a sled tree under `mv:`-prefixed keys. The
//! [`Game`] facade ties them together for the logged-in user.

pub mod achievement;
pub mod auth;
pub mod catalog;
pub mod commands;
pub mod errors;
pub mod inventory;
pub mod pet;
pub mod runtime;
pub mod session;
pub mod social;
pub mod storage;
pub mod types;

pub use achievement::{format_achievements, list_achievements, record_event, AchievementStatus};
pub use auth::{current_session, login, logout, PinHasher};
pub use catalog::{
    find_achievement, find_item, AchievementCondition, AchievementDef, CompanionSpec, FriendSpec,
    ItemCategory, ItemSpec, ACHIEVEMENTS, COMPANIONS, FOODS, FRIENDS, MEDICINES,
};
pub use commands::{execute, parse_command, GameCommand};
pub use errors::PetError;
pub use inventory::{load_inventory, save_inventory, shop_listing, ShopEntry};
pub use pet::ActionRefused;
pub use runtime::run_interactive;
pub use session::{
    BuyOutcome, EatOutcome, Game, GameState, SettleReport, SocialView, StatusView, Turn,
};
pub use social::{can_interact, social_effects, time_until_next_interaction, SocialOutcome};
pub use storage::{PetStore, PetStoreBuilder};
pub use types::*;
