//! Game facade for the logged-in user.
//!
//! Every operation loads the user's state from the store, settles pending
//! timers (wake-up, decay, death), performs the action and writes the state
//! back. Nothing is cached between calls, so one-shot commands and the
//! interactive loop share the same code path.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

use crate::game::achievement::{list_achievements, record_event, AchievementStatus};
use crate::game::auth::{self, PinHasher};
use crate::game::catalog::{find_item, AchievementDef, ItemCategory, ItemSpec};
use crate::game::errors::PetError;
use crate::game::inventory::{load_inventory, save_inventory};
use crate::game::pet::ActionRefused;
use crate::game::social::{self, SocialOutcome};
use crate::game::storage::PetStore;
use crate::game::types::{
    ActivityEvent, CompanionKind, CompanionRecord, FriendKind, FriendRecord, Inventory, Mood,
    PetRecord, PetRules, SessionUser, SocialEffects, SocialRules, StatDelta,
};

/// Per-user state loaded for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub user: SessionUser,
    pub pet: PetRecord,
    pub inventory: Inventory,
}

/// Timer effects applied while loading or after an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub woke: bool,
    pub decayed: bool,
    /// The pet died and was replaced, along with the inventory.
    pub died: bool,
}

/// Result of one facade call.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn<T> {
    pub settle: SettleReport,
    pub outcome: T,
    pub unlocked: Vec<&'static AchievementDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub user: SessionUser,
    pub pet: PetRecord,
    pub mood: Mood,
    pub coins: u32,
    pub effects: SocialEffects,
}

/// Friends page: who is around and when the next visit is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialView {
    pub friends: Vec<FriendRecord>,
    pub companion: Option<CompanionRecord>,
    pub can_visit: bool,
    pub next_visit_in: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EatOutcome {
    Ate(&'static ItemSpec),
    NotOwned(&'static ItemSpec),
    Refused(ActionRefused),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyOutcome {
    Bought {
        item: &'static ItemSpec,
        qty: u32,
        coins_left: u32,
    },
    NotEnoughCoins {
        needed: u32,
        have: u32,
    },
}

pub struct Game {
    store: PetStore,
    hasher: PinHasher,
    pet_rules: PetRules,
    social_rules: SocialRules,
}

impl Game {
    pub fn new(
        store: PetStore,
        hasher: PinHasher,
        pet_rules: PetRules,
        social_rules: SocialRules,
    ) -> Self {
        Self {
            store,
            hasher,
            pet_rules,
            social_rules,
        }
    }

    pub fn store(&self) -> &PetStore {
        &self.store
    }

    pub fn pet_rules(&self) -> &PetRules {
        &self.pet_rules
    }

    pub fn social_rules(&self) -> &SocialRules {
        &self.social_rules
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Log in and make sure the user has a pet and an inventory on disk.
    pub fn login(
        &self,
        username: &str,
        pin: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionUser, PetError> {
        let user = auth::login(&self.store, &self.hasher, username, pin, now)?;
        if self.store.get_pet(&user.id)?.is_none() {
            self.store.put_pet(&user.id, &PetRecord::new(now))?;
            debug!("created pet for {}", user.username);
        }
        let inventory = load_inventory(&self.store, &user.id)?;
        save_inventory(&self.store, &user.id, &inventory)?;
        Ok(user)
    }

    pub fn logout(&self) -> Result<Option<SessionUser>, PetError> {
        auth::logout(&self.store)
    }

    pub fn whoami(&self) -> Result<Option<SessionUser>, PetError> {
        auth::current_session(&self.store)
    }

    // ------------------------------------------------------------------------
    // Load / settle / save
    // ------------------------------------------------------------------------

    fn load(&self, now: DateTime<Utc>) -> Result<(GameState, SettleReport), PetError> {
        let user = auth::require_session(&self.store)?;
        let mut pet = match self.store.get_pet(&user.id)? {
            Some(pet) => pet,
            None => PetRecord::new(now),
        };
        pet.clamp_stats();
        let mut inventory = load_inventory(&self.store, &user.id)?;

        // Wake first so a nap that ended before the decay step still restores energy.
        let woke = pet.wake_if_due(now, &self.pet_rules);
        let decayed = pet.apply_decay(now, &self.pet_rules);
        let died = pet.is_dead();
        if died {
            warn!("{}'s pet died; starting over", user.username);
            pet.reset(now);
            inventory.reset();
        }
        let report = SettleReport {
            woke,
            decayed,
            died,
        };
        let state = GameState {
            user,
            pet,
            inventory,
        };
        Ok((state, report))
    }

    /// Reset pet and inventory if the pet has died, then persist both.
    fn save(&self, state: &mut GameState, now: DateTime<Utc>) -> Result<bool, PetError> {
        let died = state.pet.is_dead();
        if died {
            warn!("{}'s pet died; starting over", state.user.username);
            state.pet.reset(now);
            state.inventory.reset();
        }
        self.store.put_pet(&state.user.id, &state.pet)?;
        save_inventory(&self.store, &state.user.id, &state.inventory)?;
        Ok(died)
    }

    fn finish<T>(
        &self,
        mut state: GameState,
        mut settle: SettleReport,
        outcome: T,
        unlocked: Vec<&'static AchievementDef>,
        now: DateTime<Utc>,
    ) -> Result<Turn<T>, PetError> {
        settle.died |= self.save(&mut state, now)?;
        Ok(Turn {
            settle,
            outcome,
            unlocked,
        })
    }

    /// Apply due timers and persist the result.
    pub fn settle(&self, now: DateTime<Utc>) -> Result<SettleReport, PetError> {
        let (state, settle) = self.load(now)?;
        Ok(self.finish(state, settle, (), Vec::new(), now)?.settle)
    }

    /// Current wake deadline, if the pet is asleep.
    pub fn wake_deadline(&self) -> Result<Option<DateTime<Utc>>, PetError> {
        let Some(user) = auth::current_session(&self.store)? else {
            return Ok(None);
        };
        Ok(self
            .store
            .get_pet(&user.id)?
            .filter(|pet| pet.sleeping)
            .and_then(|pet| pet.sleep_until))
    }

    // ------------------------------------------------------------------------
    // Pet actions
    // ------------------------------------------------------------------------

    pub fn status(&self, now: DateTime<Utc>) -> Result<Turn<StatusView>, PetError> {
        let (mut state, mut settle) = self.load(now)?;
        settle.died |= self.save(&mut state, now)?;
        let friends = self.store.get_friends(&state.user.id)?;
        let companion = self.store.get_companion(&state.user.id)?;
        let view = StatusView {
            mood: state.pet.mood(&self.pet_rules),
            coins: state.inventory.coins,
            effects: social::social_effects(&friends, companion.as_ref()),
            user: state.user,
            pet: state.pet,
        };
        Ok(Turn {
            settle,
            outcome: view,
            unlocked: Vec::new(),
        })
    }

    fn record(
        &self,
        state: &mut GameState,
        event: ActivityEvent,
        now: DateTime<Utc>,
    ) -> Result<Vec<&'static AchievementDef>, PetError> {
        record_event(
            &self.store,
            &state.user.id,
            &mut state.inventory,
            event,
            now,
        )
    }

    pub fn feed(&self, now: DateTime<Utc>) -> Result<Turn<Result<(), ActionRefused>>, PetError> {
        let (mut state, settle) = self.load(now)?;
        let outcome = state.pet.feed(now, &self.pet_rules);
        let unlocked = match outcome {
            Ok(()) => self.record(&mut state, ActivityEvent::Fed, now)?,
            Err(_) => Vec::new(),
        };
        self.finish(state, settle, outcome, unlocked, now)
    }

    /// Play one round of the click game. Earns a coin per `clicks_per_coin`
    /// clicks on success.
    pub fn play(
        &self,
        clicks: u32,
        now: DateTime<Utc>,
    ) -> Result<Turn<Result<u32, ActionRefused>>, PetError> {
        let (mut state, settle) = self.load(now)?;
        let outcome = match state.pet.play(now, &self.pet_rules) {
            Ok(()) => {
                let earned = clicks.checked_div(self.pet_rules.clicks_per_coin).unwrap_or(0);
                state.inventory.add_coins(earned);
                Ok(earned)
            }
            Err(refused) => Err(refused),
        };
        let unlocked = match outcome {
            Ok(_) => self.record(&mut state, ActivityEvent::Played, now)?,
            Err(_) => Vec::new(),
        };
        self.finish(state, settle, outcome, unlocked, now)
    }

    pub fn sleep(&self, now: DateTime<Utc>) -> Result<Turn<Result<(), ActionRefused>>, PetError> {
        let (mut state, settle) = self.load(now)?;
        let outcome = state.pet.sleep(now, &self.pet_rules);
        let unlocked = match outcome {
            Ok(()) => self.record(&mut state, ActivityEvent::Slept, now)?,
            Err(_) => Vec::new(),
        };
        self.finish(state, settle, outcome, unlocked, now)
    }

    /// Use one unit of an owned item on the pet. Food counts as a feed for
    /// achievements but does not touch the feed cooldown.
    pub fn eat(&self, item_id: &str, now: DateTime<Utc>) -> Result<Turn<EatOutcome>, PetError> {
        let item = find_item(item_id).ok_or_else(|| PetError::UnknownItem(item_id.to_string()))?;
        let (mut state, settle) = self.load(now)?;

        let outcome = if state.pet.is_dead() {
            EatOutcome::Refused(ActionRefused::Dead)
        } else if state.pet.sleeping {
            EatOutcome::Refused(ActionRefused::Sleeping)
        } else if !state.inventory.use_item(item.id, 1) {
            EatOutcome::NotOwned(item)
        } else {
            state.pet.apply_effects(item.effect);
            debug!("{} used {}", state.user.username, item.id);
            EatOutcome::Ate(item)
        };

        let unlocked = match outcome {
            EatOutcome::Ate(spec) if spec.category == ItemCategory::Food => {
                self.record(&mut state, ActivityEvent::Fed, now)?
            }
            _ => Vec::new(),
        };
        self.finish(state, settle, outcome, unlocked, now)
    }

    // ------------------------------------------------------------------------
    // Inventory and shop
    // ------------------------------------------------------------------------

    pub fn inventory(&self, now: DateTime<Utc>) -> Result<Turn<Inventory>, PetError> {
        let (state, settle) = self.load(now)?;
        let snapshot = state.inventory.clone();
        self.finish(state, settle, snapshot, Vec::new(), now)
    }

    pub fn buy(
        &self,
        item_id: &str,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Turn<BuyOutcome>, PetError> {
        let item = find_item(item_id).ok_or_else(|| PetError::UnknownItem(item_id.to_string()))?;
        let (mut state, settle) = self.load(now)?;
        let outcome = if state.inventory.buy_item(item, qty) {
            info!("{} bought {} x{}", state.user.username, item.id, qty);
            BuyOutcome::Bought {
                item,
                qty,
                coins_left: state.inventory.coins,
            }
        } else {
            BuyOutcome::NotEnoughCoins {
                needed: item.price.saturating_mul(qty),
                have: state.inventory.coins,
            }
        };
        self.finish(state, settle, outcome, Vec::new(), now)
    }

    pub fn achievements(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Turn<Vec<AchievementStatus>>, PetError> {
        let (state, settle) = self.load(now)?;
        let listing = list_achievements(&self.store, &state.user.id)?;
        self.finish(state, settle, listing, Vec::new(), now)
    }

    // ------------------------------------------------------------------------
    // Social
    // ------------------------------------------------------------------------

    pub fn friends(&self, now: DateTime<Utc>) -> Result<Turn<SocialView>, PetError> {
        let (state, settle) = self.load(now)?;
        let friends = self.store.get_friends(&state.user.id)?;
        let companion = self.store.get_companion(&state.user.id)?;
        let last = self.store.get_last_interaction(&state.user.id)?;
        let view = SocialView {
            friends,
            companion,
            can_visit: social::can_interact(last, now, &self.social_rules),
            next_visit_in: social::time_until_next_interaction(last, now, &self.social_rules),
        };
        self.finish(state, settle, view, Vec::new(), now)
    }

    pub fn add_friend(
        &self,
        kind: &str,
        now: DateTime<Utc>,
    ) -> Result<Turn<SocialOutcome<FriendRecord>>, PetError> {
        let kind = FriendKind::parse(kind).ok_or_else(|| PetError::UnknownKind(kind.to_string()))?;
        let (mut state, settle) = self.load(now)?;
        let outcome = social::add_friend(
            &self.store,
            &state.user.id,
            &mut state.inventory,
            kind,
            &self.social_rules,
            now,
        )?;
        let unlocked = match outcome {
            SocialOutcome::Done(_) => self.record(&mut state, ActivityEvent::FriendAdded, now)?,
            _ => Vec::new(),
        };
        self.finish(state, settle, outcome, unlocked, now)
    }

    /// Interact with a friend; on success the combined social bonus is
    /// applied to the pet.
    pub fn interact(
        &self,
        friend_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Turn<SocialOutcome<SocialEffects>>, PetError> {
        let (mut state, settle) = self.load(now)?;
        let outcome = social::interact_with_friend(
            &self.store,
            &state.user.id,
            &mut state.inventory,
            friend_id,
            &self.social_rules,
            now,
        )?;
        if let SocialOutcome::Done(effects) = &outcome {
            state
                .pet
                .apply_effects(StatDelta::new(0, effects.energy, effects.happiness));
        }
        self.finish(state, settle, outcome, Vec::new(), now)
    }

    pub fn remove_friend(
        &self,
        friend_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Turn<FriendRecord>, PetError> {
        let (state, settle) = self.load(now)?;
        let removed = social::remove_friend(&self.store, &state.user.id, friend_id)?;
        self.finish(state, settle, removed, Vec::new(), now)
    }

    pub fn set_companion(
        &self,
        kind: &str,
        now: DateTime<Utc>,
    ) -> Result<Turn<SocialOutcome<CompanionRecord>>, PetError> {
        let kind =
            CompanionKind::parse(kind).ok_or_else(|| PetError::UnknownKind(kind.to_string()))?;
        let (mut state, settle) = self.load(now)?;
        let outcome = social::set_companion(
            &self.store,
            &state.user.id,
            &mut state.inventory,
            kind,
            &self.social_rules,
            now,
        )?;
        let unlocked = match outcome {
            SocialOutcome::Done(_) => {
                self.record(&mut state, ActivityEvent::CompanionFound, now)?
            }
            _ => Vec::new(),
        };
        self.finish(state, settle, outcome, unlocked, now)
    }

    pub fn remove_companion(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Turn<Option<CompanionRecord>>, PetError> {
        let (state, settle) = self.load(now)?;
        let removed = social::remove_companion(&self.store, &state.user.id)?;
        self.finish(state, settle, removed, Vec::new(), now)
    }
}
