//! Pet stat state machine.
//!
//! All transitions take the current time explicitly. Actions that are not
//! allowed return an [`ActionRefused`] and leave the record untouched.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use thiserror::Error;

use super::types::{
    adjust_stat, Cooldowns, Mood, PetAction, PetRecord, PetRules, StatDelta, STAT_DEFAULT,
    STAT_MAX, STAT_MIN,
};

/// Why an action was not performed.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ActionRefused {
    #[error("{} is on cooldown for another {}s", .action, .remaining.num_seconds().max(1))]
    OnCooldown {
        action: &'static str,
        remaining: Duration,
    },
    #[error("your pet is sleeping")]
    Sleeping,
    #[error("your pet is already asleep")]
    AlreadySleeping,
    #[error("your pet has passed away")]
    Dead,
}

impl PetRecord {
    /// Fresh pet with default stats, awake, no cooldowns.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            hunger: STAT_DEFAULT,
            energy: STAT_DEFAULT,
            happiness: STAT_DEFAULT,
            sleeping: false,
            sleep_until: None,
            last_tick: now,
            cooldowns: Cooldowns::default(),
        }
    }

    /// Bring values loaded from storage back inside their valid range.
    pub fn clamp_stats(&mut self) {
        self.hunger = self.hunger.clamp(STAT_MIN, STAT_MAX);
        self.energy = self.energy.clamp(STAT_MIN, STAT_MAX);
        self.happiness = self.happiness.clamp(STAT_MIN, STAT_MAX);
        if !self.sleeping {
            self.sleep_until = None;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hunger == STAT_MIN || self.energy == STAT_MIN || self.happiness == STAT_MIN
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }

    pub fn apply_effects(&mut self, delta: StatDelta) {
        self.hunger = adjust_stat(self.hunger, delta.hunger);
        self.energy = adjust_stat(self.energy, delta.energy);
        self.happiness = adjust_stat(self.happiness, delta.happiness);
    }

    /// Time left before `action` may be used again; zero when ready.
    pub fn cooldown_remaining(&self, action: PetAction, now: DateTime<Utc>) -> Duration {
        let until = self.cooldowns.get(action);
        if until > now {
            until - now
        } else {
            Duration::zero()
        }
    }

    fn check_ready(&self, action: PetAction, now: DateTime<Utc>) -> Result<(), ActionRefused> {
        if self.is_dead() {
            return Err(ActionRefused::Dead);
        }
        if self.sleeping {
            return Err(match action {
                PetAction::Sleep => ActionRefused::AlreadySleeping,
                _ => ActionRefused::Sleeping,
            });
        }
        let remaining = self.cooldown_remaining(action, now);
        if remaining > Duration::zero() {
            return Err(ActionRefused::OnCooldown {
                action: action.label(),
                remaining,
            });
        }
        Ok(())
    }

    pub fn feed(&mut self, now: DateTime<Utc>, rules: &PetRules) -> Result<(), ActionRefused> {
        self.check_ready(PetAction::Feed, now)?;
        self.hunger = adjust_stat(self.hunger, rules.feed_hunger);
        self.cooldowns
            .set(PetAction::Feed, now + rules.cooldown_for(PetAction::Feed));
        debug!("pet fed, hunger now {}", self.hunger);
        Ok(())
    }

    pub fn play(&mut self, now: DateTime<Utc>, rules: &PetRules) -> Result<(), ActionRefused> {
        self.check_ready(PetAction::Play, now)?;
        self.happiness = adjust_stat(self.happiness, rules.play_happiness);
        self.energy = adjust_stat(self.energy, rules.play_energy_cost.saturating_neg());
        self.cooldowns
            .set(PetAction::Play, now + rules.cooldown_for(PetAction::Play));
        debug!(
            "played with pet, happiness {} energy {}",
            self.happiness, self.energy
        );
        Ok(())
    }

    pub fn sleep(&mut self, now: DateTime<Utc>, rules: &PetRules) -> Result<(), ActionRefused> {
        self.check_ready(PetAction::Sleep, now)?;
        let nap = Duration::seconds(rules.sleep_secs);
        self.sleeping = true;
        self.sleep_until = Some(now + nap);
        self.cooldowns
            .set(PetAction::Sleep, now + rules.cooldown_for(PetAction::Sleep));
        debug!("pet went to sleep until {}", now + nap);
        Ok(())
    }

    /// Wake the pet once its nap deadline has passed. Returns true on wake-up.
    pub fn wake_if_due(&mut self, now: DateTime<Utc>, rules: &PetRules) -> bool {
        if !self.sleeping {
            return false;
        }
        // A sleeping record without a deadline (older saves) wakes right away.
        let due = self.sleep_until.map_or(true, |until| until <= now);
        if !due {
            return false;
        }
        self.sleeping = false;
        self.sleep_until = None;
        self.energy = adjust_stat(self.energy, rules.sleep_energy);
        debug!("pet woke up, energy now {}", self.energy);
        true
    }

    /// Apply a single decay step if the interval has elapsed since the last one.
    pub fn apply_decay(&mut self, now: DateTime<Utc>, rules: &PetRules) -> bool {
        if now - self.last_tick < Duration::seconds(rules.decay_interval_secs) {
            return false;
        }
        let step = rules.decay_amount.saturating_neg();
        self.apply_effects(StatDelta::new(step, step, step));
        self.last_tick = now;
        debug!(
            "decay applied: hunger {} energy {} happiness {}",
            self.hunger, self.energy, self.happiness
        );
        true
    }

    pub fn mood(&self, rules: &PetRules) -> Mood {
        let low = rules.low_stat_threshold;
        if self.sleeping {
            Mood::Sleeping
        } else if self.hunger < low {
            Mood::Hungry
        } else if self.energy < low {
            Mood::Tired
        } else if self.happiness < low {
            Mood::Sad
        } else {
            Mood::Happy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn feed_raises_hunger_and_starts_cooldown() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        pet.feed(t(0), &rules).unwrap();
        assert_eq!(pet.hunger, 70);
        assert_eq!(pet.cooldown_remaining(PetAction::Feed, t(10)), Duration::seconds(50));

        let before = pet.clone();
        let refused = pet.feed(t(59), &rules).unwrap_err();
        assert!(matches!(refused, ActionRefused::OnCooldown { action: "feed", .. }));
        assert_eq!(pet, before);

        pet.feed(t(60), &rules).unwrap();
        assert_eq!(pet.hunger, 90);
    }

    #[test]
    fn play_trades_energy_for_happiness() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        pet.play(t(0), &rules).unwrap();
        assert_eq!((pet.happiness, pet.energy), (65, 40));
    }

    #[test]
    fn stats_never_leave_range() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        pet.hunger = 95;
        pet.feed(t(0), &rules).unwrap();
        assert_eq!(pet.hunger, 100);
        pet.apply_effects(StatDelta::new(-500, 500, 0));
        assert_eq!((pet.hunger, pet.energy), (0, 100));
    }

    #[test]
    fn extreme_configured_deltas_stay_in_range() {
        let rules = PetRules {
            feed_hunger: i32::MAX,
            play_energy_cost: i32::MIN,
            decay_amount: i32::MIN,
            ..PetRules::default()
        };
        let mut pet = PetRecord::new(t(0));
        pet.feed(t(0), &rules).unwrap();
        assert_eq!(pet.hunger, 100);
        pet.play(t(0), &rules).unwrap();
        assert_eq!(pet.energy, 100);
        assert!(pet.apply_decay(t(600), &rules));
        assert_eq!((pet.hunger, pet.energy, pet.happiness), (100, 100, 100));
    }

    #[test]
    fn sleep_blocks_actions_until_wake() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        pet.sleep(t(0), &rules).unwrap();
        assert_eq!(pet.mood(&rules), Mood::Sleeping);
        assert_eq!(pet.feed(t(1), &rules), Err(ActionRefused::Sleeping));
        assert_eq!(pet.play(t(1), &rules), Err(ActionRefused::Sleeping));
        assert_eq!(pet.sleep(t(1), &rules), Err(ActionRefused::AlreadySleeping));

        assert!(!pet.wake_if_due(t(29), &rules));
        assert!(pet.wake_if_due(t(30), &rules));
        assert!(!pet.sleeping);
        assert_eq!(pet.energy, 75);
        assert!(!pet.wake_if_due(t(31), &rules));
    }

    #[test]
    fn decay_steps_once_per_check() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        assert!(!pet.apply_decay(t(119), &rules));
        assert!(pet.apply_decay(t(600), &rules));
        assert_eq!((pet.hunger, pet.energy, pet.happiness), (45, 45, 45));
        assert_eq!(pet.last_tick, t(600));
        assert!(!pet.apply_decay(t(601), &rules));
    }

    #[test]
    fn mood_follows_priority() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        assert_eq!(pet.mood(&rules), Mood::Happy);
        pet.happiness = 10;
        assert_eq!(pet.mood(&rules), Mood::Sad);
        pet.energy = 10;
        assert_eq!(pet.mood(&rules), Mood::Tired);
        pet.hunger = 10;
        assert_eq!(pet.mood(&rules), Mood::Hungry);
    }

    #[test]
    fn dead_pet_refuses_everything() {
        let rules = PetRules::default();
        let mut pet = PetRecord::new(t(0));
        pet.energy = 0;
        assert!(pet.is_dead());
        assert_eq!(pet.feed(t(0), &rules), Err(ActionRefused::Dead));
        assert_eq!(pet.sleep(t(0), &rules), Err(ActionRefused::Dead));
        pet.reset(t(5));
        assert!(!pet.is_dead());
        assert_eq!(pet.last_tick, t(5));
    }
}
