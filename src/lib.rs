//! # Petkeeper - a local virtual pet
//!
//! Petkeeper keeps a virtual pet alive from the command line. Each local user
//! logs in with a username and PIN and looks after one pet whose hunger,
//! energy and happiness decay over time.
//!
//! ## Features
//!
//! - **Pet Care**: Feed, play and sleep actions with per-action cooldowns and periodic stat decay.
//! - **Shop & Inventory**: Coins earned from play and achievements buy foods and medicines.
//! - **Achievements**: Activity counters unlock one-time coin rewards.
//! - **Social**: Friends with a shared interaction cooldown and a single life companion.
//! - **Security**: PINs are stored as Argon2id hashes.
//! - **Persistence**: Namespaced JSON entries in an embedded sled store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use petkeeper::config::Config;
//! use petkeeper::game::{Game, PetStore, PinHasher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = PetStore::open(config.storage.store_path())?;
//!     let hasher = PinHasher::new(config.argon2_params());
//!     let game = Game::new(store, hasher, config.pet.clone(), config.social.clone());
//!
//!     game.login("alice", "1234", Utc::now())?;
//!     let turn = game.feed(Utc::now())?;
//!     println!("fed: {:?}", turn.outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - pet state machine, inventory, achievements, social, storage and the game facade
//! - [`config`] - configuration loading and defaults
//! - [`validation`] - username and PIN validation

pub mod config;
pub mod game;
pub mod validation;
