use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::game::errors::PetError;
use crate::game::types::{
    ActivityStats, CompanionRecord, FriendRecord, PetRecord, SessionUser, UnlockedAchievement,
    UserRecord,
};

const TREE_LOCAL: &str = "local_storage";

/// Namespace shared by every key this crate writes.
pub const KEY_PREFIX: &str = "mv";
pub const USERS_KEY: &str = "mv:users";
pub const SESSION_KEY: &str = "mv:user";

/// Build a per-user key such as `mv:pet:<user id>`.
pub fn user_key(entity: &str, user_id: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, entity, user_id)
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct PetStoreBuilder {
    path: PathBuf,
}

impl PetStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<PetStore, PetError> {
        PetStore::open(self.path)
    }
}

/// Sled-backed key/value store holding one JSON string per logical entity.
///
/// Entries that fail to parse are logged and treated as absent, so a
/// corrupted record falls back to its default instead of locking the user out.
pub struct PetStore {
    _db: sled::Db,
    local: sled::Tree,
}

impl PetStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PetError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let local = db.open_tree(TREE_LOCAL)?;
        debug!("opened pet store at {}", path_ref.display());
        Ok(Self { _db: db, local })
    }

    // ------------------------------------------------------------------------
    // Raw string entries
    // ------------------------------------------------------------------------

    /// Read a raw string entry. Non UTF-8 bytes count as a malformed entry.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, PetError> {
        let Some(bytes) = self.local.get(key.as_bytes())? else {
            return Ok(None);
        };
        match std::str::from_utf8(&bytes) {
            Ok(text) => Ok(Some(text.to_string())),
            Err(e) => {
                warn!("ignoring non utf-8 entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), PetError> {
        self.local.insert(key.as_bytes(), value.as_bytes())?;
        self.local.flush()?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), PetError> {
        self.local.remove(key.as_bytes())?;
        self.local.flush()?;
        Ok(())
    }

    /// List every key under the store's namespace.
    pub fn keys(&self) -> Result<Vec<String>, PetError> {
        let mut keys = Vec::new();
        for entry in self.local.scan_prefix(KEY_PREFIX.as_bytes()) {
            let (key, _) = entry?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    // ------------------------------------------------------------------------
    // JSON entries
    // ------------------------------------------------------------------------

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PetError> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("ignoring malformed entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PetError> {
        let text = serde_json::to_string(value)?;
        self.set_item(key, &text)
    }

    fn get_integer<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, PetError> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };
        match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!("ignoring malformed integer entry {}", key);
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Users and session
    // ------------------------------------------------------------------------

    /// Load the user directory keyed by normalized username.
    pub fn get_users(&self) -> Result<BTreeMap<String, UserRecord>, PetError> {
        Ok(self.get_json(USERS_KEY)?.unwrap_or_default())
    }

    pub fn put_users(&self, users: &BTreeMap<String, UserRecord>) -> Result<(), PetError> {
        self.put_json(USERS_KEY, users)
    }

    pub fn get_session(&self) -> Result<Option<SessionUser>, PetError> {
        self.get_json(SESSION_KEY)
    }

    pub fn put_session(&self, session: &SessionUser) -> Result<(), PetError> {
        self.put_json(SESSION_KEY, session)
    }

    pub fn clear_session(&self) -> Result<(), PetError> {
        self.remove_item(SESSION_KEY)
    }

    // ------------------------------------------------------------------------
    // Per-user state
    // ------------------------------------------------------------------------

    pub fn get_pet(&self, user_id: &str) -> Result<Option<PetRecord>, PetError> {
        self.get_json(&user_key("pet", user_id))
    }

    pub fn put_pet(&self, user_id: &str, pet: &PetRecord) -> Result<(), PetError> {
        self.put_json(&user_key("pet", user_id), pet)
    }

    pub fn get_inventory_items(
        &self,
        user_id: &str,
    ) -> Result<Option<BTreeMap<String, u32>>, PetError> {
        self.get_json(&user_key("inventory", user_id))
    }

    pub fn put_inventory_items(
        &self,
        user_id: &str,
        items: &BTreeMap<String, u32>,
    ) -> Result<(), PetError> {
        self.put_json(&user_key("inventory", user_id), items)
    }

    /// Coin balance is stored as a bare decimal string.
    pub fn get_coins(&self, user_id: &str) -> Result<Option<u32>, PetError> {
        self.get_integer(&user_key("coins", user_id))
    }

    pub fn put_coins(&self, user_id: &str, coins: u32) -> Result<(), PetError> {
        self.set_item(&user_key("coins", user_id), &coins.to_string())
    }

    pub fn get_activity_stats(&self, user_id: &str) -> Result<Option<ActivityStats>, PetError> {
        self.get_json(&user_key("stats", user_id))
    }

    pub fn put_activity_stats(&self, user_id: &str, stats: &ActivityStats) -> Result<(), PetError> {
        self.put_json(&user_key("stats", user_id), stats)
    }

    pub fn get_achievements(
        &self,
        user_id: &str,
    ) -> Result<BTreeMap<String, UnlockedAchievement>, PetError> {
        Ok(self
            .get_json(&user_key("achievements", user_id))?
            .unwrap_or_default())
    }

    pub fn put_achievements(
        &self,
        user_id: &str,
        unlocked: &BTreeMap<String, UnlockedAchievement>,
    ) -> Result<(), PetError> {
        self.put_json(&user_key("achievements", user_id), unlocked)
    }

    pub fn get_friends(&self, user_id: &str) -> Result<Vec<FriendRecord>, PetError> {
        Ok(self.get_json(&user_key("friends", user_id))?.unwrap_or_default())
    }

    pub fn put_friends(&self, user_id: &str, friends: &[FriendRecord]) -> Result<(), PetError> {
        self.put_json(&user_key("friends", user_id), &friends)
    }

    pub fn get_companion(&self, user_id: &str) -> Result<Option<CompanionRecord>, PetError> {
        self.get_json(&user_key("companion", user_id))
    }

    /// `None` removes the entry.
    pub fn put_companion(
        &self,
        user_id: &str,
        companion: Option<&CompanionRecord>,
    ) -> Result<(), PetError> {
        let key = user_key("companion", user_id);
        match companion {
            Some(record) => self.put_json(&key, record),
            None => self.remove_item(&key),
        }
    }

    /// Last social interaction, stored as epoch milliseconds.
    pub fn get_last_interaction(&self, user_id: &str) -> Result<Option<DateTime<Utc>>, PetError> {
        Ok(self
            .get_integer::<i64>(&user_key("lastInteraction", user_id))?
            .and_then(DateTime::<Utc>::from_timestamp_millis))
    }

    pub fn put_last_interaction(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), PetError> {
        self.set_item(
            &user_key("lastInteraction", user_id),
            &at.timestamp_millis().to_string(),
        )
    }
}
