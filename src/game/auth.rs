//! Local username + PIN login.
//!
//! The first login for a username creates the account; later logins must
//! present the same PIN. PINs are stored as Argon2id PHC strings.

use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Utc};
use log::{info, warn};
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::game::errors::PetError;
use crate::game::storage::PetStore;
use crate::game::types::{SessionUser, UserRecord};
use crate::validation::{normalize_username, validate_pin};

/// Argon2 instance used to hash and verify PINs.
pub struct PinHasher {
    argon2: Argon2<'static>,
}

impl Default for PinHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PinHasher {
    /// Use explicit Argon2id parameters, or the crate defaults when `None`.
    pub fn new(params: Option<Params>) -> Self {
        let argon2 = match params {
            Some(p) => Argon2::new(Algorithm::Argon2id, Version::V0x13, p),
            None => Argon2::default(),
        };
        Self { argon2 }
    }

    pub fn hash(&self, pin: &str) -> Result<String, PetError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| PetError::Credential(format!("PIN hash failure: {e}")))?;
        Ok(hash.to_string())
    }

    pub fn verify(&self, pin: &str, stored: &str) -> Result<bool, PetError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| PetError::Credential(format!("corrupt PIN hash: {e}")))?;
        Ok(self.argon2.verify_password(pin.as_bytes(), &parsed).is_ok())
    }
}

/// Log in, creating the account on first use, and persist the session.
pub fn login(
    store: &PetStore,
    hasher: &PinHasher,
    username: &str,
    pin: &str,
    now: DateTime<Utc>,
) -> Result<SessionUser, PetError> {
    let username = normalize_username(username)?;
    validate_pin(pin)?;

    let mut users = store.get_users()?;
    let session = match users.get(&username) {
        Some(existing) => {
            if !hasher.verify(pin, &existing.pin_hash)? {
                warn!("incorrect PIN for {}", username);
                return Err(PetError::IncorrectPin);
            }
            info!("user {} logged in", username);
            SessionUser::from(existing)
        }
        None => {
            let record = UserRecord {
                id: uuid::Uuid::new_v4().to_string(),
                username: username.clone(),
                pin_hash: hasher.hash(pin)?,
                created_at: now,
            };
            let session = SessionUser::from(&record);
            users.insert(username.clone(), record);
            store.put_users(&users)?;
            info!("created user {} ({})", username, session.id);
            session
        }
    };

    store.put_session(&session)?;
    Ok(session)
}

/// End the session. Per-user game state is kept for the next login.
pub fn logout(store: &PetStore) -> Result<Option<SessionUser>, PetError> {
    let previous = store.get_session()?;
    store.clear_session()?;
    if let Some(user) = &previous {
        info!("user {} logged out", user.username);
    }
    Ok(previous)
}

pub fn current_session(store: &PetStore) -> Result<Option<SessionUser>, PetError> {
    store.get_session()
}

/// The active session, or `NotLoggedIn`.
pub fn require_session(store: &PetStore) -> Result<SessionUser, PetError> {
    current_session(store)?.ok_or(PetError::NotLoggedIn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::storage::PetStoreBuilder;
    use tempfile::TempDir;

    fn fast_hasher() -> PinHasher {
        PinHasher::new(Params::new(8, 1, 1, None).ok())
    }

    fn setup_test_store() -> (PetStore, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = PetStoreBuilder::new(dir.path()).open().expect("store");
        (store, dir)
    }

    #[test]
    fn first_login_creates_user() {
        let (store, _dir) = setup_test_store();
        let hasher = fast_hasher();
        let session = login(&store, &hasher, "  Alice ", "1234", Utc::now()).unwrap();
        assert_eq!(session.username, "alice");

        let users = store.get_users().unwrap();
        let record = users.get("alice").unwrap();
        assert_eq!(record.id, session.id);
        assert_ne!(record.pin_hash, "1234");
        assert!(record.pin_hash.starts_with("$argon2id$"));
        assert_eq!(current_session(&store).unwrap(), Some(session));
    }

    #[test]
    fn later_login_reuses_account_and_checks_pin() {
        let (store, _dir) = setup_test_store();
        let hasher = fast_hasher();
        let first = login(&store, &hasher, "bob", "4321", Utc::now()).unwrap();
        logout(&store).unwrap();

        let err = login(&store, &hasher, "BOB", "0000", Utc::now()).unwrap_err();
        assert!(matches!(err, PetError::IncorrectPin));
        assert!(current_session(&store).unwrap().is_none());

        let again = login(&store, &hasher, "Bob", "4321", Utc::now()).unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(store.get_users().unwrap().len(), 1);
    }

    #[test]
    fn rejects_bad_input_before_touching_store() {
        let (store, _dir) = setup_test_store();
        let hasher = fast_hasher();
        assert!(matches!(
            login(&store, &hasher, "   ", "1234", Utc::now()),
            Err(PetError::InvalidUsername(_))
        ));
        assert!(matches!(
            login(&store, &hasher, "carol", "12", Utc::now()),
            Err(PetError::InvalidPinFormat(_))
        ));
        assert!(store.get_users().unwrap().is_empty());
    }

    #[test]
    fn logout_without_session_is_harmless() {
        let (store, _dir) = setup_test_store();
        assert!(logout(&store).unwrap().is_none());
        assert!(matches!(require_session(&store), Err(PetError::NotLoggedIn)));
    }
}
