use thiserror::Error;

/// Errors that can arise while interacting with the pet store and game logic.
///
/// Gameplay refusals (cooldowns, a sleeping pet, not enough coins) are not
/// errors; they come back as `false` or an [`ActionRefused`](crate::game::ActionRefused).
#[derive(Debug, Error)]
pub enum PetError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around serde_json serialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] crate::validation::UsernameError),

    /// PIN failed format validation (too short, blank).
    #[error("invalid PIN: {0}")]
    InvalidPinFormat(#[from] crate::validation::PinError),

    /// The PIN did not match the stored credential for an existing user.
    #[error("incorrect PIN")]
    IncorrectPin,

    /// No session is active.
    #[error("not logged in")]
    NotLoggedIn,

    /// Item id is not in the food or medicine catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// Friend or companion kind is not in the catalog.
    #[error("unknown kind: {0}")]
    UnknownKind(String),

    /// Friend instance not found.
    #[error("friend not found: {0}")]
    FriendNotFound(String),

    /// Credential hashing or parsing failure.
    #[error("credential error: {0}")]
    Credential(String),
}
