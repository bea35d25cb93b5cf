//! Username and PIN validation for the local login flow.

/// Username validation errors with helpful messages
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Username is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Username contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Username contains path separators (/ or \\)")]
    PathTraversal,
}

/// PIN validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN cannot be empty")]
    Empty,

    #[error("PIN must have at least {min} characters")]
    TooShort { min: usize },

    #[error("PIN is too long (maximum {max} characters)")]
    TooLong { max: usize },
}

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 30;
pub const PIN_MIN_CHARS: usize = 4;
pub const PIN_MAX_CHARS: usize = 64;

/// Normalize a username the way the user directory keys it: trimmed and lowercased.
///
/// Two spellings that differ only in case or surrounding whitespace refer to the
/// same account.
pub fn normalize_username(raw: &str) -> Result<String, UsernameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UsernameError::Empty);
    }

    let char_count = trimmed.chars().count();
    if char_count < USERNAME_MIN_CHARS {
        return Err(UsernameError::TooShort {
            min: USERNAME_MIN_CHARS,
        });
    }
    if char_count > USERNAME_MAX_CHARS {
        return Err(UsernameError::TooLong {
            max: USERNAME_MAX_CHARS,
        });
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(UsernameError::PathTraversal);
    }

    // Keys are built as `mv:<entity>:<id>`; a colon would make them ambiguous.
    let invalid: String = trimmed
        .chars()
        .filter(|c| c.is_control() || *c == ':')
        .map(|c| {
            if c.is_control() {
                format!("\\u{{{:04x}}}", c as u32)
            } else {
                c.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    if !invalid.is_empty() {
        return Err(UsernameError::InvalidCharacters { chars: invalid });
    }

    Ok(trimmed.to_lowercase())
}

/// Validate a PIN before it is checked or stored. The PIN itself is not trimmed.
pub fn validate_pin(pin: &str) -> Result<(), PinError> {
    if pin.trim().is_empty() {
        return Err(PinError::Empty);
    }
    let len = pin.chars().count();
    if len < PIN_MIN_CHARS {
        return Err(PinError::TooShort { min: PIN_MIN_CHARS });
    }
    if len > PIN_MAX_CHARS {
        return Err(PinError::TooLong { max: PIN_MAX_CHARS });
    }
    Ok(())
}
