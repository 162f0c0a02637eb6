//! Opaque user identity references.
//!
//! The catalog does not own user accounts; authorship is recorded against
//! identifiers issued by the external identity provider. Only the identifier
//! shape is validated here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user in the external identity provider.
///
/// Serialises as the canonical hyphenated UUID string.
///
/// # Examples
/// ```
/// use catalog::domain::UserId;
///
/// let id: UserId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse()?;
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// # Ok::<(), catalog::domain::UserIdError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

/// Validation errors for [`UserId`] parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    InvalidUuid { value: String },
}

impl fmt::Display for UserIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUuid { value } => write!(f, "'{value}' is not a valid user id"),
        }
    }
}

impl std::error::Error for UserIdError {}

impl UserId {
    /// Wrap an identifier issued by the identity provider.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID value.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| UserIdError::InvalidUuid {
                value: value.to_owned(),
            })
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_uuid_strings() {
        let id: UserId = "3fa85f64-5717-4562-b3fc-2c963f66afa6"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        let result: Result<UserId, _> = "not-a-uuid".parse();
        assert_eq!(
            result,
            Err(UserIdError::InvalidUuid {
                value: "not-a-uuid".to_owned()
            })
        );
    }

    #[test]
    fn serialises_as_a_string() {
        let id = UserId::new(Uuid::nil());
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
        let back: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
    }
}
