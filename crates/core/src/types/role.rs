//! User roles for role-gated write access.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role name.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown role: {0}")]
pub struct RoleParseError(String);

/// Role assigned to an identity.
///
/// Roles carry no hierarchy: a capability lists the roles allowed to perform
/// it, and membership in that list is the entire check. `admin` does not
/// implicitly gain `volunteer` capabilities.
///
/// Stored as lowercase text in the `users.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Organization staff with full write access.
    Admin,
    /// Field volunteers who record activities and distributions.
    Volunteer,
    /// Aid recipients; the lowest-privilege role and the registration default.
    #[default]
    Beneficiary,
}

impl Role {
    /// The canonical lowercase name, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Volunteer => "volunteer",
            Self::Beneficiary => "beneficiary",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "volunteer" => Ok(Self::Volunteer),
            "beneficiary" => Ok(Self::Beneficiary),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

// SQLx support (with postgres feature): roles live in a TEXT column.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lowest_privilege() {
        assert_eq!(Role::default(), Role::Beneficiary);
    }

    #[test]
    fn test_from_str_roundtrip() {
        for role in [Role::Admin, Role::Volunteer, Role::Beneficiary] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("superuser".parse::<Role>().is_err());
        // Parsing is strict: stored values are already lowercase
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Volunteer).unwrap(), "\"volunteer\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
