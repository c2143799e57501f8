//! Value objects shared by all entities: the typed row identifiers.
//!
//! Every table uses an auto-incrementing integer primary key. The reference
//! columns (`user_id`, `post_id`, ...) are plain integers in the schema, the
//! newtypes below keep them apart in Rust so a `PostId` can never be passed
//! where a `UserId` is expected.

use std::fmt::{self, Formatter};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Name of the entity this identifier refers to, used in error messages.
            pub const ENTITY: &'static str = $entity;

            #[must_use]
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map($name)
            }
        }
    };
}

entity_id!(
    /// Primary key of the `users` table
    UserId,
    "user"
);
entity_id!(PostId, "post");
entity_id!(CommentId, "comment");
entity_id!(LikeId, "like");
entity_id!(ConnectionId, "connection");
entity_id!(MessageId, "message");
entity_id!(NotificationId, "notification");
entity_id!(OpportunityId, "opportunity");
entity_id!(ApplicationId, "application");
entity_id!(EventId, "event");
entity_id!(RegistrationId, "event registration");
entity_id!(PasswordResetId, "password reset");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_their_numeric_value() {
        assert_eq!(UserId(42).to_string(), "42");
        assert_eq!(PostId::from(7).value(), 7);
        assert_eq!(EventId::ENTITY, "event");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let value = toml::Value::try_from(OpportunityId(3)).unwrap();
        assert_eq!(value, toml::Value::Integer(3));
    }
}
