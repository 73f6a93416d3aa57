//! Typed record identifiers.
//!
//! Every collection gets its own identifier type so a recipe id can never be
//! passed where a user id is expected.

use thiserror::Error;

/// Error returned when a path segment is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier: {0:?}")]
pub struct InvalidId(pub String);

/// Define a type-safe identifier wrapping a positive `i32`.
///
/// The generated type is `Copy`, serializes as a bare number, parses from
/// a string (rejecting zero and negatives), and maps to `INTEGER` columns
/// when the `postgres` feature is enabled.
///
/// ```rust
/// # use recipe_box_core::define_id;
/// define_id!(PantryId);
///
/// let id: PantryId = "7".parse().unwrap();
/// assert_eq!(id.as_i32(), 7);
/// assert!("0".parse::<PantryId>().is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database id.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database id.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::InvalidId;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.trim().parse::<i32>() {
                    Ok(id) if id > 0 => Ok(Self(id)),
                    _ => Err($crate::types::id::InvalidId(s.to_owned())),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(RecipeId);
define_id!(AdminId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        let id: RecipeId = "42".parse().unwrap();
        assert_eq!(id, RecipeId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_parse_rejects_non_positive_and_garbage() {
        assert!("0".parse::<UserId>().is_err());
        assert!("-3".parse::<UserId>().is_err());
        assert!("65f1c0ffee".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&AdminId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
