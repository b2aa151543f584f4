//! Record types for the six CRM entities.
//!
//! Relationships are plain identifier columns (`owner_id`, `account_id`, ...);
//! nothing here holds a reference to another record.

/// Upper-case string enum with `as_str`, `FromStr`, `TryFrom<String>` (for
/// `#[sqlx(try_from = "String")]` columns) and serde support.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident ($label:literal) { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::database::models::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::database::models::UnknownVariant {
                        kind: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::database::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub mod account;
pub mod activity;
pub mod contact;
pub mod lead;
pub mod opportunity;
pub mod user;

pub use account::Account;
pub use activity::{Activity, ActivityStatus, ActivityTarget, ActivityType};
pub use contact::{Contact, PrimaryContactError};
pub use lead::{Lead, LeadSource, LeadStatus, NewLead};
pub use opportunity::{NewOpportunity, Opportunity, OpportunityStage};
pub use user::{NewUser, Role, User};

/// A string that does not name any member of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Field-level invariant violations on a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("{0} is required")]
    MissingRequiredField(&'static str),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("Activity must reference exactly one of lead, contact or opportunity ({0} given)")]
    ActivityTargetCount(usize),
}

/// Wall-clock local time, the resolution every record timestamp is stored at.
pub fn timestamp_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::MissingRequiredField(field));
    }
    Ok(())
}
