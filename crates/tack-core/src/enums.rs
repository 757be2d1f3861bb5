//! Enum types for the tack board.
//!
//! Each enum has:
//! - Serialize as its canonical name (`"URGENT"`, `"BUG"`, `"overdue"`)
//! - Case-insensitive `FromStr`/Deserialize that rejects unknown names
//! - `as_str()`, `is_default()`, `Display` impl

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string names no variant of a board enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    /// The enum being parsed (e.g. "priority").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated list of accepted names.
    pub expected: String,
}

// ---------------------------------------------------------------------------
// Macro: defines a closed enum with canonical string names.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, kind = $kind:expr, default = $default:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Returns the canonical string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }

            /// Returns `true` if this is the default variant.
            pub fn is_default(&self) -> bool {
                *self == Self::$default
            }

            fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ParseEnumError {
                    kind: $kind,
                    value: s.to_owned(),
                    expected: Self::expected(),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ===========================================================================
// Priority
// ===========================================================================

define_enum! {
    /// Urgency of a task. Ordered from least to most urgent.
    Priority, kind = "priority", default = Medium,
    variants: [
        (Low, "LOW"),
        (Medium, "MEDIUM"),
        (High, "HIGH"),
        (Urgent, "URGENT"),
    ]
}

// ===========================================================================
// TaskType
// ===========================================================================

define_enum! {
    /// Categorises the kind of work.
    TaskType, kind = "task type", default = Task,
    variants: [
        (Task, "TASK"),
        (Bug, "BUG"),
    ]
}

impl TaskType {
    /// Returns the other type (TASK <-> BUG), as offered by the card context menu.
    pub fn toggled(self) -> Self {
        match self {
            Self::Task => Self::Bug,
            Self::Bug => Self::Task,
        }
    }
}

// ===========================================================================
// DueBucket
// ===========================================================================

define_enum! {
    /// Relative due-date window used by the filter bar.
    ///
    /// `None` places no restriction on the due date.
    DueBucket, kind = "due bucket", default = None,
    variants: [
        (None, "none"),
        (Overdue, "overdue"),
        (Today, "today"),
        (Week, "week"),
        (Month, "month"),
    ]
}

impl DueBucket {
    /// Length of the inclusive forward window in days, for windowed buckets.
    pub fn window_days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            _ => Option::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert!(Priority::Medium.is_default());
        assert!(!Priority::Urgent.is_default());
    }

    #[test]
    fn priority_orders_by_urgency() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::High < Priority::Urgent);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!("urgent".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(" High ".parse::<Priority>().unwrap(), Priority::High);
    }

    #[test]
    fn priority_parse_rejects_unknown() {
        let err = "critical".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "priority");
        assert!(err.to_string().contains("LOW, MEDIUM, HIGH, URGENT"));
    }

    #[test]
    fn priority_serializes_as_upper_case() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, r#""URGENT""#);
        let back: Priority = serde_json::from_str(r#""low""#).unwrap();
        assert_eq!(back, Priority::Low);
    }

    #[test]
    fn unknown_task_type_fails_to_deserialize() {
        assert!(serde_json::from_str::<TaskType>(r#""EPIC""#).is_err());
    }

    #[test]
    fn task_type_toggles() {
        assert_eq!(TaskType::Task.toggled(), TaskType::Bug);
        assert_eq!(TaskType::Bug.toggled(), TaskType::Task);
    }

    #[test]
    fn due_bucket_windows() {
        assert_eq!(DueBucket::Week.window_days(), Some(7));
        assert_eq!(DueBucket::Month.window_days(), Some(30));
        assert_eq!(DueBucket::Today.window_days(), None);
        assert!(DueBucket::default().is_default());
        assert_eq!(DueBucket::Overdue.to_string(), "overdue");
    }
}
