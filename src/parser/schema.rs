//! Typed records extracted from trace event blocks.
//!
//! Only the five fields the statistics need are modelled here.
//! Everything else in the trace format is ignored by the reader.

use crate::utils::config::{
    CATEGORY_OTHER, CATEGORY_RUNTIME, CATEGORY_TASK, KIND_POP_STATE, KIND_PUSH_STATE,
    KIND_SET_STATE,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Event kind carried by the `E:` line of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Same-level state transition
    SetState,
    /// Entry into a nested sub-state
    PushState,
    /// Return from a nested sub-state
    PopState,
    /// Any other event type (kept verbatim, never drives nesting)
    Other(String),
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            KIND_SET_STATE => EventKind::SetState,
            KIND_PUSH_STATE => EventKind::PushState,
            KIND_POP_STATE => EventKind::PopState,
            other => EventKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::SetState => f.write_str(KIND_SET_STATE),
            EventKind::PushState => f.write_str(KIND_PUSH_STATE),
            EventKind::PopState => f.write_str(KIND_POP_STATE),
            EventKind::Other(s) => f.write_str(s),
        }
    }
}

/// Coarse classification of a state, used for time buckets
///
/// Parsing never fails: an unknown string is kept as `Unrecognized`
/// and rejected later, when buckets are computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Runtime,
    Task,
    Other,
    Unrecognized(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Runtime => CATEGORY_RUNTIME,
            Category::Task => CATEGORY_TASK,
            Category::Other => CATEGORY_OTHER,
            Category::Unrecognized(s) => s,
        }
    }
}

impl FromStr for Category {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            CATEGORY_RUNTIME => Category::Runtime,
            CATEGORY_TASK => Category::Task,
            CATEGORY_OTHER => Category::Other,
            other => Category::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_else(|never| match never {}))
    }
}

/// One parsed event block
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: EventKind,

    /// State label (`N:`), absent for some kinds
    pub name: Option<String>,

    /// State category (`C:`)
    pub category: Option<Category>,

    /// Worker the event belongs to (`W:`)
    pub worker_id: i64,

    /// Event time in seconds (`S:`)
    pub start_time: f64,
}

impl Record {
    pub fn new(
        kind: EventKind,
        name: Option<&str>,
        category: Option<Category>,
        worker_id: i64,
        start_time: f64,
    ) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
            category,
            worker_id,
            start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("SetState".parse::<EventKind>().unwrap(), EventKind::SetState);
        assert_eq!("PushState".parse::<EventKind>().unwrap(), EventKind::PushState);
        assert_eq!("PopState".parse::<EventKind>().unwrap(), EventKind::PopState);
        assert_eq!(
            "NewMemoryNode".parse::<EventKind>().unwrap(),
            EventKind::Other("NewMemoryNode".to_string())
        );
    }

    #[test]
    fn test_category_round_trip() {
        for s in ["Runtime", "Task", "Other", "Bogus"] {
            let cat: Category = s.parse().unwrap();
            assert_eq!(cat.to_string(), s);
        }
        assert_eq!(
            "Bogus".parse::<Category>().unwrap(),
            Category::Unrecognized("Bogus".to_string())
        );
    }

    #[test]
    fn test_category_serializes_as_string() {
        let json = serde_json::to_string(&Category::Task).unwrap();
        assert_eq!(json, "\"Task\"");
    }
}
