//! Status conditions attached to a drive record
//!
//! Conditions report non-fatal failures (a mount that did not happen, a
//! format that is pending) without aborting reconciliation. A record holds
//! at most one condition per [`ConditionType`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aspect of a drive monitored by a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    Owned,
    Mounted,
    Formatted,
    Initialized,
}

/// Machine-readable cause recorded alongside a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionReason {
    Initialized,
    Added,
    NotMounted,
    NotFormatted,
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionType::Owned => "Owned",
            ConditionType::Mounted => "Mounted",
            ConditionType::Formatted => "Formatted",
            ConditionType::Initialized => "Initialized",
        };
        f.write_str(name)
    }
}

/// A single (type, state, reason, message) observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub status: bool,
    pub reason: ConditionReason,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    pub fn new(
        condition_type: ConditionType,
        status: bool,
        reason: ConditionReason,
        message: impl Into<String>,
    ) -> Self {
        Self {
            condition_type,
            status,
            reason,
            message: message.into(),
            last_transition_time: Some(Utc::now()),
        }
    }
}

/// Ordered set of conditions, one entry per type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the condition of the given type.
    pub fn get(&self, condition_type: ConditionType) -> Option<&Condition> {
        self.0.iter().find(|c| c.condition_type == condition_type)
    }

    /// Record an observation for `condition_type`.
    ///
    /// An existing entry is updated in place and keeps its position; its
    /// transition time only moves when `status` flips. Unknown types are
    /// appended.
    pub fn set(
        &mut self,
        condition_type: ConditionType,
        status: bool,
        reason: ConditionReason,
        message: impl Into<String>,
    ) {
        let message = message.into();
        match self.0.iter_mut().find(|c| c.condition_type == condition_type) {
            Some(existing) => {
                if existing.status != status {
                    existing.last_transition_time = Some(Utc::now());
                }
                existing.status = status;
                existing.reason = reason;
                existing.message = message;
            }
            None => self
                .0
                .push(Condition::new(condition_type, status, reason, message)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Condition>> for Conditions {
    fn from(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }
}
