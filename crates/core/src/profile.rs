//! Learner profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::Error;

/// CEFR proficiency level, ordered A1 < A2 < B1 < B2 < C1 < C2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    /// C1 and C2 learners
    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::C1 | Self::C2)
    }
}

impl std::fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            _ => Err(Error::UnknownLevel(s.to_string())),
        }
    }
}

/// Account role in the coaching product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Free,
    Student,
    Coach,
    Superuser,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Student => "student",
            Self::Coach => "coach",
            Self::Superuser => "superuser",
        }
    }

    /// Student and coach accounts have already paid for the product
    pub fn is_paying(&self) -> bool {
        matches!(self, Self::Student | Self::Coach)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "student" => Ok(Self::Student),
            "coach" => Ok(Self::Coach),
            "superuser" => Ok(Self::Superuser),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}

/// Snapshot of a learner supplied by the account subsystem
///
/// The engine reads it and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID
    pub user_id: String,

    /// Current proficiency level
    pub current_level: ProficiencyLevel,

    /// Account role
    pub current_role: AccountRole,

    /// Total coaching sessions attended
    #[serde(default)]
    pub total_sessions: u32,

    /// Account creation time
    pub join_date: DateTime<Utc>,

    /// Last time the user was seen
    pub last_active: DateTime<Utc>,

    #[serde(default)]
    pub modules_completed: BTreeSet<String>,

    #[serde(default)]
    pub weak_areas: BTreeSet<String>,

    #[serde(default)]
    pub strong_areas: BTreeSet<String>,
}

impl UserProfile {
    /// Create a profile with no activity history beyond the join date
    pub fn new(
        user_id: impl Into<String>,
        level: ProficiencyLevel,
        role: AccountRole,
        join_date: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            current_level: level,
            current_role: role,
            total_sessions: 0,
            join_date,
            last_active: join_date,
            modules_completed: BTreeSet::new(),
            weak_areas: BTreeSet::new(),
            strong_areas: BTreeSet::new(),
        }
    }

    /// Set the session count
    pub fn sessions(mut self, total_sessions: u32) -> Self {
        self.total_sessions = total_sessions;
        self
    }

    /// Set the last-active timestamp
    pub fn last_active(mut self, at: DateTime<Utc>) -> Self {
        self.last_active = at;
        self
    }

    /// Add completed modules
    pub fn modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules_completed.extend(modules.into_iter().map(Into::into));
        self
    }

    /// Add weak-area tags
    pub fn weak_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weak_areas.extend(areas.into_iter().map(Into::into));
        self
    }

    /// Whole days since the user was last active, never negative
    pub fn days_since_active(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_active).num_days().max(0)
    }

    /// Whole days since the account was created, never negative
    pub fn days_as_user(&self, now: DateTime<Utc>) -> i64 {
        (now - self.join_date).num_days().max(0)
    }
}
