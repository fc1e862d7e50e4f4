//! Core data types for the storage layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{self, BodyPart};
use crate::error::LiftLogError;

/// Request-scoped identity passed to every user-owned store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: Uuid,
}

impl UserContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Time-of-day slot a session was trained in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "早朝")]
    EarlyMorning,
    #[serde(rename = "午前")]
    Morning,
    #[serde(rename = "午後")]
    Afternoon,
    #[serde(rename = "夜")]
    Night,
}

pub const ALL_TIME_SLOTS: [TimeSlot; 4] = [
    TimeSlot::EarlyMorning,
    TimeSlot::Morning,
    TimeSlot::Afternoon,
    TimeSlot::Night,
];

impl TimeSlot {
    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "早朝",
            TimeSlot::Morning => "午前",
            TimeSlot::Afternoon => "午後",
            TimeSlot::Night => "夜",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = LiftLogError;

    /// Accepts the stored label or an English alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "早朝" | "early-morning" | "early_morning" => Ok(TimeSlot::EarlyMorning),
            "午前" | "morning" => Ok(TimeSlot::Morning),
            "午後" | "afternoon" => Ok(TimeSlot::Afternoon),
            "夜" | "night" => Ok(TimeSlot::Night),
            other => Err(LiftLogError::InvalidInput(format!(
                "Unknown time zone slot: {} (use 早朝, 午前, 午後 or 夜)",
                other
            ))),
        }
    }
}

/// A persisted set, owned by exactly one log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: Uuid,
    pub log_id: Uuid,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub sets: i64,
    pub tonnage: f64,
    pub target_body_part: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutSet {
    /// Body part used for analysis: stored label, else a fresh classification.
    pub fn body_part(&self) -> BodyPart {
        classify::resolve(self.target_body_part.as_deref(), &self.exercise_name)
    }
}

/// One user's training log for a calendar date, with its sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time_zone: Option<TimeSlot>,
    pub total_tonnage: f64,
    pub sleep_hours: Option<f64>,
    pub nutrition_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sets: Vec<WorkoutSet>,
}

/// Log-level fields supplied on save. The total is always derived from the
/// sets and never supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFields {
    pub time_zone: Option<TimeSlot>,
    pub sleep_hours: Option<f64>,
    pub nutrition_summary: Option<String>,
}

impl LogFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_zone(mut self, slot: TimeSlot) -> Self {
        self.time_zone = Some(slot);
        self
    }

    pub fn sleep_hours(mut self, hours: f64) -> Self {
        self.sleep_hours = Some(hours);
        self
    }

    pub fn nutrition_summary(mut self, summary: impl Into<String>) -> Self {
        self.nutrition_summary = Some(summary.into());
        self
    }
}

/// Competitive age bracket used to bucket personal bests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "中1")]
    JuniorHigh1,
    #[serde(rename = "中2")]
    JuniorHigh2,
    #[serde(rename = "中3")]
    JuniorHigh3,
    #[serde(rename = "高1")]
    High1,
    #[serde(rename = "高2")]
    High2,
    #[serde(rename = "高3")]
    High3,
    #[serde(rename = "大1")]
    University1,
    #[serde(rename = "大2")]
    University2,
    #[serde(rename = "大3")]
    University3,
    #[serde(rename = "大4")]
    University4,
    #[serde(rename = "社会人")]
    Adult,
}

pub const ALL_GRADES: [Grade; 11] = [
    Grade::JuniorHigh1,
    Grade::JuniorHigh2,
    Grade::JuniorHigh3,
    Grade::High1,
    Grade::High2,
    Grade::High3,
    Grade::University1,
    Grade::University2,
    Grade::University3,
    Grade::University4,
    Grade::Adult,
];

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::JuniorHigh1 => "中1",
            Grade::JuniorHigh2 => "中2",
            Grade::JuniorHigh3 => "中3",
            Grade::High1 => "高1",
            Grade::High2 => "高2",
            Grade::High3 => "高3",
            Grade::University1 => "大1",
            Grade::University2 => "大2",
            Grade::University3 => "大3",
            Grade::University4 => "大4",
            Grade::Adult => "社会人",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = LiftLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        ALL_GRADES
            .iter()
            .copied()
            .find(|grade| grade.label() == value)
            .ok_or_else(|| {
                LiftLogError::InvalidInput(format!(
                    "Unknown grade: {} (use one of {})",
                    value,
                    ALL_GRADES
                        .iter()
                        .map(|g| g.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Best lifts for one grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub grade: Grade,
    pub body_weight: Option<f64>,
    /// Lift code → best weight (kg).
    pub records: BTreeMap<String, f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = LiftLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(LiftLogError::Storage(format!("Invalid role: {}", other))),
        }
    }
}

/// An account profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// "{last} {first}", as used in export headers and file names.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// Builder for creating a profile. The password is hashed before it reaches
/// the store.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

impl NewProfile {
    pub fn new(
        email: impl Into<String>,
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            display_name: None,
            role: Role::User,
            password_hash: password_hash.into(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
