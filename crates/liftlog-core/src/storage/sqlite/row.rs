//! Row types for database queries.
//!
//! Rows hold raw column values; conversion into domain types parses ids,
//! timestamps, and enumerated labels and reports malformed data as storage
//! errors.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{LiftLogError, Result};
use crate::storage::types::{Grade, PersonalBest, Profile, TimeSlot, WorkoutSet};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| LiftLogError::Storage(format!("Invalid {}: {}", what, e)))
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| LiftLogError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| LiftLogError::Storage(format!("Invalid log date {}: {}", value, e)))
}

/// Raw row from the logs table. Sets are loaded separately.
#[derive(Debug)]
pub struct LogRow {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub time_zone: Option<String>,
    pub total_tonnage: f64,
    pub sleep_hours: Option<f64>,
    pub nutrition_summary: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl LogRow {
    pub const COLUMNS: &'static str = "id, user_id, date, time_zone, total_tonnage, sleep_hours, nutrition_summary, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: row.get(2)?,
            time_zone: row.get(3)?,
            total_tonnage: row.get(4)?,
            sleep_hours: row.get(5)?,
            nutrition_summary: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    pub fn time_slot(&self) -> Result<Option<TimeSlot>> {
        self.time_zone
            .as_deref()
            .map(|label| {
                label
                    .parse::<TimeSlot>()
                    .map_err(|e| LiftLogError::Storage(format!("Invalid time_zone: {}", e)))
            })
            .transpose()
    }
}

/// Raw row from the sets table.
#[derive(Debug)]
pub struct SetRow {
    pub id: String,
    pub log_id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub sets: i64,
    pub tonnage: f64,
    pub target_body_part: Option<String>,
    pub created_at: String,
}

impl SetRow {
    pub const COLUMNS: &'static str =
        "id, log_id, exercise_name, weight, reps, sets, tonnage, target_body_part, created_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            log_id: row.get(1)?,
            exercise_name: row.get(2)?,
            weight: row.get(3)?,
            reps: row.get(4)?,
            sets: row.get(5)?,
            tonnage: row.get(6)?,
            target_body_part: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl TryFrom<SetRow> for WorkoutSet {
    type Error = LiftLogError;

    fn try_from(row: SetRow) -> Result<Self> {
        Ok(WorkoutSet {
            id: parse_uuid(&row.id, "set id")?,
            log_id: parse_uuid(&row.log_id, "log id")?,
            exercise_name: row.exercise_name,
            weight: row.weight,
            reps: row.reps,
            sets: row.sets,
            tonnage: row.tonnage,
            target_body_part: row.target_body_part,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Raw row from the personal_bests table.
#[derive(Debug)]
pub struct PersonalBestRow {
    pub id: String,
    pub user_id: String,
    pub grade: String,
    pub body_weight: Option<f64>,
    pub records_json: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PersonalBestRow {
    pub const COLUMNS: &'static str =
        "id, user_id, grade, body_weight, records_json, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            grade: row.get(2)?,
            body_weight: row.get(3)?,
            records_json: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl TryFrom<PersonalBestRow> for PersonalBest {
    type Error = LiftLogError;

    fn try_from(row: PersonalBestRow) -> Result<Self> {
        let grade = row
            .grade
            .parse::<Grade>()
            .map_err(|e| LiftLogError::Storage(format!("Invalid grade: {}", e)))?;
        let records: BTreeMap<String, f64> = serde_json::from_str(&row.records_json)
            .map_err(|e| LiftLogError::Storage(format!("Invalid records JSON: {}", e)))?;
        Ok(PersonalBest {
            id: parse_uuid(&row.id, "personal best id")?,
            user_id: parse_uuid(&row.user_id, "user id")?,
            grade,
            body_weight: row.body_weight,
            records,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

/// Raw row from the profiles table.
#[derive(Debug)]
pub struct ProfileRow {
    pub id: String,
    pub email: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ProfileRow {
    pub const COLUMNS: &'static str = "id, email, last_name, first_name, display_name, role, password_hash, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            last_name: row.get(2)?,
            first_name: row.get(3)?,
            display_name: row.get(4)?,
            role: row.get(5)?,
            password_hash: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl TryFrom<ProfileRow> for Profile {
    type Error = LiftLogError;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(Profile {
            id: parse_uuid(&row.id, "profile id")?,
            email: row.email,
            last_name: row.last_name,
            first_name: row.first_name,
            display_name: row.display_name,
            role: row.role.parse()?,
            password_hash: row.password_hash,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
