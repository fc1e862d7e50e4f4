//! Set validation and tonnage aggregation.
//!
//! Raw set entries come straight from user input. Entries that fail
//! validation are dropped from both the persisted list and the total; only a
//! non-empty request with no surviving entries is rejected.

use serde::{Deserialize, Serialize};

use crate::classify::{classify, BodyPart};
use crate::error::{LiftLogError, Result};

/// A set entry as entered by the user, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSet {
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub sets: i64,
}

impl RawSet {
    pub fn new(exercise_name: impl Into<String>, weight: f64, reps: i64, sets: i64) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            weight,
            reps,
            sets,
        }
    }

    /// Whether the entry can be persisted.
    pub fn is_valid(&self) -> bool {
        !self.exercise_name.trim().is_empty()
            && self.weight.is_finite()
            && self.weight > 0.0
            && self.reps > 0
            && self.sets > 0
    }

    /// weight × reps × sets.
    pub fn tonnage(&self) -> f64 {
        self.weight * self.reps as f64 * self.sets as f64
    }

    /// Parse a `NAME:WEIGHT:REPS:SETS` spec.
    ///
    /// Numbers that fail to parse become zero, so the entry is later dropped
    /// by validation instead of aborting the whole save.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let parts: Vec<&str> = spec.rsplitn(4, ':').collect();
        if parts.len() != 4 {
            return Err(LiftLogError::InvalidInput(format!(
                "Invalid set: {} (expected NAME:WEIGHT:REPS:SETS)",
                spec
            )));
        }
        // rsplitn yields fields right to left.
        let sets = parts[0].trim().parse::<i64>().unwrap_or(0);
        let reps = parts[1].trim().parse::<i64>().unwrap_or(0);
        let weight = parts[2].trim().parse::<f64>().unwrap_or(0.0);
        let exercise_name = parts[3].trim().to_string();
        Ok(Self {
            exercise_name,
            weight,
            reps,
            sets,
        })
    }
}

/// A validated set, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidSet {
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub sets: i64,
    pub tonnage: f64,
    pub target_body_part: BodyPart,
}

/// Result of aggregating a set list.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub sets: Vec<ValidSet>,
    pub total_tonnage: f64,
    /// Number of requested entries that were dropped.
    pub dropped: usize,
}

/// Validate entries, compute per-entry tonnage, classify, and total.
///
/// # Errors
///
/// Returns `LiftLogError::Validation` when `raw` is non-empty and no entry
/// passes validation.
pub fn aggregate(raw: &[RawSet]) -> Result<Aggregate> {
    let sets: Vec<ValidSet> = raw
        .iter()
        .filter(|entry| entry.is_valid())
        .map(|entry| ValidSet {
            exercise_name: entry.exercise_name.trim().to_string(),
            weight: entry.weight,
            reps: entry.reps,
            sets: entry.sets,
            tonnage: entry.tonnage(),
            target_body_part: classify(&entry.exercise_name),
        })
        .collect();

    if sets.is_empty() && !raw.is_empty() {
        return Err(LiftLogError::Validation(
            "No valid sets: weight, reps and sets must all be greater than zero".to_string(),
        ));
    }

    let total_tonnage = sets.iter().fold(0.0, |acc, s| acc + s.tonnage);
    let dropped = raw.len() - sets.len();
    if dropped > 0 {
        log::debug!("Dropped {} invalid set entries", dropped);
    }

    Ok(Aggregate {
        sets,
        total_tonnage,
        dropped,
    })
}
