//! Store trait definition.
//!
//! The `LogStore` trait is the persistence contract the presentation layer
//! consumes. Every user-owned operation takes an explicit `UserContext`
//! instead of reading ambient session state.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use uuid::Uuid;

use super::types::{
    Grade, LogFields, NewProfile, PersonalBest, Profile, UserContext, WorkoutLog,
};
use crate::catalog::Exercise;
use crate::error::Result;
use crate::tonnage::RawSet;

/// Storage interface for training logs and reference data.
///
/// All implementations must ensure:
/// - At most one log per (user, date)
/// - A log's `total_tonnage` equals the sum of its sets after every save
/// - Sets are fully replaced on save, never merged
pub trait LogStore: Send + Sync {
    /// Create a new store at the specified path and seed the exercise catalog.
    ///
    /// # Errors
    ///
    /// Returns `LiftLogError::Storage` if the file already exists or cannot
    /// be written.
    fn create(path: &Path) -> Result<()>
    where
        Self: Sized;

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// Returns `LiftLogError::NotFound` if the file does not exist.
    fn open(path: &Path) -> Result<Self>
    where
        Self: Sized;

    // --- Log operations ---

    /// Get the log and its full set list for a date.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(log))` if found, `Ok(None)` if not found.
    fn get_by_date(&self, user: &UserContext, date: NaiveDate) -> Result<Option<WorkoutLog>>;

    /// List logs with `start <= date <= end`, ordered by date ascending.
    fn get_by_date_range(
        &self,
        user: &UserContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutLog>>;

    /// List logs with `date >= start`, ordered by date ascending.
    fn get_since(&self, user: &UserContext, start: NaiveDate) -> Result<Vec<WorkoutLog>>;

    /// Upsert the log for `date` and replace all of its sets.
    ///
    /// The raw sets are validated and aggregated before anything is written;
    /// the stored total is always recomputed from the surviving sets.
    ///
    /// # Errors
    ///
    /// Returns `LiftLogError::Validation` if `sets` is non-empty and none of
    /// them are valid. Nothing is written in that case.
    fn save(
        &mut self,
        user: &UserContext,
        date: NaiveDate,
        fields: &LogFields,
        sets: &[RawSet],
    ) -> Result<WorkoutLog>;

    /// Delete the log for `date` and its sets.
    ///
    /// # Errors
    ///
    /// Returns `LiftLogError::NotFound` if no log exists for that date.
    fn delete(&mut self, user: &UserContext, date: NaiveDate) -> Result<()>;

    // --- Catalog ---

    /// List catalog exercises ordered by display order.
    fn list_exercises(&self) -> Result<Vec<Exercise>>;

    /// Catalog grouped by `{category}-{major_category}`.
    fn exercises_by_category(&self) -> Result<BTreeMap<String, Vec<Exercise>>> {
        Ok(crate::catalog::group_by_category(&self.list_exercises()?))
    }

    // --- Personal bests ---

    /// Get the personal-best row for a grade.
    fn get_personal_best(&self, user: &UserContext, grade: Grade) -> Result<Option<PersonalBest>>;

    /// Upsert the personal-best row for a grade.
    ///
    /// Records that are not strictly positive are discarded.
    fn save_personal_best(
        &mut self,
        user: &UserContext,
        grade: Grade,
        body_weight: Option<f64>,
        records: &BTreeMap<String, f64>,
    ) -> Result<PersonalBest>;

    /// List every personal-best row for the user, in grade order.
    fn list_personal_bests(&self, user: &UserContext) -> Result<Vec<PersonalBest>>;

    // --- Profiles ---

    /// Create a profile.
    ///
    /// # Errors
    ///
    /// Returns `LiftLogError::InvalidInput` if the email is already registered.
    fn create_profile(&mut self, profile: &NewProfile) -> Result<Uuid>;

    /// Get a profile by id.
    fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>>;

    /// Get a profile by email.
    fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>>;

    /// List every profile, newest first.
    fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// Replace a profile's password hash.
    ///
    /// # Errors
    ///
    /// Returns `LiftLogError::NotFound` if no profile has that id.
    fn update_password_hash(&mut self, id: &Uuid, password_hash: &str) -> Result<()>;

    // --- Maintenance ---

    /// Check store integrity.
    ///
    /// Verifies:
    /// - Foreign key relationships
    /// - Every log total equals the sum of its sets' tonnage
    fn check_integrity(&self) -> Result<()>;
}
