//! SQLite storage backend.
//!
//! A single file-backed connection guarded by a mutex. Log saves run the log
//! upsert and the set replacement inside one transaction, so a failure
//! between the two steps leaves the previous state intact.

mod row;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::catalog::{seed_exercises, Exercise, ExerciseCategory};
use crate::error::{LiftLogError, Result};
use crate::storage::traits::LogStore;
use crate::storage::types::{
    Grade, LogFields, NewProfile, PersonalBest, Profile, UserContext, WorkoutLog, WorkoutSet,
    ALL_GRADES,
};
use crate::tonnage::{aggregate, RawSet};

use row::{
    parse_date, parse_timestamp, parse_uuid, LogRow, PersonalBestRow, ProfileRow, SetRow,
    DATE_FORMAT,
};

/// Store format version written to `meta` on creation.
pub const FORMAT_VERSION: &str = "1";

/// Tolerance for the tonnage invariant check.
const TONNAGE_EPSILON: f64 = 1e-6;

const SCHEMA: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE profiles (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        last_name TEXT NOT NULL,
        first_name TEXT NOT NULL,
        display_name TEXT,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE exercises (
        id TEXT PRIMARY KEY,
        category_type TEXT NOT NULL CHECK (category_type IN ('WL', 'Training')),
        major_category TEXT NOT NULL,
        exercise_name TEXT NOT NULL,
        display_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );

    CREATE TABLE personal_bests (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        grade TEXT NOT NULL,
        body_weight REAL,
        records_json TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, grade)
    );

    CREATE TABLE logs (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        date TEXT NOT NULL,
        time_zone TEXT CHECK (time_zone IN ('早朝', '午前', '午後', '夜')),
        total_tonnage REAL NOT NULL DEFAULT 0,
        sleep_hours REAL,
        nutrition_summary TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, date)
    );

    CREATE TABLE sets (
        id TEXT PRIMARY KEY,
        log_id TEXT NOT NULL REFERENCES logs(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        exercise_name TEXT NOT NULL,
        weight REAL NOT NULL,
        reps INTEGER NOT NULL,
        sets INTEGER NOT NULL,
        tonnage REAL NOT NULL,
        target_body_part TEXT,
        created_at TEXT NOT NULL
    );

    CREATE INDEX sets_log_id ON sets(log_id);
"#;

/// SQLite-backed log store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a fresh, seeded store that lives only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LiftLogError::Storage("SQLite connection poisoned".to_string()))
    }

    fn initialize(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('format_version', ?)",
            [FORMAT_VERSION],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('created_at', ?)",
            [&now],
        )?;

        let mut stmt = conn.prepare(
            r#"
            INSERT INTO exercises (id, category_type, major_category, exercise_name, display_order, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )?;
        for exercise in seed_exercises() {
            stmt.execute((
                Uuid::new_v4().to_string(),
                exercise.category.as_str(),
                &exercise.major_category,
                &exercise.name,
                exercise.display_order,
                &now,
            ))?;
        }
        log::debug!("Initialized store schema version {}", FORMAT_VERSION);
        Ok(())
    }

    fn load_sets(conn: &Connection, log_id: &str) -> Result<Vec<WorkoutSet>> {
        let query = format!(
            "SELECT {} FROM sets WHERE log_id = ? ORDER BY position ASC",
            SetRow::COLUMNS
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([log_id], SetRow::from_row)?;

        let mut sets = Vec::new();
        for row in rows {
            sets.push(row?.try_into()?);
        }
        Ok(sets)
    }

    fn hydrate(conn: &Connection, row: LogRow) -> Result<WorkoutLog> {
        let sets = Self::load_sets(conn, &row.id)?;
        Ok(WorkoutLog {
            id: parse_uuid(&row.id, "log id")?,
            user_id: parse_uuid(&row.user_id, "user id")?,
            date: parse_date(&row.date)?,
            time_zone: row.time_slot()?,
            total_tonnage: row.total_tonnage,
            sleep_hours: row.sleep_hours,
            nutrition_summary: row.nutrition_summary,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            sets,
        })
    }

    fn load_log(conn: &Connection, user: &UserContext, date: NaiveDate) -> Result<Option<WorkoutLog>> {
        let query = format!(
            "SELECT {} FROM logs WHERE user_id = ? AND date = ?",
            LogRow::COLUMNS
        );
        let row = conn
            .query_row(
                &query,
                (user.user_id.to_string(), date.format(DATE_FORMAT).to_string()),
                LogRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(Self::hydrate(conn, row)?)),
            None => Ok(None),
        }
    }

    fn load_personal_best(
        conn: &Connection,
        user: &UserContext,
        grade: Grade,
    ) -> Result<Option<PersonalBest>> {
        let query = format!(
            "SELECT {} FROM personal_bests WHERE user_id = ? AND grade = ?",
            PersonalBestRow::COLUMNS
        );
        let row = conn
            .query_row(
                &query,
                (user.user_id.to_string(), grade.label()),
                PersonalBestRow::from_row,
            )
            .optional()?;
        row.map(PersonalBest::try_from).transpose()
    }

    fn load_profile(conn: &Connection, column: &str, value: &str) -> Result<Option<Profile>> {
        let query = format!(
            "SELECT {} FROM profiles WHERE {} = ?",
            ProfileRow::COLUMNS,
            column
        );
        let row = conn
            .query_row(&query, [value], ProfileRow::from_row)
            .optional()?;
        row.map(Profile::try_from).transpose()
    }
}

impl LogStore for SqliteStore {
    fn create(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(LiftLogError::Storage(format!(
                "Store file already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::initialize(&conn)?;
        log::info!("Created store at {}", path.display());
        Ok(())
    }

    fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LiftLogError::NotFound(format!(
                "No store at {}",
                path.display()
            )));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'format_version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LiftLogError::Storage(format!("Not a LiftLog store: {}", e)))?;
        match version.as_deref() {
            Some(FORMAT_VERSION) => {}
            Some(other) => {
                return Err(LiftLogError::Storage(format!(
                    "Unsupported store format version: {}",
                    other
                )))
            }
            None => {
                return Err(LiftLogError::Storage(
                    "Store metadata is missing format_version".to_string(),
                ))
            }
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get_by_date(&self, user: &UserContext, date: NaiveDate) -> Result<Option<WorkoutLog>> {
        let conn = self.lock_conn()?;
        Self::load_log(&conn, user, date)
    }

    fn get_by_date_range(
        &self,
        user: &UserContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutLog>> {
        let conn = self.lock_conn()?;

        let query = format!(
            "SELECT {} FROM logs WHERE user_id = ? AND date >= ? AND date <= ? ORDER BY date ASC",
            LogRow::COLUMNS
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(
            (
                user.user_id.to_string(),
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string(),
            ),
            LogRow::from_row,
        )?;

        let mut log_rows = Vec::new();
        for row in rows {
            log_rows.push(row?);
        }

        log_rows
            .into_iter()
            .map(|row| Self::hydrate(&conn, row))
            .collect()
    }

    fn get_since(&self, user: &UserContext, start: NaiveDate) -> Result<Vec<WorkoutLog>> {
        let conn = self.lock_conn()?;

        let query = format!(
            "SELECT {} FROM logs WHERE user_id = ? AND date >= ? ORDER BY date ASC",
            LogRow::COLUMNS
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(
            (user.user_id.to_string(), start.format(DATE_FORMAT).to_string()),
            LogRow::from_row,
        )?;

        let mut log_rows = Vec::new();
        for row in rows {
            log_rows.push(row?);
        }

        log_rows
            .into_iter()
            .map(|row| Self::hydrate(&conn, row))
            .collect()
    }

    fn save(
        &mut self,
        user: &UserContext,
        date: NaiveDate,
        fields: &LogFields,
        sets: &[RawSet],
    ) -> Result<WorkoutLog> {
        let aggregate = aggregate(sets)?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let now = Utc::now().to_rfc3339();
        let date_str = date.format(DATE_FORMAT).to_string();

        tx.execute(
            r#"
            INSERT INTO logs (
                id,
                user_id,
                date,
                time_zone,
                total_tonnage,
                sleep_hours,
                nutrition_summary,
                created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, date) DO UPDATE SET
                time_zone = excluded.time_zone,
                total_tonnage = excluded.total_tonnage,
                sleep_hours = excluded.sleep_hours,
                nutrition_summary = excluded.nutrition_summary,
                updated_at = excluded.updated_at
            "#,
            (
                Uuid::new_v4().to_string(),
                user.user_id.to_string(),
                &date_str,
                fields.time_zone.map(|slot| slot.label()),
                aggregate.total_tonnage,
                fields.sleep_hours,
                fields.nutrition_summary.as_deref(),
                &now,
                &now,
            ),
        )?;

        // The set rows need the id of the (possibly pre-existing) log row.
        let log_id: String = tx.query_row(
            "SELECT id FROM logs WHERE user_id = ? AND date = ?",
            (user.user_id.to_string(), &date_str),
            |row| row.get(0),
        )?;

        let removed = tx.execute("DELETE FROM sets WHERE log_id = ?", [&log_id])?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO sets (
                    id,
                    log_id,
                    position,
                    exercise_name,
                    weight,
                    reps,
                    sets,
                    tonnage,
                    target_body_part,
                    created_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )?;
            for (position, set) in aggregate.sets.iter().enumerate() {
                stmt.execute((
                    Uuid::new_v4().to_string(),
                    &log_id,
                    position as i64,
                    &set.exercise_name,
                    set.weight,
                    set.reps,
                    set.sets,
                    set.tonnage,
                    set.target_body_part.label(),
                    &now,
                ))?;
            }
        }

        tx.commit()?;
        log::info!(
            "Saved log {} with {} sets (replaced {}), total {:.2}",
            date_str,
            aggregate.sets.len(),
            removed,
            aggregate.total_tonnage
        );

        Self::load_log(&conn, user, date)?
            .ok_or_else(|| LiftLogError::Storage("Saved log could not be read back".to_string()))
    }

    fn delete(&mut self, user: &UserContext, date: NaiveDate) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let date_str = date.format(DATE_FORMAT).to_string();

        let tx = conn.transaction()?;
        let log_id: Option<String> = tx
            .query_row(
                "SELECT id FROM logs WHERE user_id = ? AND date = ?",
                (user.user_id.to_string(), &date_str),
                |row| row.get(0),
            )
            .optional()?;
        let log_id = log_id
            .ok_or_else(|| LiftLogError::NotFound(format!("No log for {}", date_str)))?;

        // Sets first, then the log.
        tx.execute("DELETE FROM sets WHERE log_id = ?", [&log_id])?;
        tx.execute("DELETE FROM logs WHERE id = ?", [&log_id])?;
        tx.commit()?;

        log::info!("Deleted log {}", date_str);
        Ok(())
    }

    fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT exercise_name, category_type, major_category, display_order
            FROM exercises
            ORDER BY display_order ASC, exercise_name ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)?,
            ))
        })?;

        let mut exercises = Vec::new();
        for row in rows {
            let (name, category, major_category, display_order) = row?;
            let category = category
                .parse::<ExerciseCategory>()
                .map_err(|e| LiftLogError::Storage(format!("Invalid category_type: {}", e)))?;
            exercises.push(Exercise {
                name,
                category,
                major_category,
                display_order,
            });
        }
        Ok(exercises)
    }

    fn get_personal_best(&self, user: &UserContext, grade: Grade) -> Result<Option<PersonalBest>> {
        let conn = self.lock_conn()?;
        Self::load_personal_best(&conn, user, grade)
    }

    fn save_personal_best(
        &mut self,
        user: &UserContext,
        grade: Grade,
        body_weight: Option<f64>,
        records: &BTreeMap<String, f64>,
    ) -> Result<PersonalBest> {
        let kept: BTreeMap<&String, f64> = records
            .iter()
            .filter(|(_, value)| value.is_finite() && **value > 0.0)
            .map(|(code, value)| (code, *value))
            .collect();
        let records_json = serde_json::to_string(&kept)
            .map_err(|e| LiftLogError::Storage(format!("Failed to serialize records: {}", e)))?;

        let conn = self.lock_conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO personal_bests (id, user_id, grade, body_weight, records_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, grade) DO UPDATE SET
                body_weight = excluded.body_weight,
                records_json = excluded.records_json,
                updated_at = excluded.updated_at
            "#,
            (
                Uuid::new_v4().to_string(),
                user.user_id.to_string(),
                grade.label(),
                body_weight,
                records_json,
                &now,
                &now,
            ),
        )?;

        Self::load_personal_best(&conn, user, grade)?.ok_or_else(|| {
            LiftLogError::Storage("Saved personal best could not be read back".to_string())
        })
    }

    fn list_personal_bests(&self, user: &UserContext) -> Result<Vec<PersonalBest>> {
        let conn = self.lock_conn()?;
        let mut bests = Vec::new();
        for grade in ALL_GRADES {
            if let Some(best) = Self::load_personal_best(&conn, user, grade)? {
                bests.push(best);
            }
        }
        Ok(bests)
    }

    fn create_profile(&mut self, profile: &NewProfile) -> Result<Uuid> {
        let conn = self.lock_conn()?;
        let email = profile.email.trim().to_lowercase();

        let exists: Option<String> = conn
            .query_row("SELECT id FROM profiles WHERE email = ?", [&email], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_some() {
            return Err(LiftLogError::InvalidInput(format!(
                "Email already registered: {}",
                email
            )));
        }

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO profiles (id, email, last_name, first_name, display_name, role, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            (
                id.to_string(),
                &email,
                profile.last_name.trim(),
                profile.first_name.trim(),
                profile.display_name.as_deref(),
                profile.role.as_str(),
                &profile.password_hash,
                &now,
                &now,
            ),
        )?;
        log::info!("Created profile {}", id);
        Ok(id)
    }

    fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>> {
        let conn = self.lock_conn()?;
        Self::load_profile(&conn, "id", &id.to_string())
    }

    fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let conn = self.lock_conn()?;
        Self::load_profile(&conn, "email", &email.trim().to_lowercase())
    }

    fn list_profiles(&self) -> Result<Vec<Profile>> {
        let conn = self.lock_conn()?;
        let query = format!(
            "SELECT {} FROM profiles ORDER BY created_at DESC, email ASC",
            ProfileRow::COLUMNS
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], ProfileRow::from_row)?;

        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(Profile::try_from(row?)?);
        }
        Ok(profiles)
    }

    fn update_password_hash(&mut self, id: &Uuid, password_hash: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        let updated = conn.execute(
            "UPDATE profiles SET password_hash = ?, updated_at = ? WHERE id = ?",
            (password_hash, Utc::now().to_rfc3339(), id.to_string()),
        )?;
        if updated == 0 {
            return Err(LiftLogError::NotFound(format!("Profile {}", id)));
        }
        log::info!("Updated password for profile {}", id);
        Ok(())
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        {
            let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
            let mut rows = stmt.query([])?;
            if let Some(row) = rows.next()? {
                let table: String = row.get(0)?;
                return Err(LiftLogError::Storage(format!(
                    "Foreign key violation in table {}",
                    table
                )));
            }
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT l.date, l.total_tonnage, COALESCE(SUM(s.tonnage), 0.0)
            FROM logs l
            LEFT JOIN sets s ON s.log_id = l.id
            GROUP BY l.id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;
        for row in rows {
            let (date, stored, summed) = row?;
            if (stored - summed).abs() > TONNAGE_EPSILON {
                return Err(LiftLogError::Storage(format!(
                    "Log {} total {:.2} does not match its sets ({:.2})",
                    date, stored, summed
                )));
            }
        }

        Ok(())
    }
}
