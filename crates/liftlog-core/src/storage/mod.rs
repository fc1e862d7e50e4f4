//! Storage abstractions and the SQLite backend.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::LogStore;
pub use types::{
    Grade, LogFields, NewProfile, PersonalBest, Profile, Role, TimeSlot, UserContext, WorkoutLog,
    WorkoutSet, ALL_GRADES, ALL_TIME_SLOTS,
};
