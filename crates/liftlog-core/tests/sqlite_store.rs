use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use liftlog_core::accounts::{change_password, sign_in, sign_up, SignUp};
use liftlog_core::analysis::{analyze, Period};
use liftlog_core::storage::{LogFields, LogStore, SqliteStore, TimeSlot, UserContext};
use liftlog_core::{LiftLogError, RawSet};

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be available")
            .as_nanos();
        let filename = format!("{}_{}_{}.db", prefix, std::process::id(), nanos);
        let path = std::env::temp_dir().join(filename);
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn signed_up(store: &mut SqliteStore) -> UserContext {
    let form = SignUp {
        email: "lifter@example.com".to_string(),
        last_name: "山田".to_string(),
        first_name: "太郎".to_string(),
        display_name: None,
        password: "secret1".to_string(),
        password_confirmation: "secret1".to_string(),
    };
    sign_up(store, &form).expect("sign up should succeed")
}

#[test]
fn test_create_open_round_trip() {
    let temp = TempFile::new("liftlog_store_round_trip");

    SqliteStore::create(&temp.path).expect("create should succeed");
    assert!(temp.path.exists());

    let store = SqliteStore::open(&temp.path).expect("open should succeed");
    assert!(!store.list_exercises().expect("list").is_empty());
    store.check_integrity().expect("fresh store is consistent");
}

#[test]
fn test_create_existing_file_fails() {
    let temp = TempFile::new("liftlog_store_exists");
    SqliteStore::create(&temp.path).expect("create should succeed");

    let result = SqliteStore::create(&temp.path);
    assert!(matches!(result, Err(LiftLogError::Storage(_))));
}

#[test]
fn test_open_missing_file_fails() {
    let temp = TempFile::new("liftlog_store_missing");
    let result = SqliteStore::open(&temp.path);
    assert!(matches!(result, Err(LiftLogError::NotFound(_))));
}

#[test]
fn test_open_foreign_file_fails() {
    let temp = TempFile::new("liftlog_store_foreign");
    fs::write(&temp.path, b"").expect("write empty file");
    assert!(SqliteStore::open(&temp.path).is_err());
}

#[test]
fn test_save_and_resave_persist_across_reopen() {
    let temp = TempFile::new("liftlog_store_resave");
    SqliteStore::create(&temp.path).expect("create should succeed");
    let day = date("2024-05-01");

    let user = {
        let mut store = SqliteStore::open(&temp.path).expect("open");
        let user = signed_up(&mut store);
        let log = store
            .save(
                &user,
                day,
                &LogFields::new().time_zone(TimeSlot::EarlyMorning),
                &[RawSet::new("スクワット", 100.0, 5, 3)],
            )
            .expect("first save");
        assert_eq!(log.total_tonnage, 1500.0);

        let log = store
            .save(
                &user,
                day,
                &LogFields::new().sleep_hours(6.0),
                &[
                    RawSet::new("スクワット", 80.0, 5, 3),
                    RawSet::new("ベンチプレス", 60.0, 8, 2),
                ],
            )
            .expect("second save");
        assert_eq!(log.total_tonnage, 2160.0);
        user
    };

    let store = SqliteStore::open(&temp.path).expect("reopen");
    let log = store
        .get_by_date(&user, day)
        .expect("lookup")
        .expect("log exists");
    assert_eq!(log.total_tonnage, 2160.0);
    assert_eq!(log.sets.len(), 2);
    // Fields are replaced wholesale on save.
    assert_eq!(log.time_zone, None);
    assert_eq!(log.sleep_hours, Some(6.0));
    store.check_integrity().expect("integrity");
}

#[test]
fn test_rejected_save_keeps_previous_log() {
    let temp = TempFile::new("liftlog_store_rejected");
    SqliteStore::create(&temp.path).expect("create");
    let mut store = SqliteStore::open(&temp.path).expect("open");
    let user = signed_up(&mut store);
    let day = date("2024-05-01");

    store
        .save(&user, day, &LogFields::new(), &[RawSet::new("スクワット", 100.0, 5, 3)])
        .expect("save");
    let err = store
        .save(&user, day, &LogFields::new(), &[RawSet::new("スクワット", -1.0, 5, 3)])
        .expect_err("all-invalid save is rejected");
    assert!(matches!(err, LiftLogError::Validation(_)));

    let log = store.get_by_date(&user, day).expect("lookup").expect("kept");
    assert_eq!(log.total_tonnage, 1500.0);
}

#[test]
fn test_delete_then_analysis_excludes_log() {
    let temp = TempFile::new("liftlog_store_delete");
    SqliteStore::create(&temp.path).expect("create");
    let mut store = SqliteStore::open(&temp.path).expect("open");
    let user = signed_up(&mut store);

    store
        .save(&user, date("2024-05-01"), &LogFields::new(), &[RawSet::new("S", 70.0, 2, 5)])
        .expect("save");
    store
        .save(&user, date("2024-05-03"), &LogFields::new(), &[RawSet::new("C&J", 90.0, 1, 5)])
        .expect("save");

    store.delete(&user, date("2024-05-01")).expect("delete");

    let analysis = analyze(&store, &user, Period::Week, date("2024-05-05")).expect("analysis");
    assert_eq!(analysis.log_count, 1);
    assert_eq!(analysis.total_tonnage, 450.0);
    assert_eq!(analysis.breakdown[0].body_part.label(), "全身（C&J）");
}

#[test]
fn test_sign_in_against_file_store() {
    let temp = TempFile::new("liftlog_store_sign_in");
    SqliteStore::create(&temp.path).expect("create");
    let mut store = SqliteStore::open(&temp.path).expect("open");
    let user = signed_up(&mut store);
    drop(store);

    let store = SqliteStore::open(&temp.path).expect("reopen");
    let signed_in = sign_in(&store, "LIFTER@example.com", "secret1").expect("sign in");
    assert_eq!(signed_in, user);
}

#[test]
fn test_analysis_counts_future_dated_logs() {
    let temp = TempFile::new("liftlog_store_future");
    SqliteStore::create(&temp.path).expect("create");
    let mut store = SqliteStore::open(&temp.path).expect("open");
    let user = signed_up(&mut store);

    store
        .save(&user, date("2024-05-04"), &LogFields::new(), &[RawSet::new("S", 50.0, 2, 5)])
        .expect("save");
    store
        .save(&user, date("2024-05-20"), &LogFields::new(), &[RawSet::new("S", 60.0, 1, 5)])
        .expect("save");

    let analysis = analyze(&store, &user, Period::Week, date("2024-05-05")).expect("analysis");
    assert_eq!(analysis.log_count, 2);
    assert_eq!(analysis.total_tonnage, 800.0);
    assert_eq!(analysis.end, date("2024-05-20"));
}

#[test]
fn test_empty_range_analysis_is_zero() {
    let temp = TempFile::new("liftlog_store_empty");
    SqliteStore::create(&temp.path).expect("create");
    let mut store = SqliteStore::open(&temp.path).expect("open");
    let user = signed_up(&mut store);

    let analysis = analyze(&store, &user, Period::Month, date("2024-05-05")).expect("analysis");
    assert_eq!(analysis.log_count, 0);
    assert_eq!(analysis.end, date("2024-05-05"));
    assert_eq!(format!("{:.2}", analysis.total_tonnage), "0.00");
}

#[test]
fn test_password_change_persists() {
    let temp = TempFile::new("liftlog_store_passwd");
    SqliteStore::create(&temp.path).expect("create");
    let mut store = SqliteStore::open(&temp.path).expect("open");
    let user = signed_up(&mut store);
    change_password(&mut store, &user, "better-secret", "better-secret").expect("change");
    drop(store);

    let store = SqliteStore::open(&temp.path).expect("reopen");
    assert!(sign_in(&store, "lifter@example.com", "secret1").is_err());
    assert_eq!(
        sign_in(&store, "lifter@example.com", "better-secret").expect("sign in"),
        user
    );
}
