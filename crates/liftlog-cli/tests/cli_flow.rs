use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use httpmock::prelude::*;

const PASSWORD: &str = "secret-lifts-123";
const EMAIL: &str = "lifter@example.com";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_liftlog"))
}

/// Isolated config and data homes for one test.
struct TestEnv {
    base: PathBuf,
    config_home: PathBuf,
    data_home: PathBuf,
}

impl TestEnv {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let base = std::env::temp_dir().join(format!(
            "{}_{}_{}",
            prefix,
            std::process::id(),
            nanos
        ));
        let config_home = base.join("config");
        let data_home = base.join("data");
        std::fs::create_dir_all(&config_home).expect("create config dir");
        std::fs::create_dir_all(&data_home).expect("create data dir");
        Self {
            base,
            config_home,
            data_home,
        }
    }

    fn store_path(&self) -> PathBuf {
        self.data_home.join("liftlog").join("liftlog.db")
    }

    fn config_path(&self) -> PathBuf {
        self.config_home.join("liftlog").join("config.toml")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("XDG_DATA_HOME", &self.data_home)
            .env("LIFTLOG_TODAY", "2024-05-10")
            .env("LIFTLOG_PASSWORD", PASSWORD)
            .env_remove("LIFTLOG_DB")
            .env_remove("LIFTLOG_USER")
            .env_remove("LIFTLOG_CONFIG")
            .env_remove("LIFTLOG_NEW_PASSWORD")
            .env_remove("OPENAI_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run liftlog")
    }

    fn run_ok(&self, args: &[&str]) -> Output {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: stdout={}, stderr={}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run_ok(args);
        serde_json::from_slice(&output.stdout).expect("parse json output")
    }

    /// `init` plus a default account.
    fn setup(prefix: &str) -> Self {
        let env = Self::new(prefix);
        env.run_ok(&["init"]);
        env.run_ok(&[
            "signup",
            "--email",
            EMAIL,
            "--last-name",
            "山田",
            "--first-name",
            "太郎",
            "--no-input",
        ]);
        env
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

fn write_photo(dir: &Path) -> PathBuf {
    let path = dir.join("meal.jpg");
    std::fs::write(&path, [0xff, 0xd8, 0xff, 0xe0]).expect("write photo");
    path
}

#[test]
fn test_cli_init_writes_config_and_store() {
    let env = TestEnv::new("liftlog_init");
    let init = env.run_ok(&["init", "--timezone", "Asia/Tokyo"]);
    let stdout = String::from_utf8_lossy(&init.stdout);
    assert!(stdout.contains("status=ok"));

    assert!(env.store_path().exists());
    let config = std::fs::read_to_string(env.config_path()).expect("read config");
    assert!(config.contains("[store]"));
    assert!(config.contains(&*env.store_path().to_string_lossy()));
    assert!(config.contains("Asia/Tokyo"));

    let again = env.run(&["init"]);
    assert_eq!(again.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&again.stderr).contains("--force"));
}

#[test]
fn test_cli_save_show_and_replace() {
    let env = TestEnv::setup("liftlog_save");

    let saved = env.run_json(&[
        "log",
        "save",
        "2024-05-01",
        "--set",
        "スナッチ:60:3:5",
        "--set",
        "バックスクワット:100:5:3",
        "--set",
        "ベンチプレス:0:5:3",
        "--time-zone",
        "午前",
        "--sleep",
        "7.5",
        "--json",
    ]);
    assert_eq!(saved["total_tonnage"], 2400.0);
    assert_eq!(saved["sets"].as_array().map(Vec::len), Some(2));
    assert_eq!(saved["sets"][0]["target_body_part"], "全身（スナッチ）");
    assert_eq!(saved["sets"][1]["target_body_part"], "脚");

    let shown = env.run_json(&["log", "show", "2024-05-01", "--json"]);
    assert_eq!(shown["total_tonnage"], 2400.0);
    assert_eq!(shown["time_zone"], "午前");
    assert_eq!(shown["sleep_hours"], 7.5);

    // --set replaces every set; the other fields carry over.
    let replaced = env.run_json(&[
        "log",
        "save",
        "2024-05-01",
        "--set",
        "バックスクワット:120:3:6",
        "--json",
    ]);
    assert_eq!(replaced["total_tonnage"], 2160.0);
    assert_eq!(replaced["sets"].as_array().map(Vec::len), Some(1));
    assert_eq!(replaced["time_zone"], "午前");
    assert_eq!(replaced["id"], saved["id"]);

    let listed = env.run_json(&["log", "list", "--json"]);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_cli_all_invalid_sets_rejected() {
    let env = TestEnv::setup("liftlog_invalid");

    let output = env.run(&["log", "save", "2024-05-02", "--set", "スナッチ:0:3:5"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No valid sets"));

    let shown = env.run_json(&["log", "show", "2024-05-02", "--json"]);
    assert!(shown.is_null());
}

#[test]
fn test_cli_show_missing_day_suggests_save() {
    let env = TestEnv::setup("liftlog_empty_day");
    let output = env.run_ok(&["log", "show", "today"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No log for 2024-05-10"));
    assert!(stdout.contains("hint=liftlog log save 2024-05-10"));
}

#[test]
fn test_cli_requires_account() {
    let env = TestEnv::new("liftlog_no_user");
    env.run_ok(&["init"]);

    let output = env.run(&["log", "list"]);
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No account selected"));
    assert!(stderr.contains("liftlog signup"));

    let output = env.run(&["--user", "nobody@example.com", "log", "list"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No account for nobody@example.com"));
}

#[test]
fn test_cli_wrong_password() {
    let env = TestEnv::setup("liftlog_password");
    let output = env
        .command(&["log", "list"])
        .env("LIFTLOG_PASSWORD", "not-the-password")
        .output()
        .expect("run liftlog");
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid email or password"));
}

#[test]
fn test_cli_signup_rejects_short_password() {
    let env = TestEnv::new("liftlog_short_pw");
    env.run_ok(&["init"]);
    let output = env
        .command(&[
            "signup",
            "--email",
            EMAIL,
            "--last-name",
            "山田",
            "--first-name",
            "太郎",
            "--no-input",
        ])
        .env("LIFTLOG_PASSWORD", "abc")
        .output()
        .expect("run liftlog");
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_missing_store() {
    let env = TestEnv::new("liftlog_missing");
    let missing = env.base.join("nope.db");
    let output = env.run(&["--db", &missing.to_string_lossy(), "check"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No store found at"));
    assert!(stderr.contains(&*missing.to_string_lossy()));
    assert!(stderr.contains("liftlog init"));
}

#[test]
fn test_cli_check_ok() {
    let env = TestEnv::setup("liftlog_check");
    env.run_ok(&["log", "save", "2024-05-01", "--set", "スナッチ:60:3:5"]);
    let output = env.run_ok(&["check"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("status=ok"));
}

#[test]
fn test_cli_analysis_ranges() {
    let env = TestEnv::setup("liftlog_analysis");
    env.run_ok(&["log", "save", "2024-05-01", "--set", "スナッチ:60:3:5"]);
    env.run_ok(&["log", "save", "2024-05-08", "--set", "バックスクワット:100:5:3"]);

    let week = env.run_json(&["analysis", "--range", "week", "--json"]);
    assert_eq!(week["log_count"], 1);
    assert_eq!(week["total_tonnage"], 1500.0);
    assert_eq!(week["breakdown"][0]["body_part"], "脚");

    let month = env.run_json(&["analysis", "--json"]);
    assert_eq!(month["period"], "month");
    assert_eq!(month["total_tonnage"], 2400.0);
    assert_eq!(month["breakdown"][0]["body_part"], "脚");
    assert_eq!(month["breakdown"][1]["body_part"], "全身（スナッチ）");
    assert_eq!(month["trend"][0]["label"], "5/1");
    assert_eq!(month["trend"][1]["label"], "5/8");

    let bad = env.run(&["analysis", "--range", "year"]);
    assert_eq!(bad.status.code(), Some(4));
}

#[test]
fn test_cli_empty_range_totals_zero() {
    let env = TestEnv::setup("liftlog_empty_range");

    let plain = env.run_ok(&["analysis", "--range", "week"]);
    let stdout = String::from_utf8_lossy(&plain.stdout);
    assert!(stdout.contains("total_tonnage=0\n"), "stdout: {}", stdout);
    assert!(!stdout.contains("=-0"));

    let json = env.run_json(&["analysis", "--range", "week", "--json"]);
    assert_eq!(json["log_count"], 0);
    assert_eq!(json["total_tonnage"].to_string(), "0.0");

    let out = env.base.join("empty.xlsx");
    env.run_ok(&["export", "--range", "week", "--output", &out.to_string_lossy()]);
    assert!(out.exists());
}

#[test]
fn test_cli_analysis_includes_future_logs() {
    let env = TestEnv::setup("liftlog_future");
    env.run_ok(&["log", "save", "2024-05-20", "--set", "スナッチ:60:3:5"]);

    let week = env.run_json(&["analysis", "--range", "week", "--json"]);
    assert_eq!(week["log_count"], 1);
    assert_eq!(week["total_tonnage"], 900.0);
}

#[test]
fn test_cli_passwd() {
    let env = TestEnv::setup("liftlog_passwd");

    let changed = env
        .command(&["passwd", "--no-input"])
        .env("LIFTLOG_NEW_PASSWORD", "new-secret-456")
        .output()
        .expect("run liftlog");
    assert!(changed.status.success());
    assert!(String::from_utf8_lossy(&changed.stdout).contains("status=ok"));

    // The old password no longer signs in.
    let old = env.run(&["pb", "show"]);
    assert_eq!(old.status.code(), Some(5));

    let new = env
        .command(&["pb", "show"])
        .env("LIFTLOG_PASSWORD", "new-secret-456")
        .output()
        .expect("run liftlog");
    assert!(new.status.success());

    let short = env
        .command(&["passwd", "--no-input"])
        .env("LIFTLOG_PASSWORD", "new-secret-456")
        .env("LIFTLOG_NEW_PASSWORD", "12345")
        .output()
        .expect("run liftlog");
    assert_eq!(short.status.code(), Some(4));

    let missing = env
        .command(&["passwd", "--no-input"])
        .env("LIFTLOG_PASSWORD", "new-secret-456")
        .output()
        .expect("run liftlog");
    assert_eq!(missing.status.code(), Some(4));
}

#[test]
fn test_cli_admin_acts_for_other_account() {
    let env = TestEnv::setup("liftlog_admin");
    let member = "member@example.com";
    env.run_ok(&[
        "signup",
        "--email",
        member,
        "--last-name",
        "佐藤",
        "--first-name",
        "花子",
        "--no-input",
    ]);
    env.run_ok(&["--user", member, "log", "save", "2024-05-08", "--set", "スナッチ:50:2:5"]);

    // The first account is the admin.
    let users = env.run_json(&["users", "--json"]);
    let users = users.as_array().expect("user array");
    assert_eq!(users.len(), 2);
    assert!(users
        .iter()
        .any(|u| u["email"] == EMAIL && u["role"] == "admin"));
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let analysis = env.run_json(&["analysis", "--range", "week", "--for", member, "--json"]);
    assert_eq!(analysis["log_count"], 1);
    assert_eq!(analysis["total_tonnage"], 500.0);

    let exported = env
        .command(&["export", "--range", "all", "--for", member])
        .current_dir(&env.base)
        .output()
        .expect("run liftlog");
    assert!(exported.status.success());
    assert!(env.base.join("佐藤 花子_20240510.xlsx").exists());

    let denied = env.run(&["--user", member, "analysis", "--for", EMAIL]);
    assert_eq!(denied.status.code(), Some(5));
    let denied = env.run(&["--user", member, "users"]);
    assert_eq!(denied.status.code(), Some(5));

    let unknown = env.run(&["analysis", "--for", "nobody@example.com"]);
    assert_eq!(unknown.status.code(), Some(3));
}

#[test]
fn test_cli_delete_log() {
    let env = TestEnv::setup("liftlog_delete");
    env.run_ok(&["log", "save", "2024-05-01", "--set", "スナッチ:60:3:5"]);
    env.run_ok(&["log", "delete", "2024-05-01", "--yes"]);

    let shown = env.run_json(&["log", "show", "2024-05-01", "--json"]);
    assert!(shown.is_null());

    let again = env.run(&["log", "delete", "2024-05-01", "--yes"]);
    assert_eq!(again.status.code(), Some(3));
}

#[test]
fn test_cli_export_writes_workbook() {
    let env = TestEnv::setup("liftlog_export");
    env.run_ok(&["log", "save", "2024-05-01", "--set", "スナッチ:60:3:5"]);

    let out = env.base.join("report.xlsx");
    env.run_ok(&["export", "--range", "all", "--output", &out.to_string_lossy()]);

    let bytes = std::fs::read(&out).expect("read workbook");
    // xlsx is a zip container
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_cli_exercises_filter() {
    let env = TestEnv::new("liftlog_exercises");
    env.run_ok(&["init"]);

    let wl = env.run_json(&["exercises", "--category", "WL", "--json"]);
    let wl = wl.as_array().expect("exercise array");
    assert!(!wl.is_empty());
    assert!(wl.iter().all(|e| e["category"] == "WL"));

    let found = env.run_json(&["exercises", "--query", "スクワット", "--json"]);
    let found = found.as_array().expect("exercise array");
    assert!(!found.is_empty());
    assert!(found
        .iter()
        .all(|e| e["name"].as_str().unwrap_or_default().contains("スクワット")));
}

#[test]
fn test_cli_personal_bests() {
    let env = TestEnv::setup("liftlog_pb");
    env.run_ok(&[
        "pb",
        "set",
        "--grade",
        "高1",
        "--body-weight",
        "61",
        "--record",
        "S=80",
        "--record",
        "C&J=100",
    ]);
    env.run_ok(&["pb", "set", "--grade", "高1", "--record", "S=0", "--record", "HS=70"]);

    let shown = env.run_json(&["pb", "show", "--grade", "高1", "--json"]);
    let best = &shown[0];
    assert_eq!(best["grade"], "高1");
    assert_eq!(best["body_weight"], 61.0);
    assert_eq!(best["records"]["C&J"], 100.0);
    assert_eq!(best["records"]["HS"], 70.0);
    assert!(best["records"].get("S").is_none());

    let bad = env.run(&["pb", "set", "--grade", "高1", "--record", "Bench=100"]);
    assert_eq!(bad.status.code(), Some(4));
}

#[test]
fn test_cli_nutrition_attaches_to_log() {
    let env = TestEnv::setup("liftlog_nutrition");
    env.run_ok(&["log", "save", "2024-05-01", "--set", "スナッチ:60:3:5"]);

    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("Authorization", "Bearer config-key")
            .body_contains("data:image/jpeg;base64,");
        then.status(200).json_body(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "```json\n{\"calories\":650,\"protein\":42.5,\"fat\":18,\"carbs\":80,\"missing_nutrients\":[\"鉄\"]}\n```"
                }
            }]
        }));
    });

    let config = format!(
        "[store]\npath = \"{}\"\n\n[user]\nemail = \"{}\"\n\n[nutrition]\nbase_url = \"{}\"\napi_key = \"config-key\"\n",
        env.store_path().display(),
        EMAIL,
        server.url("/v1")
    );
    std::fs::write(env.config_path(), config).expect("write config");

    let photo = write_photo(&env.base);
    let summary = env.run_json(&[
        "nutrition",
        "analyze",
        &photo.to_string_lossy(),
        "--date",
        "2024-05-01",
        "--json",
    ]);
    assert_eq!(summary["calories"], 650.0);
    m.assert();

    let shown = env.run_json(&["log", "show", "2024-05-01", "--json"]);
    assert_eq!(shown["nutrition_summary"]["protein"], 42.5);
    assert_eq!(shown["nutrition_summary"]["missing_nutrients"][0], "鉄");
    // sets survive the nutrition update
    assert_eq!(shown["total_tonnage"], 900.0);
}

#[test]
fn test_cli_nutrition_service_error() {
    let env = TestEnv::setup("liftlog_nutrition_err");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream down");
    });

    let config = format!(
        "[store]\npath = \"{}\"\n\n[nutrition]\nbase_url = \"{}\"\n",
        env.store_path().display(),
        server.url("/v1")
    );
    std::fs::write(env.config_path(), config).expect("write config");

    let photo = write_photo(&env.base);
    let output = env
        .command(&["nutrition", "analyze", &photo.to_string_lossy()])
        .env("OPENAI_API_KEY", "env-key")
        .output()
        .expect("run liftlog");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("HTTP 500"));
}
