#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};
use foreman::config::{SeedConfig, StoreConfig};
use foreman::store::{self, SqliteStore};
use foreman::{ForemanError, Planner, TaskRequest, TaskStatus};
use tempfile::TempDir;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn open_seeded_board(dir: &TempDir) -> SqliteStore {
    let cfg = StoreConfig {
        root_dir: dir.path().to_path_buf(),
    };
    let db = SqliteStore::open(&cfg).expect("open store");
    store::seed_accounts(&db, &SeedConfig::default()).expect("seed accounts");
    db
}

fn ten_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

fn request<'a>(
    account_id: &'a str,
    title: &'a str,
    builder_no: u32,
    hours: u32,
    minutes: u32,
) -> TaskRequest<'a> {
    TaskRequest {
        account_id,
        builder_no,
        title,
        start_at: ten_am(),
        hours,
        minutes,
    }
}

#[test]
fn full_task_lifecycle_on_a_seeded_board() {
    init_tracing();
    let dir = TempDir::new().expect("temp dir");
    let db = open_seeded_board(&dir);
    let planner = Planner::new(&db);

    assert_eq!(db.account_count().expect("count"), 15);

    // Schedule a 2h30m job on builder 3.
    let task = planner
        .add_task(&request("acc-01", "壁塗り", 3, 2, 30))
        .expect("schedule task");
    assert_eq!(task.status, TaskStatus::Active);
    assert_eq!(
        task.end_at,
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap()
    );

    // The slot is now busy.
    let occupied = planner.occupied_builders("acc-01").expect("occupancy");
    assert!(occupied.contains(&3));
    let err = planner
        .add_task(&request("acc-01", "別の作業", 3, 1, 0))
        .expect_err("busy builder rejected");
    assert!(matches!(err, ForemanError::SlotBusy { builder_no: 3 }));

    // Completing the task frees the slot for the next job.
    planner.mark_done(&task.id).expect("mark done");
    assert!(planner
        .occupied_builders("acc-01")
        .expect("occupancy")
        .is_empty());
    planner
        .add_task(&request("acc-01", "次の作業", 3, 1, 0))
        .expect("slot reusable after completion");
}

#[test]
fn rejected_requests_leave_the_store_untouched() {
    let dir = TempDir::new().expect("temp dir");
    let db = open_seeded_board(&dir);
    let planner = Planner::new(&db);

    let rejections = [
        request("acc-01", "", 1, 1, 0),      // blank title
        request("acc-01", "job", 1, 0, 0),   // zero duration
        request("acc-01", "job", 6, 1, 0),   // builder outside the pool of 5
        request("acc-99", "job", 1, 1, 0),   // unknown account
    ];
    for req in &rejections {
        planner.add_task(req).expect_err("request must be rejected");
        assert_eq!(db.task_count().expect("count"), 0);
    }
}

#[test]
fn seeding_twice_keeps_fifteen_accounts() {
    let dir = TempDir::new().expect("temp dir");
    let db = open_seeded_board(&dir);

    let second = store::seed_accounts(&db, &SeedConfig::default()).expect("second seed");
    assert_eq!(second, 0);
    assert_eq!(db.account_count().expect("count"), 15);

    let accounts = db.list_accounts().expect("list");
    assert_eq!(accounts.first().expect("first").id, "acc-01");
    assert_eq!(accounts.last().expect("last").id, "acc-15");
}

#[test]
fn board_state_survives_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let task_id = {
        let db = open_seeded_board(&dir);
        let planner = Planner::new(&db);
        planner
            .add_task(&request("acc-02", "long haul", 4, 48, 0))
            .expect("schedule")
            .id
    };

    // Fresh connection against the same directory.
    let cfg = StoreConfig {
        root_dir: dir.path().to_path_buf(),
    };
    let db = SqliteStore::open(&cfg).expect("reopen store");
    assert_eq!(db.account_count().expect("count"), 15);
    assert!(db.schema_version().expect("version").is_some());

    let task = db
        .get_task(&task_id)
        .expect("get task")
        .expect("task persisted");
    assert_eq!(task.status, TaskStatus::Active);
    assert_eq!(task.end_at, ten_am() + chrono::Duration::hours(48));

    let planner = Planner::new(&db);
    assert!(planner
        .occupied_builders("acc-02")
        .expect("occupancy")
        .contains(&4));
}

#[test]
fn overview_tracks_each_account_independently() {
    let dir = TempDir::new().expect("temp dir");
    let db = open_seeded_board(&dir);
    let planner = Planner::new(&db);

    planner
        .add_task(&request("acc-01", "slow", 1, 4, 0))
        .expect("add");
    let fast = planner
        .add_task(&request("acc-01", "fast", 2, 1, 0))
        .expect("add");
    let other = planner
        .add_task(&request("acc-02", "elsewhere", 1, 2, 0))
        .expect("add");

    let overview = planner.account_overview().expect("overview");
    assert_eq!(overview.len(), 15);
    assert_eq!(overview[0].account.id, "acc-01");

    let next_ids: Vec<Option<&str>> = overview
        .iter()
        .take(3)
        .map(|row| row.next_completion.as_ref().map(|t| t.id.as_str()))
        .collect();
    assert_eq!(
        next_ids,
        vec![Some(fast.id.as_str()), Some(other.id.as_str()), None]
    );
}

#[test]
fn renamed_account_shows_up_in_overview() {
    let dir = TempDir::new().expect("temp dir");
    let db = open_seeded_board(&dir);
    let planner = Planner::new(&db);

    planner
        .rename_account("acc-03", "west yard")
        .expect("rename");

    let overview = planner.account_overview().expect("overview");
    assert_eq!(overview[2].account.name, "west yard");
    assert_eq!(overview[2].account.builders, 5);
}

#[test]
fn stored_records_use_the_interchange_layout() {
    let dir = TempDir::new().expect("temp dir");
    let db = open_seeded_board(&dir);
    let planner = Planner::new(&db);
    let task = planner
        .add_task(&request("acc-01", "layout check", 2, 6, 0))
        .expect("add");

    let json = serde_json::to_value(&task).expect("serialize task");
    assert_eq!(json["accountId"], "acc-01");
    assert_eq!(json["builderNo"], 2);
    assert_eq!(json["status"], "active");
    assert!(json["startAt"].as_str().expect("startAt").contains("2024-01-01"));
    assert!(json["endAt"].as_str().expect("endAt").contains("2024-01-01"));

    let account = db
        .get_account("acc-01")
        .expect("get")
        .expect("account exists");
    let json = serde_json::to_value(&account).expect("serialize account");
    assert_eq!(json["id"], "acc-01");
    assert_eq!(json["builders"], 5);
}

#[test]
fn rejection_kinds_have_distinct_messages() {
    let errors = [
        ForemanError::NotFound("account acc-99".to_owned()),
        ForemanError::Conflict("task tsk-1".to_owned()),
        ForemanError::InvalidInput("task title must not be empty".to_owned()),
        ForemanError::SlotBusy { builder_no: 3 },
        ForemanError::InvalidDuration,
    ];

    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    for (i, a) in messages.iter().enumerate() {
        for b in messages.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}
