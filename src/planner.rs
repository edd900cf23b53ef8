//! Scheduling rules for the builder board.
//!
//! The planner owns every rule the store does not enforce: which builder
//! slots are free, how long a task runs, and the fixed order in which a
//! new task is rejected. It borrows a [`SqliteStore`] and keeps no state
//! of its own, so views can construct one per interaction.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::error::{ForemanError, Result};
use crate::store::{Account, AccountPatch, SqliteStore, Task, TaskStatus, new_task_id};

/// Duration choices offered by task-entry views, in hours.
///
/// Quarter-day steps up to two days, then one, five and seven days.
pub const DURATION_PRESET_HOURS: &[u32] = &[6, 12, 24, 48, 72, 120, 168];

/// Parameters for [`Planner::add_task`].
#[derive(Debug, Clone)]
pub struct TaskRequest<'a> {
    pub account_id: &'a str,
    pub builder_no: u32,
    pub title: &'a str,
    pub start_at: DateTime<Utc>,
    pub hours: u32,
    pub minutes: u32,
}

/// One dashboard row: an account and its soonest-finishing active task.
#[derive(Debug, Clone)]
pub struct AccountOverview {
    pub account: Account,
    pub next_completion: Option<Task>,
}

/// Scheduling logic over a borrowed store.
pub struct Planner<'a> {
    store: &'a SqliteStore,
}

impl<'a> Planner<'a> {
    #[must_use]
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Builder numbers currently holding an active task for `account_id`.
    ///
    /// An unknown account simply has no active tasks, so the set is empty.
    pub fn occupied_builders(&self, account_id: &str) -> Result<BTreeSet<u32>> {
        let tasks = self.store.list_active_tasks_for_account(account_id)?;
        Ok(tasks.iter().map(|t| t.builder_no).collect())
    }

    /// Validate and create a new active task.
    ///
    /// The account must exist. After that, rejections are checked in a
    /// fixed order callers rely on for error reporting:
    ///
    /// 1. blank title → [`ForemanError::InvalidInput`]
    /// 2. builder already busy → [`ForemanError::SlotBusy`]
    /// 3. zero duration → [`ForemanError::InvalidDuration`]
    /// 4. builder number outside the account's pool → [`ForemanError::InvalidInput`]
    ///
    /// Nothing is written until every check passes. The stored title is
    /// the trimmed form.
    pub fn add_task(&self, req: &TaskRequest<'_>) -> Result<Task> {
        let account = self
            .store
            .get_account(req.account_id)?
            .ok_or_else(|| ForemanError::NotFound(format!("account {}", req.account_id)))?;

        let title = req.title.trim();
        if title.is_empty() {
            warn!(account_id = req.account_id, "task rejected: blank title");
            return Err(ForemanError::InvalidInput(
                "task title must not be empty".to_owned(),
            ));
        }

        let occupied = self.occupied_builders(req.account_id)?;
        if occupied.contains(&req.builder_no) {
            warn!(
                account_id = req.account_id,
                builder_no = req.builder_no,
                "task rejected: builder busy"
            );
            return Err(ForemanError::SlotBusy {
                builder_no: req.builder_no,
            });
        }

        let end_at = compute_end_at(req.start_at, req.hours, req.minutes).inspect_err(|_| {
            warn!(account_id = req.account_id, "task rejected: invalid duration");
        })?;

        if !(1..=account.builders).contains(&req.builder_no) {
            warn!(
                account_id = req.account_id,
                builder_no = req.builder_no,
                pool = account.builders,
                "task rejected: builder number out of range"
            );
            return Err(ForemanError::InvalidInput(format!(
                "builder number {} outside 1..={}",
                req.builder_no, account.builders
            )));
        }

        let task = Task {
            id: new_task_id(),
            account_id: req.account_id.to_owned(),
            builder_no: req.builder_no,
            title: title.to_owned(),
            start_at: req.start_at,
            end_at,
            status: TaskStatus::Active,
        };
        self.store.insert_task(&task)?;

        info!(
            task_id = %task.id,
            account_id = %task.account_id,
            builder_no = task.builder_no,
            end_at = %task.end_at,
            "task scheduled"
        );
        Ok(task)
    }

    /// Mark a task done, freeing its builder slot.
    ///
    /// Idempotent: marking an already-done task succeeds without touching
    /// the store. An unknown id is [`ForemanError::NotFound`].
    pub fn mark_done(&self, task_id: &str) -> Result<()> {
        let task = self
            .store
            .get_task(task_id)?
            .ok_or_else(|| ForemanError::NotFound(format!("task {task_id}")))?;

        if task.status == TaskStatus::Done {
            debug!(task_id, "task already done");
            return Ok(());
        }

        self.store.update_task_status(task_id, TaskStatus::Done)?;
        info!(
            task_id,
            account_id = %task.account_id,
            builder_no = task.builder_no,
            "task completed"
        );
        Ok(())
    }

    /// Overwrite an account's display name.
    ///
    /// The name is stored as given; no trimming or uniqueness rule applies.
    pub fn rename_account(&self, account_id: &str, name: &str) -> Result<()> {
        self.store.update_account(
            account_id,
            &AccountPatch {
                name: Some(name.to_owned()),
                ..AccountPatch::default()
            },
        )?;
        debug!(account_id, "account renamed");
        Ok(())
    }

    /// Soonest-finishing active task per account, across the whole board.
    pub fn next_completions(&self) -> Result<HashMap<String, Task>> {
        let tasks = self.store.list_active_tasks()?;
        Ok(next_completion_by_account(&tasks))
    }

    /// Every account paired with its next completion, ordered by account id.
    ///
    /// Accounts with no active tasks appear with `next_completion = None`.
    pub fn account_overview(&self) -> Result<Vec<AccountOverview>> {
        let accounts = self.store.list_accounts()?;
        let mut next = self.next_completions()?;

        Ok(accounts
            .into_iter()
            .map(|account| {
                let next_completion = next.remove(&account.id);
                AccountOverview {
                    account,
                    next_completion,
                }
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Pure computations
// ---------------------------------------------------------------------------

/// Compute a task's end time from its start and a duration in hours and
/// minutes.
///
/// The total duration must be at least one minute; otherwise
/// [`ForemanError::InvalidDuration`]. Minutes beyond 59 are accepted and
/// simply fold into hours.
pub fn compute_end_at(start: DateTime<Utc>, hours: u32, minutes: u32) -> Result<DateTime<Utc>> {
    let total_minutes = i64::from(hours) * 60 + i64::from(minutes);
    if total_minutes == 0 {
        return Err(ForemanError::InvalidDuration);
    }
    start
        .checked_add_signed(Duration::minutes(total_minutes))
        .ok_or_else(|| ForemanError::InvalidInput("computed end time is out of range".to_owned()))
}

/// Fold a sequence of active tasks down to the earliest-ending task per
/// account.
///
/// A task replaces the current candidate only when its `end_at` is
/// strictly earlier, so ties go to the task encountered first.
#[must_use]
pub fn next_completion_by_account(tasks: &[Task]) -> HashMap<String, Task> {
    let mut next: HashMap<String, Task> = HashMap::new();
    for task in tasks {
        let replace = match next.get(&task.account_id) {
            Some(current) => task.end_at < current.end_at,
            None => true,
        };
        if replace {
            next.insert(task.account_id.clone(), task.clone());
        }
    }
    next
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
