//! Shared types and helpers for the store.
//!
//! The serde representation of [`Account`] and [`Task`] doubles as the
//! interchange layout: camelCase field names and RFC 3339 timestamp strings,
//! matching the collections any pre-existing local data uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a task. Transitions are monotonic: `Active` → `Done`,
/// never back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Done,
}

// ---------------------------------------------------------------------------
// Core structs
// ---------------------------------------------------------------------------

/// A managed account owning a fixed pool of numbered builder slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// Mutable display label. No uniqueness constraint.
    pub name: String,
    /// Total count of numbered worker slots (`1..=builders`). Fixed at
    /// creation; nothing in the scheduling layer resizes it.
    pub builders: u32,
}

/// A titled unit of work occupying one builder slot for a span of time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier.
    pub id: String,
    /// Owning account. A reference, not an ownership relation: the store
    /// never cascades.
    pub account_id: String,
    /// Which slot is occupied, in `[1, account.builders]`.
    pub builder_no: u32,
    /// Free-text label, non-empty (trimmed) at creation.
    pub title: String,
    pub start_at: DateTime<Utc>,
    /// Strictly after `start_at`.
    pub end_at: DateTime<Utc>,
    pub status: TaskStatus,
}

/// Partial update for an account record. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub builders: Option<u32>,
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Generate a fresh task id (`tsk-<uuid>`).
///
/// Collisions are practically impossible; the store's insert still treats a
/// duplicate id as a [`Conflict`](crate::ForemanError::Conflict) rather than
/// overwriting.
#[must_use]
pub fn new_task_id() -> String {
    format!("tsk-{}", Uuid::new_v4())
}
