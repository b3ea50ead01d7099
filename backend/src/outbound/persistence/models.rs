//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{audit_log, collab_requests, skills, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub full_name: Option<&'a str>,
}

/// Row struct for reading from the skills table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = skills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SkillRow {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub category: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for listing skills. `is_active` defaults to true in the
/// schema.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = skills)]
pub(crate) struct NewSkillRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub category: Option<&'a str>,
}

/// Row struct for reading from the collab_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collab_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollabRequestRow {
    pub id: i32,
    pub requester_id: i32,
    pub receiver_id: i32,
    pub offered_skill_id: Option<i32>,
    pub wanted_skill_id: Option<i32>,
    pub status: String,
    pub message: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating collaboration requests. The status column
/// is deliberately absent: the schema default `PENDING` is the only legal
/// initial state.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collab_requests)]
pub(crate) struct NewCollabRequestRow<'a> {
    pub requester_id: i32,
    pub receiver_id: i32,
    pub offered_skill_id: Option<i32>,
    pub wanted_skill_id: Option<i32>,
    pub message: Option<&'a str>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Insertable struct for appending audit events.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_log)]
pub(crate) struct NewAuditEventRow<'a> {
    pub actor_user_id: Option<i32>,
    pub entity: &'a str,
    pub entity_id: Option<i32>,
    pub action: &'a str,
    pub metadata: Option<&'a serde_json::Value>,
}
