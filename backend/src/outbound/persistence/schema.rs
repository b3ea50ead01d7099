//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database.

diesel::table! {
    /// Registered marketplace users.
    users (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        /// Unique login/contact address (max 255 characters).
        #[max_length = 255]
        email -> Varchar,
        /// Optional display name (max 120 characters).
        #[max_length = 120]
        full_name -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Teachable skills catalogue.
    skills (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        /// Unique URL-safe identifier derived from the name.
        #[max_length = 120]
        slug -> Varchar,
        #[max_length = 80]
        category -> Nullable<Varchar>,
        /// Inactive skills are hidden from default searches.
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Collaboration requests between two users.
    collab_requests (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        requester_id -> Int4,
        receiver_id -> Int4,
        offered_skill_id -> Nullable<Int4>,
        wanted_skill_id -> Nullable<Int4>,
        /// Lifecycle keyword, constrained by a CHECK to the five states.
        #[max_length = 16]
        status -> Varchar,
        #[max_length = 500]
        message -> Nullable<Varchar>,
        scheduled_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        /// Advanced on every successful status or schedule mutation.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail for accepted mutations.
    audit_log (id) {
        /// Primary key: bigserial identifier.
        id -> Int8,
        /// Acting user; null for system-originated writes.
        actor_user_id -> Nullable<Int4>,
        #[max_length = 64]
        entity -> Varchar,
        entity_id -> Nullable<Int4>,
        #[max_length = 32]
        action -> Varchar,
        metadata -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, skills, collab_requests, audit_log);
