//! Transactional audit append.
//!
//! Called from inside repository transactions only: the audit row commits or
//! rolls back together with the mutation it describes.

use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{AuditEvent, UserId};

use super::models::NewAuditEventRow;
use super::schema::audit_log;

/// Append one audit event on the given transaction connection.
pub(crate) async fn append_event(
    conn: &mut AsyncPgConnection,
    event: &AuditEvent,
) -> Result<(), diesel::result::Error> {
    let row = NewAuditEventRow {
        actor_user_id: event.actor_user_id.map(UserId::get),
        entity: event.entity,
        entity_id: event.entity_id,
        action: event.action.label(),
        metadata: event.metadata.as_ref(),
    };

    diesel::insert_into(audit_log::table)
        .values(&row)
        .execute(conn)
        .await
        .map(|_| ())
}
