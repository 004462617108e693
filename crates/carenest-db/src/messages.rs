use carenest_types::api::MessageFilter;
use carenest_types::models::{Message, Party};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::NewMessage;
use crate::sql::{self, Assignments, Conditions};
use crate::validation::require_text;

const ENTITY: &str = "message";

const COLUMNS: &str = "id, sender_family_id, sender_caregiver_id, receiver_family_id,
                       receiver_caregiver_id, content, created_at";

impl Database {
    pub fn send_message(&self, new: NewMessage) -> Result<Message> {
        require_text("content", &new.content)?;

        let (sender_family, sender_caregiver) = new.sender.columns();
        let (receiver_family, receiver_caregiver) = new.receiver.columns();

        self.with_tx(|tx| {
            ensure_party(tx, new.sender)?;
            ensure_party(tx, new.receiver)?;

            tx.execute(
                "INSERT INTO messages (sender_family_id, sender_caregiver_id, receiver_family_id,
                                       receiver_caregiver_id, content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    sender_family,
                    sender_caregiver,
                    receiver_family,
                    receiver_caregiver,
                    new.content,
                ],
            )
            .map_err(|e| DbError::from_write(e, ENTITY, "duplicate message"))?;

            let id = tx.last_insert_rowid();
            debug!("Message {} sent {:?} -> {:?}", id, new.sender, new.receiver);
            fetch(tx, id)
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Message> {
        self.with_conn(|conn| fetch(conn, id))
    }

    /// Oldest first. Each filter id matches the party as sender or receiver.
    pub fn list_messages(&self, filter: &MessageFilter) -> Result<Vec<Message>> {
        let cond = Conditions::new()
            .push(
                "(sender_family_id = ? OR receiver_family_id = ?)",
                filter.family_id,
            )
            .push(
                "(sender_caregiver_id = ? OR receiver_caregiver_id = ?)",
                filter.caregiver_id,
            );

        let sql = format!(
            "SELECT {} FROM messages{} ORDER BY created_at ASC, id ASC",
            COLUMNS,
            cond.where_sql()
        );
        self.with_conn(|conn| cond.query(conn, &sql, from_row))
    }

    /// Only the content of a message can change.
    pub fn update_message(&self, id: i64, content: Option<String>) -> Result<Message> {
        if let Some(content) = &content {
            require_text("content", content)?;
        }

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "messages", ENTITY, id)?;
            Assignments::new()
                .set("content", content)
                .apply(tx, "messages", id, false)?;
            fetch(tx, id)
        })
    }

    pub fn delete_message(&self, id: i64) -> Result<()> {
        self.with_tx(|tx| sql::delete_by_id(tx, "messages", ENTITY, id))
    }
}

fn ensure_party(conn: &Connection, party: Party) -> Result<()> {
    match party {
        Party::Family(id) => sql::ensure_exists(conn, "family_members", "family member", id),
        Party::Caregiver(id) => sql::ensure_exists(conn, "caregivers", "caregiver", id),
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<Message> {
    conn.query_row(
        &format!("SELECT {} FROM messages WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: ENTITY, id })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender: Party::from_columns(row.get(1)?, row.get(2)?),
        receiver: Party::from_columns(row.get(3)?, row.get(4)?),
        content: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn send_and_read_back() {
        let db = testing::db();
        let fam = testing::family(&db, "bolat@example.com");
        let cg = testing::caregiver(&db, "dana@example.com", 12.0);

        let msg = db
            .send_message(NewMessage {
                sender: Party::Family(fam.id),
                receiver: Party::Caregiver(cg.id),
                content: "We appreciate your support with our father.".into(),
            })
            .unwrap();
        assert_eq!(msg.sender, Some(Party::Family(fam.id)));
        assert_eq!(msg.receiver, Some(Party::Caregiver(cg.id)));
        assert_eq!(db.get_message(msg.id).unwrap(), msg);
    }

    #[test]
    fn unknown_party_is_not_found() {
        let db = testing::db();
        let fam = testing::family(&db, "bolat@example.com");

        let err = db
            .send_message(NewMessage {
                sender: Party::Family(fam.id),
                receiver: Party::Caregiver(404),
                content: "hello".into(),
            })
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "caregiver", id: 404 }));
    }

    #[test]
    fn filters_match_either_role() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        // Caregiver 1 sent message 2; caregiver 2 received message 1
        let ids = |filter: MessageFilter| -> Vec<i64> {
            db.list_messages(&filter).unwrap().iter().map(|m| m.id).collect()
        };
        assert_eq!(ids(MessageFilter::default()), [1, 2]);
        assert_eq!(ids(MessageFilter { caregiver_id: Some(1), family_id: None }), [2]);
        assert_eq!(ids(MessageFilter { caregiver_id: Some(2), family_id: None }), [1]);
        assert_eq!(ids(MessageFilter { family_id: Some(3), caregiver_id: None }), [2]);
        assert!(ids(MessageFilter { family_id: Some(4), caregiver_id: None }).is_empty());
    }

    #[test]
    fn update_changes_content_only() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        let before = db.get_message(2).unwrap();
        let after = db.update_message(2, Some("See you Saturday.".into())).unwrap();
        assert_eq!(after.content, "See you Saturday.");
        assert_eq!(after.sender, before.sender);
        assert_eq!(after.created_at, before.created_at);

        assert!(matches!(db.update_message(2, Some(" ".into())), Err(DbError::Validation(_))));
        db.delete_message(2).unwrap();
        assert!(matches!(db.get_message(2), Err(DbError::NotFound { .. })));
    }

    #[test]
    fn storage_rejects_two_senders() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        let err = db
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO messages (sender_family_id, sender_caregiver_id, receiver_family_id, content)
                     VALUES (1, 1, 2, 'both')",
                    [],
                )
                .map_err(|e| DbError::from_write(e, ENTITY, "duplicate message"))
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
