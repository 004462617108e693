use carenest_types::api::FamilyMemberFilter;
use carenest_types::models::{FamilyMember, FamilySummary};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::{FamilyMemberChanges, NewFamilyMember};
use crate::sql::{self, Assignments, Conditions};
use crate::validation::{normalize_email, require_text, validate_email};

const ENTITY: &str = "family member";

const COLUMNS: &str = "id, first_name, last_name, email, phone, city, address,
                       care_recipient_info, house_rules, created_at, updated_at";

impl Database {
    pub fn create_family_member(&self, new: NewFamilyMember) -> Result<FamilyMember> {
        require_text("first_name", &new.first_name)?;
        require_text("last_name", &new.last_name)?;
        require_text("phone", &new.phone)?;
        require_text("city", &new.city)?;
        validate_email(&new.email)?;

        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO family_members (first_name, last_name, email, phone, password_hash, city,
                                             address, care_recipient_info, house_rules)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    new.first_name,
                    new.last_name,
                    normalize_email(&new.email),
                    new.phone,
                    new.password_hash,
                    new.city,
                    new.address,
                    new.care_recipient_info,
                    new.house_rules,
                ],
            )
            .map_err(|e| DbError::from_write(e, ENTITY, "email already registered"))?;

            let id = tx.last_insert_rowid();
            debug!("Created family member {}", id);
            fetch(tx, id)
        })
    }

    pub fn get_family_member(&self, id: i64) -> Result<FamilyMember> {
        self.with_conn(|conn| fetch(conn, id))
    }

    /// Ordered by last name.
    pub fn list_family_members(&self, filter: &FamilyMemberFilter) -> Result<Vec<FamilyMember>> {
        let cond = Conditions::new()
            .contains("house_rules", filter.house_rules.as_deref())
            .contains("address", filter.address.as_deref());

        let sql = format!(
            "SELECT {} FROM family_members{} ORDER BY last_name, id",
            COLUMNS,
            cond.where_sql()
        );
        self.with_conn(|conn| cond.query(conn, &sql, from_row))
    }

    pub fn update_family_member(
        &self,
        id: i64,
        changes: FamilyMemberChanges,
    ) -> Result<FamilyMember> {
        for (field, value) in [
            ("first_name", &changes.first_name),
            ("last_name", &changes.last_name),
            ("phone", &changes.phone),
            ("city", &changes.city),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        if let Some(email) = &changes.email {
            validate_email(email)?;
        }

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "family_members", ENTITY, id)?;

            Assignments::new()
                .set("first_name", changes.first_name)
                .set("last_name", changes.last_name)
                .set("email", changes.email.as_deref().map(normalize_email))
                .set("phone", changes.phone)
                .set("password_hash", changes.password_hash)
                .set("city", changes.city)
                .set("address", changes.address)
                .set("care_recipient_info", changes.care_recipient_info)
                .set("house_rules", changes.house_rules)
                .apply(tx, "family_members", id, true)
                .map_err(|e| DbError::from_write(e, ENTITY, "email already in use"))?;

            fetch(tx, id)
        })
    }

    /// Cascades to the family's job posts (and their applications) and
    /// appointments. Messages keep their row with the family side nulled.
    pub fn delete_family_member(&self, id: i64) -> Result<()> {
        self.with_tx(|tx| sql::delete_by_id(tx, "family_members", ENTITY, id))?;
        debug!("Deleted family member {}", id);
        Ok(())
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<FamilyMember> {
    conn.query_row(
        &format!("SELECT {} FROM family_members WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: ENTITY, id })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<FamilyMember> {
    Ok(FamilyMember {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        city: row.get(5)?,
        address: row.get(6)?,
        care_recipient_info: row.get(7)?,
        house_rules: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Reads a summary from four consecutive columns (id, first, last, city)
/// starting at `start`. A null id means the LEFT JOIN found nothing.
pub(crate) fn summary_at(row: &Row<'_>, start: usize) -> rusqlite::Result<Option<FamilySummary>> {
    let Some(id) = row.get::<_, Option<i64>>(start)? else {
        return Ok(None);
    };
    Ok(Some(FamilySummary {
        id,
        first_name: row.get(start + 1)?,
        last_name: row.get(start + 2)?,
        city: row.get(start + 3)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMessage;
    use crate::testing;
    use carenest_types::models::Party;

    #[test]
    fn duplicate_email_is_a_conflict() {
        let db = testing::db();
        testing::family(&db, "bolat@example.com");

        let err = db
            .create_family_member(NewFamilyMember {
                first_name: "Second".into(),
                last_name: "Bolat".into(),
                email: "bolat@example.com".into(),
                phone: "+7".into(),
                password_hash: "h".into(),
                city: "Astana".into(),
                address: None,
                care_recipient_info: None,
                house_rules: None,
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { entity: "family member", .. }));
    }

    #[test]
    fn update_email_collision_is_a_conflict() {
        let db = testing::db();
        let a = testing::family(&db, "a@example.com");
        testing::family(&db, "b@example.com");

        let err = db
            .update_family_member(
                a.id,
                FamilyMemberChanges {
                    email: Some("b@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
        assert_eq!(db.get_family_member(a.id).unwrap().email, "a@example.com");
    }

    #[test]
    fn invalid_email_is_rejected_before_insert() {
        let db = testing::db();
        let err = db
            .create_family_member(NewFamilyMember {
                first_name: "Amina".into(),
                last_name: "Aminova".into(),
                email: "not-an-email".into(),
                phone: "+7".into(),
                password_hash: "h".into(),
                city: "Astana".into(),
                address: None,
                care_recipient_info: None,
                house_rules: None,
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert!(db.list_family_members(&FamilyMemberFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn delete_cascades_posts_and_applications_but_keeps_messages() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        // Family 2 owns post 2 (applications 1 and 5) and appointment 1,
        // and sent message 1 to caregiver 2.
        db.delete_family_member(2).unwrap();

        assert!(matches!(db.get_job_post(2), Err(DbError::NotFound { .. })));
        assert!(matches!(db.get_job_application(1), Err(DbError::NotFound { .. })));
        assert!(matches!(db.get_job_application(5), Err(DbError::NotFound { .. })));
        assert!(matches!(db.get_appointment(1), Err(DbError::NotFound { .. })));

        let message = db.get_message(1).unwrap();
        assert_eq!(message.sender, None);
        assert_eq!(message.receiver, Some(Party::Caregiver(2)));

        // Other families' data is untouched
        assert!(db.get_job_post(3).is_ok());
        assert_eq!(db.get_message(2).unwrap().receiver, Some(Party::Family(3)));
    }

    #[test]
    fn keyword_filters_ignore_case() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        let found = db
            .list_family_members(&FamilyMemberFilter {
                address: Some("KABANBAY batyr".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_name, "Aminova");

        let no_pets = db
            .list_family_members(&FamilyMemberFilter {
                house_rules: Some("no pets".into()),
                ..Default::default()
            })
            .unwrap();
        let names: Vec<&str> = no_pets.iter().map(|f| f.last_name.as_str()).collect();
        assert_eq!(names, ["Aminova", "Bolatov"]);
    }

    #[test]
    fn keyword_filters_fold_cyrillic() {
        let db = testing::db();
        db.create_family_member(NewFamilyMember {
            first_name: "Айгуль".into(),
            last_name: "Абаева".into(),
            email: "aigul@example.kz".into(),
            phone: "+77770000009".into(),
            password_hash: "h".into(),
            city: "Алматы".into(),
            address: Some("Улица Абая 10".into()),
            care_recipient_info: None,
            house_rules: Some("Без животных".into()),
        })
        .unwrap();

        for address in ["Улица Абая", "улица абая", "УЛИЦА"] {
            let found = db
                .list_family_members(&FamilyMemberFilter {
                    address: Some(address.into()),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(found.len(), 1, "address filter {:?}", address);
        }

        let found = db
            .list_family_members(&FamilyMemberFilter {
                house_rules: Some("без".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(found.len(), 1);

        assert_eq!(db.delete_families_by_address("УЛИЦА абая").unwrap(), 1);
        assert!(db.list_family_members(&FamilyMemberFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn email_domain_case_does_not_bypass_uniqueness() {
        let db = testing::db();
        testing::family(&db, "bolat@example.com");

        let err = db
            .create_family_member(NewFamilyMember {
                first_name: "Second".into(),
                last_name: "Bolat".into(),
                email: "bolat@Example.COM".into(),
                phone: "+7".into(),
                password_hash: "h".into(),
                city: "Astana".into(),
                address: None,
                care_recipient_info: None,
                house_rules: None,
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { entity: "family member", .. }));
    }

    #[test]
    fn message_survives_receiver_deletion() {
        let db = testing::db();
        let fam = testing::family(&db, "bolat@example.com");
        let cg = testing::caregiver(&db, "dana@example.com", 12.0);
        let msg = db
            .send_message(NewMessage {
                sender: Party::Caregiver(cg.id),
                receiver: Party::Family(fam.id),
                content: "See you Monday".into(),
            })
            .unwrap();

        db.delete_family_member(fam.id).unwrap();

        let kept = db.get_message(msg.id).unwrap();
        assert_eq!(kept.sender, Some(Party::Caregiver(cg.id)));
        assert_eq!(kept.receiver, None);
        assert_eq!(kept.content, "See you Monday");
    }
}
