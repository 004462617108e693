use carenest_types::api::CaregiverFilter;
use carenest_types::models::{Caregiver, CaregiverSummary};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::{CaregiverChanges, NewCaregiver};
use crate::sql::{self, Assignments, Conditions};
use crate::validation::{
    normalize_email, require_non_negative_amount, require_positive, require_text, validate_email,
};

const ENTITY: &str = "caregiver";
const EMAIL_TAKEN: &str = "email already registered";

const COLUMNS: &str = "id, first_name, last_name, caregiver_type, gender, photo_url, email, phone,
                       city, hourly_rate, bio, created_at, updated_at";

impl Database {
    pub fn create_caregiver(&self, new: NewCaregiver) -> Result<Caregiver> {
        require_text("first_name", &new.first_name)?;
        require_text("last_name", &new.last_name)?;
        require_text("caregiver_type", &new.caregiver_type)?;
        require_text("phone", &new.phone)?;
        require_text("city", &new.city)?;
        validate_email(&new.email)?;
        require_positive("hourly_rate", new.hourly_rate)?;

        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO caregivers (first_name, last_name, caregiver_type, gender, photo_url,
                                         email, phone, city, hourly_rate, bio, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                rusqlite::params![
                    new.first_name,
                    new.last_name,
                    new.caregiver_type,
                    new.gender,
                    new.photo_url,
                    normalize_email(&new.email),
                    new.phone,
                    new.city,
                    new.hourly_rate,
                    new.bio,
                    new.password_hash,
                ],
            )
            .map_err(|e| DbError::from_write(e, ENTITY, EMAIL_TAKEN))?;

            let id = tx.last_insert_rowid();
            debug!("Created caregiver {}", id);
            fetch(tx, id)
        })
    }

    pub fn get_caregiver(&self, id: i64) -> Result<Caregiver> {
        self.with_conn(|conn| fetch(conn, id))
    }

    /// Ordered by last name, then first name.
    pub fn list_caregivers(&self, filter: &CaregiverFilter) -> Result<Vec<Caregiver>> {
        if let Some(rate) = filter.min_rate {
            require_non_negative_amount("min_rate", rate)?;
        }
        if let Some(rate) = filter.max_rate {
            require_non_negative_amount("max_rate", rate)?;
        }

        let cond = Conditions::new()
            .equals("caregiver_type = ?", filter.caregiver_type.as_deref())
            .contains("city", filter.city.as_deref())
            .push("hourly_rate >= ?", filter.min_rate)
            .push("hourly_rate <= ?", filter.max_rate);

        let sql = format!(
            "SELECT {} FROM caregivers{} ORDER BY last_name, first_name, id",
            COLUMNS,
            cond.where_sql()
        );
        self.with_conn(|conn| cond.query(conn, &sql, from_row))
    }

    pub fn update_caregiver(&self, id: i64, changes: CaregiverChanges) -> Result<Caregiver> {
        for (field, value) in [
            ("first_name", &changes.first_name),
            ("last_name", &changes.last_name),
            ("caregiver_type", &changes.caregiver_type),
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
        if let Some(rate) = changes.hourly_rate {
            require_positive("hourly_rate", rate)?;
        }

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "caregivers", ENTITY, id)?;

            Assignments::new()
                .set("first_name", changes.first_name)
                .set("last_name", changes.last_name)
                .set("caregiver_type", changes.caregiver_type)
                .set("gender", changes.gender)
                .set("photo_url", changes.photo_url)
                .set("email", changes.email.as_deref().map(normalize_email))
                .set("phone", changes.phone)
                .set("city", changes.city)
                .set("hourly_rate", changes.hourly_rate)
                .set("bio", changes.bio)
                .set("password_hash", changes.password_hash)
                .apply(tx, "caregivers", id, true)
                .map_err(|e| DbError::from_write(e, ENTITY, "email already in use"))?;

            fetch(tx, id)
        })
    }

    /// Cascades to the caregiver's applications and appointments; messages
    /// keep their row with the caregiver side nulled.
    pub fn delete_caregiver(&self, id: i64) -> Result<()> {
        self.with_tx(|tx| sql::delete_by_id(tx, "caregivers", ENTITY, id))?;
        debug!("Deleted caregiver {}", id);
        Ok(())
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<Caregiver> {
    conn.query_row(
        &format!("SELECT {} FROM caregivers WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(DbError::NotFound { entity: ENTITY, id })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Caregiver> {
    Ok(Caregiver {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        caregiver_type: row.get(3)?,
        gender: row.get(4)?,
        photo_url: row.get(5)?,
        email: row.get(6)?,
        phone: row.get(7)?,
        city: row.get(8)?,
        hourly_rate: row.get(9)?,
        bio: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

/// Reads a summary from five consecutive columns (id, first, last, type,
/// city) starting at `start`.
pub(crate) fn summary_at(row: &Row<'_>, start: usize) -> rusqlite::Result<Option<CaregiverSummary>> {
    let Some(id) = row.get::<_, Option<i64>>(start)? else {
        return Ok(None);
    };
    Ok(Some(CaregiverSummary {
        id,
        first_name: row.get(start + 1)?,
        last_name: row.get(start + 2)?,
        caregiver_type: row.get(start + 3)?,
        city: row.get(start + 4)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use crate::validation::ValidationError;

    #[test]
    fn create_assigns_id_and_timestamps() {
        let db = testing::db();
        let a = testing::caregiver(&db, "dana@example.com", 12.0);
        let b = testing::caregiver(&db, "timur@example.com", 11.0);

        assert_ne!(a.id, b.id);
        assert_eq!(a.hourly_rate, 12.0);
        assert!(a.updated_at >= a.created_at);
        assert_eq!(db.get_caregiver(a.id).unwrap(), a);
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let db = testing::db();
        testing::caregiver(&db, "dana@example.com", 12.0);

        let mut dup = NewCaregiver {
            first_name: "Other".into(),
            last_name: "Person".into(),
            caregiver_type: "Babysitter".into(),
            gender: None,
            photo_url: None,
            email: "dana@example.com".into(),
            phone: "+7".into(),
            city: "Almaty".into(),
            hourly_rate: 8.0,
            bio: None,
            password_hash: "h".into(),
        };
        assert!(matches!(
            db.create_caregiver(dup.clone()),
            Err(DbError::Conflict { entity: "caregiver", .. })
        ));

        // Domains compare without case
        dup.email = "dana@EXAMPLE.com".into();
        assert!(matches!(
            db.create_caregiver(dup.clone()),
            Err(DbError::Conflict { entity: "caregiver", .. })
        ));

        dup.email = "other@example.com".into();
        assert!(db.create_caregiver(dup).is_ok());
    }

    #[test]
    fn email_is_stored_with_lowercase_domain() {
        let db = testing::db();
        let c = testing::caregiver(&db, " Dana@Example.COM ", 12.0);
        assert_eq!(c.email, "Dana@example.com");

        let other = testing::caregiver(&db, "timur@example.com", 11.0);
        let taken = CaregiverChanges {
            email: Some("Dana@EXAMPLE.com".into()),
            ..Default::default()
        };
        assert!(matches!(db.update_caregiver(other.id, taken), Err(DbError::Conflict { .. })));
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        let db = testing::db();
        let new = NewCaregiver {
            first_name: "Arman".into(),
            last_name: "Armanov".into(),
            caregiver_type: "Babysitter".into(),
            gender: None,
            photo_url: None,
            email: "arman@example.com".into(),
            phone: "+7".into(),
            city: "Astana".into(),
            hourly_rate: 0.0,
            bio: None,
            password_hash: "h".into(),
        };
        assert!(matches!(
            db.create_caregiver(new),
            Err(DbError::Validation(ValidationError::NotPositive { field: "hourly_rate", .. }))
        ));

        let c = testing::caregiver(&db, "dana@example.com", 12.0);
        let changes = CaregiverChanges {
            hourly_rate: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(db.update_caregiver(c.id, changes), Err(DbError::Validation(_))));
    }

    #[test]
    fn storage_check_backs_up_validation() {
        let db = testing::db();
        let c = testing::caregiver(&db, "dana@example.com", 12.0);

        let err = db
            .with_tx(|tx| {
                Assignments::new()
                    .set("hourly_rate", Some(0.0))
                    .apply(tx, "caregivers", c.id, true)
                    .map_err(|e| DbError::from_write(e, ENTITY, EMAIL_TAKEN))
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Constraint(_))));
    }

    #[test]
    fn partial_update_changes_only_supplied_fields() {
        let db = testing::db();
        let c = testing::caregiver(&db, "dana@example.com", 12.0);

        let updated = db
            .update_caregiver(
                c.id,
                CaregiverChanges {
                    phone: Some("+77773414141".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.phone, "+77773414141");
        assert_eq!(updated.email, c.email);
        assert_eq!(updated.hourly_rate, c.hourly_rate);
        assert_eq!(updated.created_at, c.created_at);
    }

    #[test]
    fn update_refreshes_updated_at() {
        let db = testing::db();
        let c = testing::caregiver(&db, "dana@example.com", 12.0);
        let backdate = |db: &Database| {
            db.with_conn(|conn| {
                conn.execute(
                    "UPDATE caregivers SET updated_at = '2000-01-01 00:00:00' WHERE id = ?1",
                    [c.id],
                )?;
                Ok(())
            })
            .unwrap();
        };

        backdate(&db);
        let stale = db.get_caregiver(c.id).unwrap().updated_at;
        let updated = db
            .update_caregiver(
                c.id,
                CaregiverChanges {
                    phone: Some("+77773414141".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.updated_at > stale);
        assert_eq!(updated.created_at, c.created_at);

        // An empty change set leaves the row alone
        backdate(&db);
        let untouched = db.update_caregiver(c.id, CaregiverChanges::default()).unwrap();
        assert_eq!(untouched.updated_at, stale);
    }

    #[test]
    fn password_hash_is_replaced_on_update() {
        let db = testing::db();
        let c = testing::caregiver(&db, "dana@example.com", 12.0);
        db.update_caregiver(
            c.id,
            CaregiverChanges {
                password_hash: Some("$argon2id$rotated".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let stored: String = db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT password_hash FROM caregivers WHERE id = ?1",
                    [c.id],
                    |r| r.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(stored, "$argon2id$rotated");
    }

    #[test]
    fn update_email_collision_is_a_conflict() {
        let db = testing::db();
        let a = testing::caregiver(&db, "dana@example.com", 12.0);
        testing::caregiver(&db, "timur@example.com", 11.0);

        let taken = CaregiverChanges {
            email: Some("timur@example.com".into()),
            ..Default::default()
        };
        assert!(matches!(db.update_caregiver(a.id, taken), Err(DbError::Conflict { .. })));

        // Re-submitting its own email is fine
        let same = CaregiverChanges {
            email: Some("dana@example.com".into()),
            ..Default::default()
        };
        assert!(db.update_caregiver(a.id, same).is_ok());
    }

    #[test]
    fn missing_ids_are_not_found() {
        let db = testing::db();
        assert!(matches!(db.get_caregiver(42), Err(DbError::NotFound { id: 42, .. })));
        assert!(matches!(
            db.update_caregiver(42, CaregiverChanges::default()),
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(db.delete_caregiver(42), Err(DbError::NotFound { .. })));
    }

    #[test]
    fn list_filters_and_order() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        let all = db.list_caregivers(&CaregiverFilter::default()).unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.last_name.as_str()).collect();
        assert_eq!(names, ["Armanov", "Bekov", "Sadyk", "Zhan"]);

        let sitters = db
            .list_caregivers(&CaregiverFilter {
                caregiver_type: Some("Babysitter".into()),
                city: Some("astana".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(sitters.len(), 2);

        let mid_range = db
            .list_caregivers(&CaregiverFilter {
                min_rate: Some(10.0),
                max_rate: Some(12.0),
                ..Default::default()
            })
            .unwrap();
        let ids: Vec<i64> = mid_range.iter().map(|c| c.id).collect();
        assert_eq!(ids, [3, 2]);

        let blank_type = db
            .list_caregivers(&CaregiverFilter {
                caregiver_type: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(blank_type.len(), 4);
    }

    #[test]
    fn negative_rate_bounds_are_rejected() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        assert!(matches!(
            db.list_caregivers(&CaregiverFilter {
                min_rate: Some(-1.0),
                ..Default::default()
            }),
            Err(DbError::Validation(ValidationError::NegativeAmount { field: "min_rate", .. }))
        ));
        assert!(matches!(
            db.list_caregivers(&CaregiverFilter {
                max_rate: Some(-0.5),
                ..Default::default()
            }),
            Err(DbError::Validation(ValidationError::NegativeAmount { field: "max_rate", .. }))
        ));
        assert_eq!(
            db.list_caregivers(&CaregiverFilter {
                min_rate: Some(0.0),
                ..Default::default()
            })
            .unwrap()
            .len(),
            4
        );
    }
}
