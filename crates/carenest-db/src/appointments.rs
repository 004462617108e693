use carenest_types::api::AppointmentFilter;
use carenest_types::models::{Appointment, STATUS_PENDING};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::Database;
use crate::error::{DbError, Result};
use crate::models::{AppointmentChanges, NewAppointment};
use crate::sql::{self, Assignments, Conditions};
use crate::validation::{require_positive, require_text};
use crate::{caregivers, families};

const ENTITY: &str = "appointment";

const SELECT: &str = "SELECT a.id, a.caregiver_id, a.family_id, a.appointment_date, a.start_time,
                             a.duration_hours, a.status, a.notes, a.created_at, a.updated_at,
                             c.id, c.first_name, c.last_name, c.caregiver_type, c.city,
                             f.id, f.first_name, f.last_name, f.city
                      FROM appointments AS a
                      LEFT JOIN caregivers AS c ON c.id = a.caregiver_id
                      LEFT JOIN family_members AS f ON f.id = a.family_id";

impl Database {
    pub fn create_appointment(&self, new: NewAppointment) -> Result<Appointment> {
        require_positive("duration_hours", new.duration_hours)?;
        if let Some(status) = &new.status {
            require_text("status", status)?;
        }
        let status = new.status.unwrap_or_else(|| STATUS_PENDING.to_string());

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "caregivers", "caregiver", new.caregiver_id)?;
            sql::ensure_exists(tx, "family_members", "family member", new.family_id)?;

            tx.execute(
                "INSERT INTO appointments (caregiver_id, family_id, appointment_date, start_time,
                                           duration_hours, status, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    new.caregiver_id,
                    new.family_id,
                    new.appointment_date,
                    new.start_time,
                    new.duration_hours,
                    status,
                    new.notes,
                ],
            )
            .map_err(|e| DbError::from_write(e, ENTITY, "duplicate appointment"))?;

            let id = tx.last_insert_rowid();
            debug!(
                "Booked appointment {} (caregiver {}, family {})",
                id, new.caregiver_id, new.family_id
            );
            fetch(tx, id)
        })
    }

    pub fn get_appointment(&self, id: i64) -> Result<Appointment> {
        self.with_conn(|conn| fetch(conn, id))
    }

    /// Latest date first.
    pub fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let cond = Conditions::new()
            .push("a.caregiver_id = ?", filter.caregiver_id)
            .push("a.family_id = ?", filter.family_id)
            .equals("a.status = ?", filter.status.as_deref());

        let sql = format!(
            "{}{} ORDER BY a.appointment_date DESC, a.id DESC",
            SELECT,
            cond.where_sql()
        );
        self.with_conn(|conn| cond.query(conn, &sql, from_row))
    }

    pub fn update_appointment(&self, id: i64, changes: AppointmentChanges) -> Result<Appointment> {
        if let Some(duration) = changes.duration_hours {
            require_positive("duration_hours", duration)?;
        }
        if let Some(status) = &changes.status {
            require_text("status", status)?;
        }

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "appointments", ENTITY, id)?;

            Assignments::new()
                .set("appointment_date", changes.appointment_date)
                .set("start_time", changes.start_time)
                .set("duration_hours", changes.duration_hours)
                .set("status", changes.status)
                .set("notes", changes.notes)
                .apply(tx, "appointments", id, true)
                .map_err(|e| DbError::from_write(e, ENTITY, "duplicate appointment"))?;

            fetch(tx, id)
        })
    }

    pub fn delete_appointment(&self, id: i64) -> Result<()> {
        self.with_tx(|tx| sql::delete_by_id(tx, "appointments", ENTITY, id))?;
        debug!("Deleted appointment {}", id);
        Ok(())
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<Appointment> {
    conn.query_row(&format!("{} WHERE a.id = ?1", SELECT), [id], from_row)
        .optional()?
        .ok_or(DbError::NotFound { entity: ENTITY, id })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        caregiver_id: row.get(1)?,
        family_id: row.get(2)?,
        appointment_date: row.get(3)?,
        start_time: row.get(4)?,
        duration_hours: row.get(5)?,
        status: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        caregiver: caregivers::summary_at(row, 10)?,
        family: families::summary_at(row, 15)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use crate::validation::ValidationError;
    use chrono::{NaiveDate, NaiveTime};

    fn booking(caregiver_id: i64, family_id: i64, hours: f64) -> NewAppointment {
        NewAppointment {
            caregiver_id,
            family_id,
            appointment_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_hours: hours,
            status: None,
            notes: Some("Morning companionship session".into()),
        }
    }

    #[test]
    fn create_defaults_to_pending_and_embeds_parties() {
        let db = testing::db();
        let cg = testing::caregiver(&db, "dana@example.com", 12.0);
        let fam = testing::family(&db, "bolat@example.com");

        let appt = db.create_appointment(booking(cg.id, fam.id, 4.0)).unwrap();
        assert_eq!(appt.status, "pending");
        assert_eq!(appt.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(appt.caregiver.unwrap().id, cg.id);
        assert_eq!(appt.family.unwrap().id, fam.id);
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        let db = testing::db();
        let cg = testing::caregiver(&db, "dana@example.com", 12.0);
        let fam = testing::family(&db, "bolat@example.com");

        assert!(matches!(
            db.create_appointment(booking(cg.id, fam.id, 0.0)),
            Err(DbError::Validation(ValidationError::NotPositive { field: "duration_hours", .. }))
        ));

        let appt = db.create_appointment(booking(cg.id, fam.id, 2.0)).unwrap();
        let err = db
            .update_appointment(
                appt.id,
                AppointmentChanges {
                    duration_hours: Some(-1.0),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[test]
    fn missing_parties_are_not_found() {
        let db = testing::db();
        let cg = testing::caregiver(&db, "dana@example.com", 12.0);
        assert!(matches!(
            db.create_appointment(booking(cg.id, 7, 1.0)),
            Err(DbError::NotFound { entity: "family member", id: 7 })
        ));
    }

    #[test]
    fn list_is_latest_first_with_filters() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        let all = db.list_appointments(&AppointmentFilter::default()).unwrap();
        let ids: Vec<i64> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, [5, 4, 3, 2, 1]);

        let accepted_for_dana = db
            .list_appointments(&AppointmentFilter {
                caregiver_id: Some(2),
                status: Some("accepted".into()),
                ..Default::default()
            })
            .unwrap();
        let ids: Vec<i64> = accepted_for_dana.iter().map(|a| a.id).collect();
        assert_eq!(ids, [4, 1]);

        let for_family_4 = db
            .list_appointments(&AppointmentFilter {
                family_id: Some(4),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(for_family_4.len(), 2);
    }

    #[test]
    fn update_status_refreshes_row() {
        let db = testing::db();
        db.load_fixtures().unwrap();

        let updated = db
            .update_appointment(
                5,
                AppointmentChanges {
                    status: Some("accepted".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, "accepted");
        assert_eq!(updated.duration_hours, 6.0);
        assert_eq!(updated.start_time, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    }
}
