use carenest_types::api::JobPostFilter;
use carenest_types::models::JobPost;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::debug;

use crate::Database;
use crate::error::{DbError, Result};
use crate::families;
use crate::models::{JobPostChanges, NewJobPost};
use crate::sql::{self, Assignments, Conditions};
use crate::validation::{require_non_negative, require_text};

const ENTITY: &str = "job post";

const SELECT: &str = "SELECT jp.id, jp.family_id, jp.title, jp.caregiver_type, jp.city,
                             jp.care_recipient_age, jp.description, jp.preferred_time_slots,
                             jp.frequency, jp.requirements, jp.created_at, jp.updated_at,
                             f.id, f.first_name, f.last_name, f.city
                      FROM job_posts AS jp
                      LEFT JOIN family_members AS f ON f.id = jp.family_id";

impl Database {
    pub fn create_job_post(&self, new: NewJobPost) -> Result<JobPost> {
        require_text("title", &new.title)?;
        require_text("caregiver_type", &new.caregiver_type)?;
        require_text("city", &new.city)?;
        if let Some(age) = new.care_recipient_age {
            require_non_negative("care_recipient_age", age)?;
        }
        let slots = serde_json::to_string(&new.preferred_time_slots)?;

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "family_members", "family member", new.family_id)?;

            tx.execute(
                "INSERT INTO job_posts (family_id, title, caregiver_type, city, care_recipient_age,
                                        description, preferred_time_slots, frequency, requirements)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    new.family_id,
                    new.title,
                    new.caregiver_type,
                    new.city,
                    new.care_recipient_age,
                    new.description,
                    slots,
                    new.frequency,
                    new.requirements,
                ],
            )
            .map_err(|e| DbError::from_write(e, ENTITY, "duplicate job post"))?;

            let id = tx.last_insert_rowid();
            debug!("Family {} created job post {}", new.family_id, id);
            fetch(tx, id)
        })
    }

    pub fn get_job_post(&self, id: i64) -> Result<JobPost> {
        self.with_conn(|conn| fetch(conn, id))
    }

    /// Newest first.
    pub fn list_job_posts(&self, filter: &JobPostFilter) -> Result<Vec<JobPost>> {
        let cond = Conditions::new()
            .equals("jp.caregiver_type = ?", filter.caregiver_type.as_deref())
            .contains("jp.city", filter.city.as_deref())
            .contains("jp.requirements", filter.requirements.as_deref());

        let sql = format!(
            "{}{} ORDER BY jp.created_at DESC, jp.id DESC",
            SELECT,
            cond.where_sql()
        );
        self.with_conn(|conn| cond.query(conn, &sql, from_row))
    }

    pub fn update_job_post(&self, id: i64, changes: JobPostChanges) -> Result<JobPost> {
        for (field, value) in [
            ("title", &changes.title),
            ("caregiver_type", &changes.caregiver_type),
            ("city", &changes.city),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        if let Some(age) = changes.care_recipient_age {
            require_non_negative("care_recipient_age", age)?;
        }
        let slots = changes
            .preferred_time_slots
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "job_posts", ENTITY, id)?;

            Assignments::new()
                .set("title", changes.title)
                .set("caregiver_type", changes.caregiver_type)
                .set("city", changes.city)
                .set("care_recipient_age", changes.care_recipient_age)
                .set("description", changes.description)
                .set("preferred_time_slots", slots)
                .set("frequency", changes.frequency)
                .set("requirements", changes.requirements)
                .apply(tx, "job_posts", id, true)
                .map_err(|e| DbError::from_write(e, ENTITY, "duplicate job post"))?;

            fetch(tx, id)
        })
    }

    /// Cascades to the post's applications.
    pub fn delete_job_post(&self, id: i64) -> Result<()> {
        self.with_tx(|tx| sql::delete_by_id(tx, "job_posts", ENTITY, id))?;
        debug!("Deleted job post {}", id);
        Ok(())
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<JobPost> {
    conn.query_row(&format!("{} WHERE jp.id = ?1", SELECT), [id], from_row)
        .optional()?
        .ok_or(DbError::NotFound { entity: ENTITY, id })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<JobPost> {
    Ok(JobPost {
        id: row.get(0)?,
        family_id: row.get(1)?,
        title: row.get(2)?,
        caregiver_type: row.get(3)?,
        city: row.get(4)?,
        care_recipient_age: row.get(5)?,
        description: row.get(6)?,
        preferred_time_slots: time_slots(row, 7)?,
        frequency: row.get(8)?,
        requirements: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        family: families::summary_at(row, 12)?,
    })
}

/// Slots are stored as a JSON array of strings; NULL reads as empty.
fn time_slots(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        _ => Ok(Vec::new()),
    }
}
