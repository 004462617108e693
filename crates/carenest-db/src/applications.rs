use carenest_types::api::JobApplicationFilter;
use carenest_types::models::{JobApplication, STATUS_APPLIED};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, warn};

use crate::Database;
use crate::caregivers;
use crate::error::{DbError, Result};
use crate::models::{JobApplicationChanges, NewJobApplication};
use crate::sql::{self, Assignments, Conditions};
use crate::validation::require_text;

const ENTITY: &str = "job application";
const ALREADY_APPLIED: &str = "caregiver already applied to this job post";

const SELECT: &str = "SELECT ja.id, ja.job_post_id, ja.caregiver_id, ja.cover_message, ja.status,
                             ja.created_at, ja.updated_at,
                             c.id, c.first_name, c.last_name, c.caregiver_type, c.city
                      FROM job_applications AS ja
                      LEFT JOIN caregivers AS c ON c.id = ja.caregiver_id";

impl Database {
    /// The (job post, caregiver) pair is unique; the unique index decides,
    /// so two racing applications cannot both land.
    pub fn create_job_application(&self, new: NewJobApplication) -> Result<JobApplication> {
        if let Some(status) = &new.status {
            require_text("status", status)?;
        }
        let status = new.status.unwrap_or_else(|| STATUS_APPLIED.to_string());

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "job_posts", "job post", new.job_post_id)?;
            sql::ensure_exists(tx, "caregivers", "caregiver", new.caregiver_id)?;

            tx.execute(
                "INSERT INTO job_applications (job_post_id, caregiver_id, cover_message, status)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![new.job_post_id, new.caregiver_id, new.cover_message, status],
            )
            .map_err(|e| DbError::from_write(e, ENTITY, ALREADY_APPLIED))
            .inspect_err(|e| {
                if matches!(e, DbError::Conflict { .. }) {
                    warn!(
                        "Caregiver {} re-applied to job post {}",
                        new.caregiver_id, new.job_post_id
                    );
                }
            })?;

            let id = tx.last_insert_rowid();
            debug!(
                "Caregiver {} applied to job post {} ({})",
                new.caregiver_id, new.job_post_id, id
            );
            fetch(tx, id)
        })
    }

    pub fn get_job_application(&self, id: i64) -> Result<JobApplication> {
        self.with_conn(|conn| fetch(conn, id))
    }

    /// Newest first.
    pub fn list_job_applications(
        &self,
        filter: &JobApplicationFilter,
    ) -> Result<Vec<JobApplication>> {
        let cond = Conditions::new()
            .push("ja.job_post_id = ?", filter.job_post_id)
            .push("ja.caregiver_id = ?", filter.caregiver_id);

        let sql = format!(
            "{}{} ORDER BY ja.created_at DESC, ja.id DESC",
            SELECT,
            cond.where_sql()
        );
        self.with_conn(|conn| cond.query(conn, &sql, from_row))
    }

    pub fn update_job_application(
        &self,
        id: i64,
        changes: JobApplicationChanges,
    ) -> Result<JobApplication> {
        if let Some(status) = &changes.status {
            require_text("status", status)?;
        }

        self.with_tx(|tx| {
            sql::ensure_exists(tx, "job_applications", ENTITY, id)?;

            Assignments::new()
                .set("cover_message", changes.cover_message)
                .set("status", changes.status)
                .apply(tx, "job_applications", id, true)
                .map_err(|e| DbError::from_write(e, ENTITY, ALREADY_APPLIED))?;

            fetch(tx, id)
        })
    }

    pub fn delete_job_application(&self, id: i64) -> Result<()> {
        self.with_tx(|tx| sql::delete_by_id(tx, "job_applications", ENTITY, id))?;
        debug!("Deleted job application {}", id);
        Ok(())
    }
}

fn fetch(conn: &Connection, id: i64) -> Result<JobApplication> {
    conn.query_row(&format!("{} WHERE ja.id = ?1", SELECT), [id], from_row)
        .optional()?
        .ok_or(DbError::NotFound { entity: ENTITY, id })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<JobApplication> {
    Ok(JobApplication {
        id: row.get(0)?,
        job_post_id: row.get(1)?,
        caregiver_id: row.get(2)?,
        cover_message: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        caregiver: caregivers::summary_at(row, 7)?,
    })
}
