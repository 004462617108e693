//! Bulk statements that touch many rows at once. Each returns the number of
//! rows it changed at the top level; cascaded deletes are not counted.

use rusqlite::params;
use tracing::info;

use crate::Database;
use crate::error::{DbError, Result};
use crate::sql::like_pattern;
use crate::validation::require_text;

impl Database {
    /// Rates below 10 gain 0.3, the rest gain 10%. Rounded to cents.
    pub fn raise_hourly_rates(&self) -> Result<usize> {
        let changed = self.with_tx(|tx| {
            Ok(tx.execute(
                "UPDATE caregivers
                 SET hourly_rate = ROUND(
                         CASE
                             WHEN hourly_rate < 10 THEN hourly_rate + 0.3
                             ELSE hourly_rate * 1.10
                         END,
                         2
                     ),
                     updated_at = CURRENT_TIMESTAMP",
                [],
            )?)
        })?;
        info!("Raised hourly rate for {} caregivers", changed);
        Ok(changed)
    }

    /// Sets the phone of every caregiver with exactly this first and last name.
    pub fn update_caregiver_phone_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<usize> {
        require_text("phone", phone)?;

        let changed = self.with_tx(|tx| {
            tx.execute(
                "UPDATE caregivers
                 SET phone = ?1, updated_at = CURRENT_TIMESTAMP
                 WHERE first_name = ?2 AND last_name = ?3",
                params![phone, first_name, last_name],
            )
            .map_err(|e| DbError::from_write(e, "caregiver", "phone update rejected"))
        })?;
        info!("Updated phone for {} caregivers named {} {}", changed, first_name, last_name);
        Ok(changed)
    }

    /// Removes every job post belonging to families with this name. The
    /// posts' applications go with them.
    pub fn delete_job_posts_by_family_name(&self, first_name: &str, last_name: &str) -> Result<usize> {
        let deleted = self.with_tx(|tx| {
            Ok(tx.execute(
                "DELETE FROM job_posts
                 WHERE family_id IN (
                     SELECT id FROM family_members
                     WHERE first_name = ?1 AND last_name = ?2
                 )",
                params![first_name, last_name],
            )?)
        })?;
        info!("Deleted {} job posts of {} {}", deleted, first_name, last_name);
        Ok(deleted)
    }

    /// Removes families whose address contains `keyword`, ignoring case,
    /// with everything that cascades from them.
    pub fn delete_families_by_address(&self, keyword: &str) -> Result<usize> {
        require_text("keyword", keyword)?;

        let deleted = self.with_tx(|tx| {
            Ok(tx.execute(
                "DELETE FROM family_members WHERE casefold(address) LIKE ?1 ESCAPE '\\'",
                [like_pattern(keyword)],
            )?)
        })?;
        info!("Deleted {} families matching address '{}'", deleted, keyword);
        Ok(deleted)
    }
}
