//! Read-only aggregate queries over the live tables.
//!
//! Earnings use the caregiver's current `hourly_rate` at query time, not the
//! rate in effect when an appointment happened. Raising a rate therefore
//! re-prices past appointments in every report below.

use carenest_types::models::FamilySummary;
use carenest_types::reports::{
    AcceptedAppointment, ApplicantCount, ApplicationRosterEntry, CaregiverAveragePay,
    CaregiverCost, CaregiverEarnings, CaregiverHours,
};
use rusqlite::{Connection, Row, params};

use crate::Database;
use crate::error::Result;
use crate::sql::like_pattern;

impl Database {
    /// Accepted appointments by date, then caregiver display name.
    pub fn accepted_appointments(&self) -> Result<Vec<AcceptedAppointment>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT
                     c.first_name || ' ' || c.last_name AS caregiver_name,
                     f.first_name || ' ' || f.last_name AS family_member_name,
                     a.appointment_date,
                     a.start_time,
                     a.duration_hours
                 FROM appointments AS a
                 INNER JOIN caregivers AS c ON c.id = a.caregiver_id
                 INNER JOIN family_members AS f ON f.id = a.family_id
                 WHERE a.status = 'accepted'
                 ORDER BY a.appointment_date, caregiver_name",
                |row| {
                    Ok(AcceptedAppointment {
                        caregiver_name: row.get(0)?,
                        family_member_name: row.get(1)?,
                        appointment_date: row.get(2)?,
                        start_time: row.get(3)?,
                        duration_hours: row.get(4)?,
                    })
                },
            )
        })
    }

    /// Sum of accepted hours per caregiver, most hours first.
    pub fn total_hours_per_caregiver(&self) -> Result<Vec<CaregiverHours>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT
                     c.id,
                     c.first_name || ' ' || c.last_name AS caregiver_name,
                     SUM(a.duration_hours) AS total_hours
                 FROM caregivers AS c
                 INNER JOIN appointments AS a ON a.caregiver_id = c.id
                 WHERE a.status = 'accepted'
                 GROUP BY c.id
                 ORDER BY total_hours DESC, c.id",
                |row| {
                    Ok(CaregiverHours {
                        caregiver_id: row.get(0)?,
                        caregiver_name: row.get(1)?,
                        total_hours: row.get(2)?,
                    })
                },
            )
        })
    }

    /// Mean pay per accepted appointment, at the current rate.
    pub fn average_pay_per_caregiver(&self) -> Result<Vec<CaregiverAveragePay>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT
                     c.id,
                     c.first_name || ' ' || c.last_name AS caregiver_name,
                     AVG(a.duration_hours * c.hourly_rate) AS average_pay
                 FROM caregivers AS c
                 INNER JOIN appointments AS a ON a.caregiver_id = c.id
                 WHERE a.status = 'accepted'
                 GROUP BY c.id
                 ORDER BY average_pay DESC, c.id",
                |row| {
                    Ok(CaregiverAveragePay {
                        caregiver_id: row.get(0)?,
                        caregiver_name: row.get(1)?,
                        average_pay: row.get(2)?,
                    })
                },
            )
        })
    }

    /// Caregivers whose total earnings strictly exceed the mean of all
    /// per-caregiver totals. Only caregivers with at least one accepted
    /// appointment take part in the mean.
    pub fn above_average_earners(&self) -> Result<Vec<CaregiverEarnings>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT
                     c.id,
                     c.first_name || ' ' || c.last_name AS caregiver_name,
                     SUM(a.duration_hours * c.hourly_rate) AS total_earnings
                 FROM caregivers AS c
                 INNER JOIN appointments AS a ON a.caregiver_id = c.id
                 WHERE a.status = 'accepted'
                 GROUP BY c.id
                 HAVING SUM(a.duration_hours * c.hourly_rate) > (
                     SELECT AVG(caregiver_earnings)
                     FROM (
                         SELECT SUM(a2.duration_hours * c2.hourly_rate) AS caregiver_earnings
                         FROM caregivers AS c2
                         INNER JOIN appointments AS a2 ON a2.caregiver_id = c2.id
                         WHERE a2.status = 'accepted'
                         GROUP BY c2.id
                     ) AS earnings_per_caregiver
                 )
                 ORDER BY total_earnings DESC, c.id",
                |row| {
                    Ok(CaregiverEarnings {
                        caregiver_id: row.get(0)?,
                        caregiver_name: row.get(1)?,
                        total_earnings: row.get(2)?,
                    })
                },
            )
        })
    }

    /// Accepted hours, current rate and total cost per caregiver, costliest
    /// first.
    pub fn caregiver_costs(&self) -> Result<Vec<CaregiverCost>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT
                     c.id,
                     c.first_name || ' ' || c.last_name AS caregiver_name,
                     SUM(a.duration_hours) AS total_hours,
                     c.hourly_rate,
                     SUM(a.duration_hours * c.hourly_rate) AS total_cost
                 FROM caregivers AS c
                 INNER JOIN appointments AS a ON a.caregiver_id = c.id
                 WHERE a.status = 'accepted'
                 GROUP BY c.id
                 ORDER BY total_cost DESC, c.id",
                |row| {
                    Ok(CaregiverCost {
                        caregiver_id: row.get(0)?,
                        caregiver_name: row.get(1)?,
                        total_hours: row.get(2)?,
                        current_hourly_rate: row.get(3)?,
                        total_cost: row.get(4)?,
                    })
                },
            )
        })
    }

    /// Applications per job post, including posts nobody applied to.
    pub fn applicant_counts(&self) -> Result<Vec<ApplicantCount>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT
                     fm.id,
                     fm.first_name || ' ' || fm.last_name AS member_name,
                     jp.id AS job_id,
                     jp.title,
                     COUNT(ja.id) AS applicant_count
                 FROM family_members AS fm
                 INNER JOIN job_posts AS jp ON jp.family_id = fm.id
                 LEFT JOIN job_applications AS ja ON ja.job_post_id = jp.id
                 GROUP BY fm.id, jp.id
                 ORDER BY fm.last_name, jp.id",
                |row| {
                    Ok(ApplicantCount {
                        family_id: row.get(0)?,
                        member_name: row.get(1)?,
                        job_id: row.get(2)?,
                        job_title: row.get(3)?,
                        applicant_count: row.get(4)?,
                    })
                },
            )
        })
    }

    /// Rows of the `vw_job_applications` view, newest application first.
    pub fn application_roster(&self) -> Result<Vec<ApplicationRosterEntry>> {
        self.with_conn(|conn| {
            collect(
                conn,
                "SELECT application_id, job_post_id, job_title, family_member_name,
                        caregiver_name, status, created_at
                 FROM vw_job_applications
                 ORDER BY created_at DESC, application_id DESC",
                |row| {
                    Ok(ApplicationRosterEntry {
                        application_id: row.get(0)?,
                        job_post_id: row.get(1)?,
                        job_title: row.get(2)?,
                        family_member_name: row.get(3)?,
                        caregiver_name: row.get(4)?,
                        status: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                },
            )
        })
    }

    /// Ids of job posts whose requirements mention `keyword`, ignoring case.
    pub fn job_posts_requiring(&self, keyword: &str) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id FROM job_posts
                 WHERE casefold(requirements) LIKE ?1 ESCAPE '\\'
                 ORDER BY id",
            )?;
            let ids = stmt
                .query_map([like_pattern(keyword)], |row| row.get(0))?
                .collect::<std::result::Result<Vec<i64>, _>>()?;
            Ok(ids)
        })
    }

    /// Families with a post for `caregiver_type` in `city` whose house rules
    /// mention `rule`, ignoring case. Ordered by last name.
    pub fn families_with_rule(
        &self,
        caregiver_type: &str,
        city: &str,
        rule: &str,
    ) -> Result<Vec<FamilySummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT f.id, f.first_name, f.last_name, f.city
                 FROM family_members AS f
                 INNER JOIN job_posts AS jp ON jp.family_id = f.id
                 WHERE jp.caregiver_type = ?1
                   AND jp.city = ?2
                   AND casefold(f.house_rules) LIKE ?3 ESCAPE '\\'
                 ORDER BY f.last_name, f.id",
            )?;
            let rows = stmt
                .query_map(params![caregiver_type, city, like_pattern(rule)], |row| {
                    Ok(FamilySummary {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        city: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn collect<T, F>(conn: &Connection, sql: &str, map: F) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
