//! Rows produced by the reporting queries. Each report recomputes from the
//! live tables; nothing here is persisted.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted appointment with both parties' display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedAppointment {
    pub caregiver_name: String,
    pub family_member_name: String,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverHours {
    pub caregiver_id: i64,
    pub caregiver_name: String,
    pub total_hours: f64,
}

/// Average of `duration_hours * hourly_rate` over accepted appointments.
/// The rate is the caregiver's current one, not the rate at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverAveragePay {
    pub caregiver_id: i64,
    pub caregiver_name: String,
    pub average_pay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverEarnings {
    pub caregiver_id: i64,
    pub caregiver_name: String,
    pub total_earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverCost {
    pub caregiver_id: i64,
    pub caregiver_name: String,
    pub total_hours: f64,
    pub current_hourly_rate: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantCount {
    pub family_id: i64,
    pub member_name: String,
    pub job_id: i64,
    pub job_title: String,
    pub applicant_count: i64,
}

/// A row of the `vw_job_applications` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRosterEntry {
    pub application_id: i64,
    pub job_post_id: i64,
    pub job_title: String,
    pub family_member_name: String,
    pub caregiver_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
