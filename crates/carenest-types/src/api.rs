use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::Party;

// -- Caregivers --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCaregiverRequest {
    pub first_name: String,
    pub last_name: String,
    pub caregiver_type: String,
    pub gender: Option<String>,
    pub photo_url: Option<String>,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub hourly_rate: f64,
    pub bio: Option<String>,
    pub password: String,
}

/// Partial update: absent (or null) fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCaregiverRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub caregiver_type: Option<String>,
    pub gender: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub hourly_rate: Option<f64>,
    pub bio: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaregiverFilter {
    pub caregiver_type: Option<String>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
}

// -- Family members --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFamilyMemberRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: Option<String>,
    pub care_recipient_info: Option<String>,
    pub house_rules: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateFamilyMemberRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub care_recipient_info: Option<String>,
    pub house_rules: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FamilyMemberFilter {
    /// Case-insensitive keyword inside `house_rules`.
    pub house_rules: Option<String>,
    /// Case-insensitive keyword inside `address`.
    pub address: Option<String>,
}

// -- Job posts --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateJobPostRequest {
    pub family_id: i64,
    pub title: String,
    pub caregiver_type: String,
    pub city: String,
    pub care_recipient_age: Option<i64>,
    pub description: Option<String>,
    #[serde(default)]
    pub preferred_time_slots: Vec<String>,
    pub frequency: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateJobPostRequest {
    pub title: Option<String>,
    pub caregiver_type: Option<String>,
    pub city: Option<String>,
    pub care_recipient_age: Option<i64>,
    pub description: Option<String>,
    pub preferred_time_slots: Option<Vec<String>>,
    pub frequency: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostFilter {
    pub caregiver_type: Option<String>,
    /// Case-insensitive substring of the city.
    pub city: Option<String>,
    /// Case-insensitive keyword inside `requirements`.
    pub requirements: Option<String>,
}

// -- Job applications --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateJobApplicationRequest {
    pub job_post_id: i64,
    pub caregiver_id: i64,
    pub cover_message: Option<String>,
    /// Defaults to `applied`.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateJobApplicationRequest {
    pub cover_message: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobApplicationFilter {
    pub job_post_id: Option<i64>,
    pub caregiver_id: Option<i64>,
}

// -- Appointments --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAppointmentRequest {
    pub caregiver_id: i64,
    pub family_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
    /// Defaults to `pending`.
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_hours: Option<f64>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentFilter {
    pub caregiver_id: Option<i64>,
    pub family_id: Option<i64>,
    pub status: Option<String>,
}

// -- Messages --

/// Both parties are optional on the wire so a missing side is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub sender: Option<Party>,
    pub receiver: Option<Party>,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMessageRequest {
    pub content: Option<String>,
}

/// Each id matches the party in either the sender or the receiver role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageFilter {
    pub family_id: Option<i64>,
    pub caregiver_id: Option<i64>,
}

// -- Keyword reports --

#[derive(Debug, Clone, Deserialize)]
pub struct RequirementQuery {
    pub keyword: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HouseRulesQuery {
    pub caregiver_type: String,
    pub city: String,
    pub rule: String,
}

// -- Maintenance --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaregiverPhoneRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyNameRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressKeywordRequest {
    pub keyword: String,
}

/// Rows changed by a bulk statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedRows {
    pub affected: usize,
}
