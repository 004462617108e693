//! Write-side inputs for the store. Read-side rows are the shared
//! `carenest_types::models` structs; the password hash never leaves the table.

use carenest_types::models::Party;
use chrono::{NaiveDate, NaiveTime};

#[derive(Debug, Clone)]
pub struct NewCaregiver {
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
    pub password_hash: String,
}

/// `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct CaregiverChanges {
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
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFamilyMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub city: String,
    pub address: Option<String>,
    pub care_recipient_info: Option<String>,
    pub house_rules: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyMemberChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub care_recipient_info: Option<String>,
    pub house_rules: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewJobPost {
    pub family_id: i64,
    pub title: String,
    pub caregiver_type: String,
    pub city: String,
    pub care_recipient_age: Option<i64>,
    pub description: Option<String>,
    pub preferred_time_slots: Vec<String>,
    pub frequency: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobPostChanges {
    pub title: Option<String>,
    pub caregiver_type: Option<String>,
    pub city: Option<String>,
    pub care_recipient_age: Option<i64>,
    pub description: Option<String>,
    pub preferred_time_slots: Option<Vec<String>>,
    pub frequency: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewJobApplication {
    pub job_post_id: i64,
    pub caregiver_id: i64,
    pub cover_message: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobApplicationChanges {
    pub cover_message: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub caregiver_id: i64,
    pub family_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges {
    pub appointment_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_hours: Option<f64>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender: Party,
    pub receiver: Party,
    pub content: String,
}
