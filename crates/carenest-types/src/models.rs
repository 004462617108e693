use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One side of a message: either a family member or a caregiver.
///
/// Serialized as `{"kind": "family", "id": 2}` / `{"kind": "caregiver", "id": 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Party {
    Family(i64),
    Caregiver(i64),
}

impl Party {
    /// Split into the `(family_id, caregiver_id)` column pair.
    pub fn columns(self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::Family(id) => (Some(id), None),
            Self::Caregiver(id) => (None, Some(id)),
        }
    }

    /// Rebuild from a stored column pair. `None` when both columns are null,
    /// which happens once the referenced party has been deleted.
    pub fn from_columns(family_id: Option<i64>, caregiver_id: Option<i64>) -> Option<Self> {
        match (family_id, caregiver_id) {
            (Some(id), _) => Some(Self::Family(id)),
            (None, Some(id)) => Some(Self::Caregiver(id)),
            (None, None) => None,
        }
    }
}

pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPLIED: &str = "applied";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: Option<String>,
    pub care_recipient_info: Option<String>,
    pub house_rules: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilySummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaregiverSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub caregiver_type: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: i64,
    pub family_id: i64,
    pub title: String,
    pub caregiver_type: String,
    pub city: String,
    pub care_recipient_age: Option<i64>,
    pub description: Option<String>,
    pub preferred_time_slots: Vec<String>,
    pub frequency: Option<String>,
    pub requirements: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub family: Option<FamilySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: i64,
    pub job_post_id: i64,
    pub caregiver_id: i64,
    pub cover_message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub caregiver: Option<CaregiverSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub caregiver_id: i64,
    pub family_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub caregiver: Option<CaregiverSummary>,
    pub family: Option<FamilySummary>,
}

/// Messages are historical records: a side becomes `None` when the party it
/// pointed at is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender: Option<Party>,
    pub receiver: Option<Party>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
