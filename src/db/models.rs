//! Diesel model structs for the GlucoTrack monitoring schema.
//!
//! Only the rows the monitoring task reads or writes are modeled here;
//! measurement rows are counted in SQL and never loaded.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema;

/// Labels of the alert types this task emits. The catalog in `alert_types`
/// is wider (severity tiers, symptom reports, the 3-day adherence
/// escalation); those rows are seeded but not produced by any check yet.
pub mod alert_labels {
    pub const NO_MEASUREMENTS: &str = "NO_MEASUREMENTS";
    pub const PARTIAL_MEASUREMENTS: &str = "PARTIAL_MEASUREMENTS";
    pub const REPEATED_PARTIAL_MEASUREMENTS: &str = "REPEATED_PARTIAL_MEASUREMENTS";
    pub const ADHERENCE_MISSING: &str = "ADHERENCE_MISSING";
}

pub mod role_labels {
    pub const PATIENT: &str = "PATIENT";
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::users)]
pub struct User {
    pub id: i32,
    pub role_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::therapies)]
#[diesel(belongs_to(User))]
pub struct Therapy {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::medication_schedules)]
#[diesel(belongs_to(Therapy))]
pub struct MedicationSchedule {
    pub id: i32,
    pub therapy_id: i32,
    pub medication_name: String,
    /// Expected intakes per day; values <= 0 are treated as 1.
    pub daily_intakes: i32,
    /// Expected dose per intake.
    pub quantity: f64,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::medication_intakes)]
#[diesel(belongs_to(MedicationSchedule))]
#[diesel(belongs_to(User))]
pub struct MedicationIntake {
    pub id: i32,
    pub user_id: i32,
    pub medication_schedule_id: i32,
    pub intake_at: DateTime<Utc>,
    /// Quantity the patient registered for this intake.
    pub expected_quantity: f64,
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::alert_types)]
pub struct AlertType {
    pub id: i32,
    pub label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::alerts)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(AlertType))]
pub struct Alert {
    pub id: i32,
    pub user_id: i32,
    pub alert_type_id: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::alerts)]
pub struct NewAlert {
    pub user_id: i32,
    pub alert_type_id: i32,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Serialize, Deserialize)]
#[diesel(table_name = schema::alert_recipients)]
#[diesel(primary_key(alert_id, recipient_user_id))]
#[diesel(belongs_to(Alert))]
pub struct AlertRecipient {
    pub alert_id: i32,
    pub recipient_user_id: i32,
    pub is_read: bool,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::alert_recipients)]
pub struct NewAlertRecipient {
    pub alert_id: i32,
    pub recipient_user_id: i32,
    pub is_read: bool,
}
