//! Repository seam between the monitoring rules and the data store.
//!
//! One trait per external collaborator, all methods synchronous and
//! returning plain data. The production implementation is [`pg::PgStore`];
//! rule tests drive the same seam through an in-memory store.

use chrono::{DateTime, NaiveDate, Utc};

use crate::db::models::{MedicationIntake, MedicationSchedule, Therapy};

#[cfg(test)]
pub mod memory;
pub mod pg;

pub trait PatientDirectory {
    /// Ids of all users carrying the patient role.
    fn list_active_patients(&mut self) -> Result<Vec<i32>, String>;

    /// The doctor assigned to a patient, if any.
    fn assigned_doctor(&mut self, patient_id: i32) -> Result<Option<i32>, String>;
}

pub trait MeasurementStore {
    /// Number of glycemic measurements the patient registered on `day`.
    fn count_measurements(&mut self, patient_id: i32, day: NaiveDate) -> Result<i64, String>;
}

pub trait TherapyStore {
    /// Therapies whose inclusive date range covers `day`.
    fn active_therapies(&mut self, patient_id: i32, day: NaiveDate) -> Result<Vec<Therapy>, String>;

    fn schedules(&mut self, therapy_id: i32) -> Result<Vec<MedicationSchedule>, String>;

    /// Intakes the patient registered for a schedule on `day`.
    fn intakes(&mut self, patient_id: i32, schedule_id: i32, day: NaiveDate)
    -> Result<Vec<MedicationIntake>, String>;
}

pub trait AlertStore {
    /// Catalog id for `label`, or `None` when the label is not seeded.
    fn resolve_alert_type(&mut self, label: &str) -> Result<Option<i32>, String>;

    /// Whether an alert with the same subject, type and message was already
    /// created on `day`.
    fn alert_exists(&mut self, user_id: i32, alert_type_id: i32, message: &str, day: NaiveDate)
    -> Result<bool, String>;

    fn insert_alert(
        &mut self,
        user_id: i32,
        alert_type_id: i32,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, String>;

    fn insert_recipient(&mut self, alert_id: i32, recipient_user_id: i32) -> Result<(), String>;
}
