//! In-memory store backing the rule tests.
//!
//! Mirrors the Postgres semantics the rules rely on: day filters, the
//! therapy activity range check, and the recipient composite-key conflict
//! behavior.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::db::models::{Alert, AlertRecipient, MedicationIntake, MedicationSchedule, Therapy, alert_labels};
use crate::store::{AlertStore, MeasurementStore, PatientDirectory, TherapyStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: Vec<i32>,
    doctors: BTreeMap<i32, i32>,
    measurement_counts: BTreeMap<(i32, NaiveDate), i64>,
    therapies: Vec<Therapy>,
    schedules: Vec<MedicationSchedule>,
    intakes: Vec<MedicationIntake>,
    alert_types: BTreeMap<String, i32>,
    pub alerts: Vec<Alert>,
    pub recipients: Vec<AlertRecipient>,
    next_id: i32,
}

impl MemoryStore {
    /// A store with the labels the current checks emit already cataloged.
    pub fn new() -> Self {
        let mut store = MemoryStore::default();
        for label in [
            alert_labels::NO_MEASUREMENTS,
            alert_labels::PARTIAL_MEASUREMENTS,
            alert_labels::REPEATED_PARTIAL_MEASUREMENTS,
            alert_labels::ADHERENCE_MISSING,
        ] {
            let id = store.next_id();
            store.alert_types.insert(label.to_string(), id);
        }
        store
    }

    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_patient(&mut self, patient_id: i32) {
        self.patients.push(patient_id);
    }

    pub fn add_patient_with_doctor(&mut self, patient_id: i32, doctor_id: i32) {
        self.patients.push(patient_id);
        self.doctors.insert(patient_id, doctor_id);
    }

    pub fn set_measurement_count(&mut self, patient_id: i32, day: NaiveDate, count: i64) {
        self.measurement_counts.insert((patient_id, day), count);
    }

    pub fn add_therapy(&mut self, user_id: i32, start_date: NaiveDate, end_date: Option<NaiveDate>) -> i32 {
        let id = self.next_id();
        self.therapies.push(Therapy {
            id,
            user_id,
            name: format!("therapy {}", id),
            start_date,
            end_date,
        });
        id
    }

    pub fn add_schedule(&mut self, therapy_id: i32, daily_intakes: i32, quantity: f64) -> i32 {
        let id = self.next_id();
        self.schedules.push(MedicationSchedule {
            id,
            therapy_id,
            medication_name: format!("medication {}", id),
            daily_intakes,
            quantity,
        });
        id
    }

    pub fn add_intake(&mut self, user_id: i32, schedule_id: i32, intake_at: DateTime<Utc>, quantity: f64) {
        let id = self.next_id();
        self.intakes.push(MedicationIntake {
            id,
            user_id,
            medication_schedule_id: schedule_id,
            intake_at,
            expected_quantity: quantity,
        });
    }

    pub fn alerts_labeled(&self, label: &str) -> Vec<&Alert> {
        match self.alert_types.get(label) {
            Some(type_id) => self.alerts.iter().filter(|a| a.alert_type_id == *type_id).collect(),
            None => Vec::new(),
        }
    }

    pub fn recipient_ids(&self, alert_id: i32) -> Vec<i32> {
        self.recipients
            .iter()
            .filter(|r| r.alert_id == alert_id)
            .map(|r| r.recipient_user_id)
            .collect()
    }
}

impl PatientDirectory for MemoryStore {
    fn list_active_patients(&mut self) -> Result<Vec<i32>, String> {
        Ok(self.patients.clone())
    }

    fn assigned_doctor(&mut self, patient_id: i32) -> Result<Option<i32>, String> {
        Ok(self.doctors.get(&patient_id).copied())
    }
}

impl MeasurementStore for MemoryStore {
    fn count_measurements(&mut self, patient_id: i32, day: NaiveDate) -> Result<i64, String> {
        Ok(self.measurement_counts.get(&(patient_id, day)).copied().unwrap_or(0))
    }
}

impl TherapyStore for MemoryStore {
    fn active_therapies(&mut self, patient_id: i32, day: NaiveDate) -> Result<Vec<Therapy>, String> {
        Ok(self
            .therapies
            .iter()
            .filter(|t| {
                t.user_id == patient_id && t.start_date <= day && t.end_date.map_or(true, |end| end >= day)
            })
            .cloned()
            .collect())
    }

    fn schedules(&mut self, therapy_id: i32) -> Result<Vec<MedicationSchedule>, String> {
        Ok(self
            .schedules
            .iter()
            .filter(|s| s.therapy_id == therapy_id)
            .cloned()
            .collect())
    }

    fn intakes(
        &mut self,
        patient_id: i32,
        schedule_id: i32,
        day: NaiveDate,
    ) -> Result<Vec<MedicationIntake>, String> {
        Ok(self
            .intakes
            .iter()
            .filter(|i| {
                i.user_id == patient_id
                    && i.medication_schedule_id == schedule_id
                    && i.intake_at.date_naive() == day
            })
            .cloned()
            .collect())
    }
}

impl AlertStore for MemoryStore {
    fn resolve_alert_type(&mut self, label: &str) -> Result<Option<i32>, String> {
        Ok(self.alert_types.get(label).copied())
    }

    fn alert_exists(
        &mut self,
        user_id: i32,
        alert_type_id: i32,
        message: &str,
        day: NaiveDate,
    ) -> Result<bool, String> {
        Ok(self.alerts.iter().any(|a| {
            a.user_id == user_id
                && a.alert_type_id == alert_type_id
                && a.message == message
                && a.created_at.date_naive() == day
        }))
    }

    fn insert_alert(
        &mut self,
        user_id: i32,
        alert_type_id: i32,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, String> {
        let id = self.next_id();
        self.alerts.push(Alert {
            id,
            user_id,
            alert_type_id,
            message: message.to_string(),
            created_at,
        });
        Ok(id)
    }

    fn insert_recipient(&mut self, alert_id: i32, recipient_user_id: i32) -> Result<(), String> {
        // Same outcome as ON CONFLICT DO NOTHING on the composite key.
        let exists = self
            .recipients
            .iter()
            .any(|r| r.alert_id == alert_id && r.recipient_user_id == recipient_user_id);
        if !exists {
            self.recipients.push(AlertRecipient {
                alert_id,
                recipient_user_id,
                is_read: false,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn alert_exists_buckets_by_creation_day() {
        let mut store = MemoryStore::new();
        let type_id = store.resolve_alert_type(alert_labels::NO_MEASUREMENTS).unwrap().unwrap();

        let yesterday = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 0).unwrap();
        store.insert_alert(1, type_id, "msg", yesterday).unwrap();

        assert!(store.alert_exists(1, type_id, "msg", yesterday.date_naive()).unwrap());
        let next_day = yesterday.date_naive() + Duration::days(1);
        assert!(!store.alert_exists(1, type_id, "msg", next_day).unwrap());
    }

    #[test]
    fn therapy_activity_range_is_inclusive() {
        let mut store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        store.add_therapy(1, start, Some(end));
        store.add_therapy(1, start, None);

        assert_eq!(store.active_therapies(1, start).unwrap().len(), 2);
        assert_eq!(store.active_therapies(1, end).unwrap().len(), 2);
        assert_eq!(store.active_therapies(1, end + Duration::days(1)).unwrap().len(), 1);
        assert_eq!(store.active_therapies(1, start - Duration::days(1)).unwrap().len(), 0);
    }
}
