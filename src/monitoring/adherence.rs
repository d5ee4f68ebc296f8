//! Automatic checks on patients' medication therapy adherence.
//!
//! A patient is flagged for a day when any schedule of a therapy active
//! that day has no registered intakes, or a registered total strictly
//! below the prescribed daily quantity. One `ADHERENCE_MISSING` alert per
//! flagged patient per day, addressed to the patient only; the assigned
//! doctor is reserved for the 3-consecutive-day escalation tier.

use chrono::NaiveDate;
use log::info;

use crate::db::models::{MedicationSchedule, alert_labels};
use crate::monitoring::alerts::{self, AlertOutcome};
use crate::store::{AlertStore, PatientDirectory, TherapyStore};
use crate::utils::format_day;

pub fn run_all<S>(store: &mut S, day: NaiveDate) -> Result<usize, String>
where
    S: PatientDirectory + TherapyStore + AlertStore,
{
    let patients = store.list_active_patients()?;
    info!("Adherence check: {} patient(s), day {}", patients.len(), day);

    let mut created = 0;
    for patient_id in patients {
        if !has_missing_adherence(store, patient_id, day)? {
            continue;
        }

        let message = format!(
            "Not all scheduled medication intakes were registered for {}",
            format_day(day)
        );
        let outcome =
            alerts::create_alert(store, alert_labels::ADHERENCE_MISSING, patient_id, &message, &[patient_id])?;
        if outcome == AlertOutcome::Created {
            created += 1;
        }
    }
    Ok(created)
}

fn has_missing_adherence<S>(store: &mut S, patient_id: i32, day: NaiveDate) -> Result<bool, String>
where
    S: TherapyStore,
{
    for therapy in store.active_therapies(patient_id, day)? {
        for schedule in store.schedules(therapy.id)? {
            let intakes = store.intakes(patient_id, schedule.id, day)?;
            if intakes.is_empty() {
                return Ok(true);
            }
            let total: f64 = intakes.iter().map(|i| i.expected_quantity).sum();
            if total < expected_daily_quantity(&schedule) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Prescribed total for one day. Schedules without a positive intake count
/// are read as one intake per day.
fn expected_daily_quantity(schedule: &MedicationSchedule) -> f64 {
    let expected_intakes = if schedule.daily_intakes > 0 { schedule.daily_intakes } else { 1 };
    schedule.quantity * f64::from(expected_intakes)
}
