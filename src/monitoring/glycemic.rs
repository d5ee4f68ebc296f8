//! Automatic checks on patients' glycemic measurements.
//!
//! Two passes over the active patient set for a target day:
//! - daily count check: no measurements raises `NO_MEASUREMENTS`, fewer
//!   than six raises `PARTIAL_MEASUREMENTS`;
//! - repeated-shortfall check: fewer than six on each of the last three
//!   days raises `REPEATED_PARTIAL_MEASUREMENTS`.
//!
//! The passes are independent; both may fire for the same patient on the
//! same day. Alerts go to the patient and the assigned doctor.

use chrono::{Duration, NaiveDate};
use log::info;

use crate::db::models::alert_labels;
use crate::monitoring::alerts::{self, AlertOutcome};
use crate::store::{AlertStore, MeasurementStore, PatientDirectory};
use crate::utils::{format_day, format_day_short};

/// Measurements per day below which a day counts as partial.
pub const REQUIRED_DAILY_MEASUREMENTS: i64 = 6;
/// Length of the repeated-shortfall window, target day included.
const SHORTFALL_WINDOW_DAYS: usize = 3;

pub fn run_all<S>(store: &mut S, day: NaiveDate) -> Result<usize, String>
where
    S: PatientDirectory + MeasurementStore + AlertStore,
{
    let mut created = check_daily_measurements(store, day)?;
    created += check_repeated_partial_measurements(store, day)?;
    Ok(created)
}

pub fn check_daily_measurements<S>(store: &mut S, day: NaiveDate) -> Result<usize, String>
where
    S: PatientDirectory + MeasurementStore + AlertStore,
{
    let patients = store.list_active_patients()?;
    info!("Glycemic daily check: {} patient(s), day {}", patients.len(), day);

    let mut created = 0;
    for patient_id in patients {
        let count = store.count_measurements(patient_id, day)?;
        if count >= REQUIRED_DAILY_MEASUREMENTS {
            continue;
        }

        let (label, message) = if count == 0 {
            (
                alert_labels::NO_MEASUREMENTS,
                format!("No glycemic measurements registered for {}", format_day(day)),
            )
        } else {
            (
                alert_labels::PARTIAL_MEASUREMENTS,
                format!("Only {} glycemic measurements registered for {}", count, format_day(day)),
            )
        };

        let recipients = [patient_id, store.assigned_doctor(patient_id)?.unwrap_or(0)];
        if alerts::create_alert(store, label, patient_id, &message, &recipients)? == AlertOutcome::Created {
            created += 1;
        }
    }
    Ok(created)
}

pub fn check_repeated_partial_measurements<S>(store: &mut S, day: NaiveDate) -> Result<usize, String>
where
    S: PatientDirectory + MeasurementStore + AlertStore,
{
    let patients = store.list_active_patients()?;
    info!(
        "Glycemic repeated-shortfall check: {} patient(s), days {}..{}",
        patients.len(),
        day - Duration::days(SHORTFALL_WINDOW_DAYS as i64 - 1),
        day
    );

    let mut created = 0;
    for patient_id in patients {
        let mut daily_counts = Vec::with_capacity(SHORTFALL_WINDOW_DAYS);
        for i in 0..SHORTFALL_WINDOW_DAYS {
            let d = day - Duration::days(i as i64);
            daily_counts.push((d, store.count_measurements(patient_id, d)?));
        }
        if daily_counts.iter().any(|(_, count)| *count >= REQUIRED_DAILY_MEASUREMENTS) {
            continue;
        }

        let breakdown = daily_counts
            .iter()
            .map(|(d, count)| format!("{}: {}", format_day_short(*d), count))
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!(
            "Less than {} glycemic measurements for {} consecutive days: {}",
            REQUIRED_DAILY_MEASUREMENTS, SHORTFALL_WINDOW_DAYS, breakdown
        );

        let recipients = [patient_id, store.assigned_doctor(patient_id)?.unwrap_or(0)];
        let outcome = alerts::create_alert(
            store,
            alert_labels::REPEATED_PARTIAL_MEASUREMENTS,
            patient_id,
            &message,
            &recipients,
        )?;
        if outcome == AlertOutcome::Created {
            created += 1;
        }
    }
    Ok(created)
}
