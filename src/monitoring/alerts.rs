//! Alert creation with at-most-once-per-day deduplication.
//!
//! An alert is identified by (subject user, alert type, message text,
//! creation day); re-evaluating the same condition within one day is a
//! no-op. Two wordings of the same condition (e.g. different counts) are
//! distinct alerts on purpose.

use chrono::Utc;
use log::{debug, warn};

use crate::store::AlertStore;

/// What a `create_alert` call did, for run accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    Created,
    /// An identical alert already exists for the current day.
    Duplicate,
    /// The label is not present in the alert type catalog.
    UnknownLabel,
}

/// Create an alert and its recipient rows unless an identical alert was
/// already created today.
///
/// Unknown labels are skipped rather than treated as errors, so a missing
/// catalog seed cannot abort a whole run. `recipient_ids` may contain
/// duplicates and the sentinel `0` ("no doctor assigned"); neither is ever
/// persisted. The alert insert and the recipient inserts are separate
/// statements, so a failure in between leaves an alert without recipients.
pub fn create_alert<S: AlertStore>(
    store: &mut S,
    label: &str,
    subject_user_id: i32,
    message: &str,
    recipient_ids: &[i32],
) -> Result<AlertOutcome, String> {
    let Some(alert_type_id) = store.resolve_alert_type(label)? else {
        warn!(
            "Alert label {} missing from catalog; skipping alert for user {}",
            label, subject_user_id
        );
        return Ok(AlertOutcome::UnknownLabel);
    };

    // Dedup against the wall-clock creation day, not the evaluated day.
    let now = Utc::now();
    if store.alert_exists(subject_user_id, alert_type_id, message, now.date_naive())? {
        debug!("Duplicate {} alert for user {} suppressed", label, subject_user_id);
        return Ok(AlertOutcome::Duplicate);
    }

    let alert_id = store.insert_alert(subject_user_id, alert_type_id, message, now)?;
    let mut seen = Vec::with_capacity(recipient_ids.len());
    for &recipient_id in recipient_ids {
        if recipient_id == 0 || seen.contains(&recipient_id) {
            continue;
        }
        seen.push(recipient_id);
        store.insert_recipient(alert_id, recipient_id)?;
    }
    Ok(AlertOutcome::Created)
}
