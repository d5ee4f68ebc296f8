//! End-of-run console report of the alerts created today.
//!
//! A read-only projection over alerts, recipients and users; nothing here
//! feeds back into the checks.

use chrono::NaiveDate;
use diesel::PgConnection;
use diesel::prelude::*;
use std::collections::BTreeMap;

use crate::db::models as dbm;
use crate::schema;
use crate::utils::day_bounds_utc;

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub label: String,
    pub recipients: Vec<String>,
}

pub fn print_daily_summary(conn: &mut PgConnection, day: NaiveDate) -> Result<(), String> {
    let rows = load_rows(conn, day)?;
    print!("{}", render_summary(day, &rows));
    Ok(())
}

fn load_rows(conn: &mut PgConnection, day: NaiveDate) -> Result<Vec<ReportRow>, String> {
    use schema::alert_recipients::dsl as AR;
    use schema::alert_types::dsl as AT;
    use schema::alerts::dsl as A;
    use schema::users::dsl as U;

    let (start, end) = day_bounds_utc(day);
    let alerts: Vec<dbm::Alert> = A::alerts
        .filter(A::created_at.ge(start).and(A::created_at.lt(end)))
        .select(dbm::Alert::as_select())
        .order(A::id.asc())
        .load(conn)
        .map_err(|e| format!("load alerts for report failed: {}", e))?;

    let labels: BTreeMap<i32, String> = AT::alert_types
        .select(dbm::AlertType::as_select())
        .load::<dbm::AlertType>(conn)
        .map_err(|e| format!("load alert types failed: {}", e))?
        .into_iter()
        .map(|t| (t.id, t.label))
        .collect();

    let names: BTreeMap<i32, String> = U::users
        .select(dbm::User::as_select())
        .load::<dbm::User>(conn)
        .map_err(|e| format!("load users failed: {}", e))?
        .into_iter()
        .map(|u| (u.id, format!("{} {}", u.first_name, u.last_name)))
        .collect();

    let alert_ids: Vec<i32> = alerts.iter().map(|a| a.id).collect();
    let recipient_rows: Vec<dbm::AlertRecipient> = AR::alert_recipients
        .filter(AR::alert_id.eq_any(&alert_ids))
        .select(dbm::AlertRecipient::as_select())
        .order((AR::alert_id.asc(), AR::recipient_user_id.asc()))
        .load(conn)
        .map_err(|e| format!("load alert recipients failed: {}", e))?;

    let mut recipients_by_alert: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for r in recipient_rows {
        recipients_by_alert.entry(r.alert_id).or_default().push(r.recipient_user_id);
    }

    Ok(alerts
        .into_iter()
        .map(|a| ReportRow {
            label: labels
                .get(&a.alert_type_id)
                .cloned()
                .unwrap_or_else(|| format!("type {}", a.alert_type_id)),
            recipients: recipients_by_alert
                .remove(&a.id)
                .unwrap_or_default()
                .into_iter()
                .map(|id| names.get(&id).cloned().unwrap_or_else(|| format!("user {}", id)))
                .collect(),
        })
        .collect())
}

/// Render the summary: total, then one line per alert type (most frequent
/// first) with the distinct recipient names of that type's alerts.
pub fn render_summary(day: NaiveDate, rows: &[ReportRow]) -> String {
    let mut out = String::new();
    out.push_str("\n================= ALERTS REPORT =================\n");
    out.push_str(&format!("Date: {}\n", day.format("%Y-%m-%d")));
    out.push_str(&format!("Total alerts created today: {}\n", rows.len()));

    if rows.is_empty() {
        out.push_str("No alerts created today.\n");
    } else {
        let mut groups: BTreeMap<&str, (usize, Vec<&str>)> = BTreeMap::new();
        for row in rows {
            let entry = groups.entry(row.label.as_str()).or_default();
            entry.0 += 1;
            for name in &row.recipients {
                if !entry.1.contains(&name.as_str()) {
                    entry.1.push(name.as_str());
                }
            }
        }
        let mut ordered: Vec<_> = groups.into_iter().collect();
        ordered.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.0.cmp(b.0)));

        out.push_str("\n| Alert type                    | Count | Recipients\n");
        out.push_str("|-------------------------------|-------|------------------------------\n");
        for (label, (count, names)) in ordered {
            out.push_str(&format!("| {:<29} | {:>5} | {}\n", label, count, names.join(", ")));
        }
    }
    out.push_str("=================================================\n");
    out
}
