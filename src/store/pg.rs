//! Diesel-backed store used by production runs.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::PgConnection;
use diesel::prelude::*;

use crate::db::models as dbm;
use crate::db::models::role_labels;
use crate::schema;
use crate::store::{AlertStore, MeasurementStore, PatientDirectory, TherapyStore};
use crate::utils::day_bounds_utc;

pub struct PgStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgStore<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        PgStore { conn }
    }
}

impl PatientDirectory for PgStore<'_> {
    fn list_active_patients(&mut self) -> Result<Vec<i32>, String> {
        use schema::roles::dsl as R;
        use schema::users::dsl as U;

        U::users
            .inner_join(R::roles)
            .filter(R::label.eq(role_labels::PATIENT))
            .select(U::id)
            .order(U::id.asc())
            .load(self.conn)
            .map_err(|e| format!("list active patients failed: {}", e))
    }

    fn assigned_doctor(&mut self, patient_id: i32) -> Result<Option<i32>, String> {
        use schema::patient_doctors::dsl as PD;

        PD::patient_doctors
            .filter(PD::patient_id.eq(patient_id))
            .select(PD::doctor_id)
            .first(self.conn)
            .optional()
            .map_err(|e| format!("fetch assigned doctor failed: {}", e))
    }
}

impl MeasurementStore for PgStore<'_> {
    fn count_measurements(&mut self, patient_id: i32, day: NaiveDate) -> Result<i64, String> {
        use schema::glycemic_measurements::dsl as M;

        let (start, end) = day_bounds_utc(day);
        M::glycemic_measurements
            .filter(M::user_id.eq(patient_id))
            .filter(M::measured_at.ge(start).and(M::measured_at.lt(end)))
            .count()
            .get_result(self.conn)
            .map_err(|e| format!("count measurements failed: {}", e))
    }
}

impl TherapyStore for PgStore<'_> {
    fn active_therapies(&mut self, patient_id: i32, day: NaiveDate) -> Result<Vec<dbm::Therapy>, String> {
        use schema::therapies::dsl as T;

        T::therapies
            .filter(T::user_id.eq(patient_id))
            .filter(T::start_date.le(day))
            .filter(T::end_date.is_null().or(T::end_date.ge(day)))
            .select(dbm::Therapy::as_select())
            .order(T::id.asc())
            .load(self.conn)
            .map_err(|e| format!("list active therapies failed: {}", e))
    }

    fn schedules(&mut self, therapy_id: i32) -> Result<Vec<dbm::MedicationSchedule>, String> {
        use schema::medication_schedules::dsl as MS;

        MS::medication_schedules
            .filter(MS::therapy_id.eq(therapy_id))
            .select(dbm::MedicationSchedule::as_select())
            .order(MS::id.asc())
            .load(self.conn)
            .map_err(|e| format!("list medication schedules failed: {}", e))
    }

    fn intakes(
        &mut self,
        patient_id: i32,
        schedule_id: i32,
        day: NaiveDate,
    ) -> Result<Vec<dbm::MedicationIntake>, String> {
        use schema::medication_intakes::dsl as MI;

        let (start, end) = day_bounds_utc(day);
        MI::medication_intakes
            .filter(MI::user_id.eq(patient_id))
            .filter(MI::medication_schedule_id.eq(schedule_id))
            .filter(MI::intake_at.ge(start).and(MI::intake_at.lt(end)))
            .select(dbm::MedicationIntake::as_select())
            .order(MI::intake_at.asc())
            .load(self.conn)
            .map_err(|e| format!("list medication intakes failed: {}", e))
    }
}

impl AlertStore for PgStore<'_> {
    fn resolve_alert_type(&mut self, label: &str) -> Result<Option<i32>, String> {
        use schema::alert_types::dsl as AT;

        AT::alert_types
            .filter(AT::label.eq(label))
            .select(AT::id)
            .first(self.conn)
            .optional()
            .map_err(|e| format!("resolve alert type failed: {}", e))
    }

    fn alert_exists(
        &mut self,
        user_id: i32,
        alert_type_id: i32,
        message: &str,
        day: NaiveDate,
    ) -> Result<bool, String> {
        use schema::alerts::dsl as A;

        let (start, end) = day_bounds_utc(day);
        diesel::select(diesel::dsl::exists(
            A::alerts
                .filter(A::user_id.eq(user_id))
                .filter(A::alert_type_id.eq(alert_type_id))
                .filter(A::message.eq(message))
                .filter(A::created_at.ge(start).and(A::created_at.lt(end))),
        ))
        .get_result(self.conn)
        .map_err(|e| format!("alert existence check failed: {}", e))
    }

    fn insert_alert(
        &mut self,
        user_id: i32,
        alert_type_id: i32,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<i32, String> {
        use schema::alerts::dsl as A;

        let new_row = dbm::NewAlert {
            user_id,
            alert_type_id,
            message: message.to_string(),
            created_at,
        };
        diesel::insert_into(A::alerts)
            .values(&new_row)
            .returning(A::id)
            .get_result(self.conn)
            .map_err(|e| format!("insert alert failed: {}", e))
    }

    fn insert_recipient(&mut self, alert_id: i32, recipient_user_id: i32) -> Result<(), String> {
        use schema::alert_recipients::dsl as AR;

        let new_row = dbm::NewAlertRecipient {
            alert_id,
            recipient_user_id,
            is_read: false,
        };
        diesel::insert_into(AR::alert_recipients)
            .values(&new_row)
            .on_conflict((AR::alert_id, AR::recipient_user_id))
            .do_nothing()
            .execute(self.conn)
            .map(|_| ())
            .map_err(|e| format!("insert alert recipient failed: {}", e))
    }
}
