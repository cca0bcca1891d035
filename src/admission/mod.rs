//! Patient and admission context shown alongside the catalog: demographics,
//! services, ICU stays and coded diagnoses/procedures.

mod fetch;
mod types;

pub use fetch::*;
pub use types::*;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::DatabaseError;

const DAYS_PER_YEAR: f64 = 365.25;
const SECONDS_PER_DAY: i64 = 86_400;

/// Age at admission, shifted from the anchor age by whole days elapsed since
/// January 1st of the anchor year. Rounded to one decimal.
pub fn age_at_admission(patient: &PatientInfo, admission: &AdmissionInfo) -> f64 {
    let anchor_age = patient.anchor_age as f64;
    let Some(anchor) = NaiveDate::from_ymd_opt(patient.anchor_year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return anchor_age;
    };

    let elapsed = admission.admittime - anchor;
    let days = elapsed.num_seconds().div_euclid(SECONDS_PER_DAY) as f64;
    let age = anchor_age + days / DAYS_PER_YEAR;
    (age * 10.0).round() / 10.0
}

/// True when the date of death (taken at midnight) falls within the
/// admission, bounds included.
pub fn died_during_admission(patient: &PatientInfo, admission: &AdmissionInfo) -> bool {
    patient
        .dod
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .is_some_and(|death| admission.admittime <= death && death <= admission.dischtime)
}

pub fn get_admission_overview(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<AdmissionOverview, DatabaseError> {
    let patient = get_patient(conn, subject_id)?;
    let admission = get_admission(conn, subject_id, hadm_id)?;

    Ok(AdmissionOverview {
        age_at_admission: age_at_admission(&patient, &admission),
        died_during_admission: died_during_admission(&patient, &admission),
        services: get_admission_services(conn, subject_id, hadm_id)?,
        icu_stays: get_icu_stays(conn, subject_id, hadm_id)?,
        diagnoses: get_icd_diagnoses(conn, subject_id, hadm_id)?,
        procedures: get_icd_procedures(conn, subject_id, hadm_id)?,
        patient,
        admission,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────
