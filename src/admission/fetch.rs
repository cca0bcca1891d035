use rusqlite::{params, Connection};

use crate::db::{store_access, DatabaseError};
use super::types::*;

/// Hospital admission ids for a patient, earliest first.
pub fn list_admissions(conn: &Connection, subject_id: i64) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn
        .prepare("SELECT hadm_id FROM admissions WHERE subject_id = ?1 ORDER BY admittime ASC")
        .map_err(store_access("admissions"))?;
    let rows = stmt
        .query_map(params![subject_id], |row| row.get::<_, i64>(0))
        .map_err(store_access("admissions"))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(store_access("admissions"))
}

pub fn get_patient(conn: &Connection, subject_id: i64) -> Result<PatientInfo, DatabaseError> {
    let result = conn.query_row(
        "SELECT subject_id, gender, anchor_age, anchor_year, dod
         FROM patients WHERE subject_id = ?1",
        params![subject_id],
        |row| {
            Ok(PatientInfo {
                subject_id: row.get(0)?,
                gender: row.get(1)?,
                anchor_age: row.get(2)?,
                anchor_year: row.get(3)?,
                dod: row.get(4)?,
            })
        },
    );

    match result {
        Ok(patient) => Ok(patient),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: subject_id.to_string(),
        }),
        Err(e) => Err(store_access("patients")(e)),
    }
}

pub fn get_admission(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<AdmissionInfo, DatabaseError> {
    let result = conn.query_row(
        "SELECT subject_id, hadm_id, admittime, dischtime, insurance, language,
                marital_status, race
         FROM admissions WHERE subject_id = ?1 AND hadm_id = ?2",
        params![subject_id, hadm_id],
        |row| {
            Ok(AdmissionInfo {
                subject_id: row.get(0)?,
                hadm_id: row.get(1)?,
                admittime: row.get(2)?,
                dischtime: row.get(3)?,
                insurance: row.get(4)?,
                language: row.get(5)?,
                marital_status: row.get(6)?,
                race: row.get(7)?,
            })
        },
    );

    match result {
        Ok(admission) => Ok(admission),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(DatabaseError::NotFound {
            entity_type: "Admission".into(),
            id: format!("{subject_id}/{hadm_id}"),
        }),
        Err(e) => Err(store_access("admissions")(e)),
    }
}

/// Distinct services the admission passed through, in first-seen order.
pub fn get_admission_services(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn
        .prepare(
            "SELECT curr_service FROM services
             WHERE subject_id = ?1 AND hadm_id = ?2 AND curr_service IS NOT NULL
             GROUP BY curr_service
             ORDER BY MIN(COALESCE(transfertime, ''))",
        )
        .map_err(store_access("services"))?;
    let rows = stmt
        .query_map(params![subject_id, hadm_id], |row| row.get::<_, String>(0))
        .map_err(store_access("services"))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(store_access("services"))
}

pub fn get_icu_stays(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<IcuStay>, DatabaseError> {
    let mut stmt = conn
        .prepare(
            "SELECT stay_id, first_careunit, last_careunit, intime, outtime
             FROM icustays
             WHERE subject_id = ?1 AND hadm_id = ?2
             ORDER BY intime ASC",
        )
        .map_err(store_access("icustays"))?;
    let rows = stmt
        .query_map(params![subject_id, hadm_id], |row| {
            Ok(IcuStay {
                stay_id: row.get(0)?,
                first_careunit: row.get(1)?,
                last_careunit: row.get(2)?,
                intime: row.get(3)?,
                outtime: row.get(4)?,
            })
        })
        .map_err(store_access("icustays"))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(store_access("icustays"))
}

pub fn get_icd_diagnoses(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<IcdEntry>, DatabaseError> {
    fetch_icd(conn, "diagnoses_icd", "d_icd_diagnoses", subject_id, hadm_id)
}

pub fn get_icd_procedures(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<IcdEntry>, DatabaseError> {
    fetch_icd(conn, "procedures_icd", "d_icd_procedures", subject_id, hadm_id)
}

fn fetch_icd(
    conn: &Connection,
    coded: &str,
    dictionary: &str,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<IcdEntry>, DatabaseError> {
    let sql = format!(
        "SELECT c.seq_num, c.icd_code, c.icd_version, d.long_title
         FROM {coded} c
         JOIN {dictionary} d ON d.icd_code = c.icd_code AND d.icd_version = c.icd_version
         WHERE c.subject_id = ?1 AND c.hadm_id = ?2
         ORDER BY c.seq_num ASC"
    );
    let mut stmt = conn.prepare(&sql).map_err(store_access(coded))?;
    let rows = stmt
        .query_map(params![subject_id, hadm_id], |row| {
            Ok(IcdEntry {
                seq_num: row.get(0)?,
                icd_code: row.get(1)?,
                icd_version: row.get(2)?,
                long_title: row.get(3)?,
            })
        })
        .map_err(store_access(coded))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(store_access(coded))
}
