use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub subject_id: i64,
    pub gender: Option<String>,
    /// Age in `anchor_year`; the de-identified reference point for all ages.
    pub anchor_age: i64,
    pub anchor_year: i32,
    pub dod: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionInfo {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub admittime: NaiveDateTime,
    pub dischtime: NaiveDateTime,
    pub insurance: Option<String>,
    pub language: Option<String>,
    pub marital_status: Option<String>,
    pub race: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcuStay {
    pub stay_id: i64,
    pub first_careunit: Option<String>,
    pub last_careunit: Option<String>,
    pub intime: NaiveDateTime,
    pub outtime: NaiveDateTime,
}

impl IcuStay {
    pub fn duration_hours(&self) -> f64 {
        (self.outtime - self.intime).num_seconds() as f64 / 3600.0
    }
}

/// A coded diagnosis or procedure with its dictionary title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcdEntry {
    pub seq_num: Option<i64>,
    pub icd_code: String,
    pub icd_version: i64,
    pub long_title: Option<String>,
}

/// Everything the admission header shows, in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionOverview {
    pub patient: PatientInfo,
    pub admission: AdmissionInfo,
    pub age_at_admission: f64,
    pub died_during_admission: bool,
    pub services: Vec<String>,
    pub icu_stays: Vec<IcuStay>,
    pub diagnoses: Vec<IcdEntry>,
    pub procedures: Vec<IcdEntry>,
}
