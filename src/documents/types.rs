use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING: &str = "N/A";

/// Named groups of documents in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCollection {
    Discharge,
    MachineMeasurement,
}

impl DocumentCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discharge => "discharge",
            Self::MachineMeasurement => "machine_measurement",
        }
    }
}

/// Lookup keys. `None` fields are not constrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub subject_id: i64,
    pub hadm_id: Option<i64>,
    pub study_id: Option<i64>,
}

impl DocumentFilter {
    pub fn admission(subject_id: i64, hadm_id: i64) -> Self {
        Self {
            subject_id,
            hadm_id: Some(hadm_id),
            study_id: None,
        }
    }

    pub fn study(subject_id: i64, study_id: i64) -> Self {
        Self {
            subject_id,
            hadm_id: None,
            study_id: Some(study_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DischargeNote {
    #[serde(default)]
    pub note_id: Option<String>,
    pub subject_id: i64,
    pub hadm_id: i64,
    #[serde(default)]
    pub note_type: Option<String>,
    #[serde(default)]
    pub note_seq: Option<i64>,
    #[serde(default)]
    pub charttime: Option<NaiveDateTime>,
    #[serde(default)]
    pub storetime: Option<NaiveDateTime>,
    #[serde(default)]
    pub text: Option<String>,
}

impl DischargeNote {
    /// One-line summary, e.g. `Type: DS | Sequence: 21 | Chart Time: 2180-07-30 00:00:00`.
    pub fn heading(&self) -> String {
        format!(
            "Type: {} | Sequence: {} | Chart Time: {}",
            self.note_type.as_deref().unwrap_or(MISSING),
            self.note_seq
                .map(|s| s.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            self.charttime
                .map(|t| t.format(DISPLAY_TIME_FORMAT).to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        )
    }

    pub fn body(&self) -> &str {
        self.text.as_deref().unwrap_or("Note text not available.")
    }
}

/// Machine-read ECG measurements and report lines for one study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgMeasurement {
    pub subject_id: i64,
    pub study_id: i64,
    #[serde(default)]
    pub ecg_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub text: Option<String>,
}
