//! ECG waveform records on disk.
//!
//! Records are addressed by a locator of the form `ecg/p<subject>/s<study>`
//! and stored as a WFDB pair (`.dat` + `.hea`) under
//! `<base>/files/p<first four subject digits>/p<subject>/s<study>/<study>`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

const LOCATOR_ROOT: &str = "ecg";
const SUBJECT_PREFIX_DIGITS: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("Locator must follow the format ecg/pXXXXXXXX/sZZZZZZZZ")]
    Format,

    #[error("Locator segments must start with 'p' and 's' respectively")]
    SegmentPrefix,

    #[error("Subject identifier must be numeric and at least four digits")]
    SubjectId,

    #[error("Study identifier must be numeric")]
    StudyId,
}

/// A validated record locator. Identifiers are kept as the digit strings
/// found in the locator so leading zeros survive into the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLocator {
    pub subject_id: String,
    pub study_id: String,
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_record_locator(locator: &str) -> Result<RecordLocator, LocatorError> {
    let parts: Vec<&str> = locator.trim().trim_matches('/').split('/').collect();
    let [root, subject, study] = parts.as_slice() else {
        return Err(LocatorError::Format);
    };
    if !root.eq_ignore_ascii_case(LOCATOR_ROOT) {
        return Err(LocatorError::Format);
    }

    let (Some(subject_id), Some(study_id)) = (subject.strip_prefix('p'), study.strip_prefix('s'))
    else {
        return Err(LocatorError::SegmentPrefix);
    };

    if subject_id.len() < SUBJECT_PREFIX_DIGITS || !is_digits(subject_id) {
        return Err(LocatorError::SubjectId);
    }
    if !is_digits(study_id) {
        return Err(LocatorError::StudyId);
    }

    Ok(RecordLocator {
        subject_id: subject_id.to_string(),
        study_id: study_id.to_string(),
    })
}

impl RecordLocator {
    /// Record path without extension.
    pub fn record_path(&self, base: &Path) -> PathBuf {
        let prefix = self
            .subject_id
            .get(..SUBJECT_PREFIX_DIGITS)
            .unwrap_or(self.subject_id.as_str());
        base.join("files")
            .join(format!("p{prefix}"))
            .join(format!("p{}", self.subject_id))
            .join(format!("s{}", self.study_id))
            .join(&self.study_id)
    }

    pub fn data_file(&self, base: &Path) -> PathBuf {
        self.record_path(base).with_extension("dat")
    }

    pub fn header_file(&self, base: &Path) -> PathBuf {
        self.record_path(base).with_extension("hea")
    }

    /// Both halves of the WFDB pair must exist.
    pub fn is_available(&self, base: &Path) -> bool {
        self.data_file(base).is_file() && self.header_file(base).is_file()
    }

    /// Numeric ids for document lookups; `None` if they overflow.
    pub fn numeric_ids(&self) -> Option<(i64, i64)> {
        Some((self.subject_id.parse().ok()?, self.study_id.parse().ok()?))
    }
}
