use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::catalog::SourceRelation;

/// One normalized observation, point or interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSample {
    pub time_anchor: NaiveDateTime,
    /// Only set for interval relations.
    pub end_time: Option<NaiveDateTime>,
    pub value: Option<String>,
    /// Original textual value when `value` was taken from a numeric column.
    pub value_text: Option<String>,
    pub unit: Option<String>,
}

/// Which item to fetch, for whom, and over which inclusive window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    pub subject_id: i64,
    pub hadm_id: i64,
    pub item_id: i64,
    pub source_relation: SourceRelation,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// A chartable series: the request echoed back with its samples in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSeries {
    #[serde(flatten)]
    pub request: EventRequest,
    pub samples: Vec<EventSample>,
}
