use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// The relations an item (and its events) can originate from.
///
/// Serialized as the underlying table name, which is also what callers pass
/// back when requesting events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceRelation {
    #[serde(rename = "chartevents")]
    Chart,
    #[serde(rename = "outputevents")]
    Output,
    #[serde(rename = "datetimeevents")]
    DateTime,
    #[serde(rename = "ingredientevents")]
    Ingredient,
    #[serde(rename = "inputevents")]
    Input,
    #[serde(rename = "procedureevents")]
    Procedure,
    #[serde(rename = "labevents")]
    Lab,
    #[serde(rename = "prescriptions")]
    Prescription,
}

impl SourceRelation {
    pub const ALL: [SourceRelation; 8] = [
        Self::Chart,
        Self::Output,
        Self::DateTime,
        Self::Ingredient,
        Self::Input,
        Self::Procedure,
        Self::Lab,
        Self::Prescription,
    ];

    /// ICU event tables keyed by a `d_items` itemid.
    pub const EVENT_RELATIONS: [SourceRelation; 6] = [
        Self::Chart,
        Self::Output,
        Self::DateTime,
        Self::Ingredient,
        Self::Input,
        Self::Procedure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chart => "chartevents",
            Self::Output => "outputevents",
            Self::DateTime => "datetimeevents",
            Self::Ingredient => "ingredientevents",
            Self::Input => "inputevents",
            Self::Procedure => "procedureevents",
            Self::Lab => "labevents",
            Self::Prescription => "prescriptions",
        }
    }

    /// Interval relations record a start and a stop instead of a single time.
    pub fn is_interval(&self) -> bool {
        matches!(
            self,
            Self::Ingredient | Self::Input | Self::Procedure | Self::Prescription
        )
    }
}

impl fmt::Display for SourceRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceRelation {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|relation| relation.as_str() == s)
            .ok_or_else(|| {
                DatabaseError::invalid_argument(
                    "source_relation",
                    format!("unknown source relation '{s}'"),
                )
            })
    }
}

/// One entry of the unified item catalog for an admission.
///
/// `(item_id, source_relation)` is the catalog key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub item_id: i64,
    pub source_relation: SourceRelation,
    pub label: Option<String>,
    pub category: Option<String>,
    pub abbreviation: Option<String>,
    pub observation_count: u64,
}

impl ItemDescriptor {
    pub fn key(&self) -> (i64, SourceRelation) {
        (self.item_id, self.source_relation)
    }
}
