//! Per-relation column semantics.
//!
//! Each source relation names its time, value and unit columns differently.
//! `semantics_for` is the single total mapping; nothing else in the crate
//! chooses column names per relation.

use crate::catalog::SourceRelation;

/// How the primary value slot is filled for a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// Value column rendered as text.
    Raw,
    /// Numeric column wins when non-null; the text column is kept aside.
    NumericPreferred,
    /// "<dose> <unit>", or a sentinel when the dose is missing.
    Dose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSemantics {
    pub relation: SourceRelation,
    pub time_column: &'static str,
    pub end_column: Option<&'static str>,
    pub value_column: &'static str,
    pub numeric_column: Option<&'static str>,
    pub unit_column: Option<&'static str>,
    pub value_rule: ValueRule,
}

pub fn semantics_for(relation: SourceRelation) -> ColumnSemantics {
    use SourceRelation::*;

    let point = |value_column: &'static str, unit_column: Option<&'static str>| ColumnSemantics {
        relation,
        time_column: "charttime",
        end_column: None,
        value_column,
        numeric_column: None,
        unit_column,
        value_rule: ValueRule::Raw,
    };
    let interval = |value_column: &'static str, unit_column: Option<&'static str>| ColumnSemantics {
        relation,
        time_column: "starttime",
        end_column: Some("endtime"),
        value_column,
        numeric_column: None,
        unit_column,
        value_rule: ValueRule::Raw,
    };

    match relation {
        Chart | Output | DateTime => point("value", Some("valueuom")),
        Lab => ColumnSemantics {
            numeric_column: Some("valuenum"),
            value_rule: ValueRule::NumericPreferred,
            ..point("value", Some("valueuom"))
        },
        Ingredient | Input => interval("amount", Some("amountuom")),
        Procedure => interval("value", Some("valueuom")),
        Prescription => ColumnSemantics {
            end_column: Some("stoptime"),
            value_rule: ValueRule::Dose,
            ..interval("dose_val_rx", Some("dose_unit_rx"))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_relation_has_semantics() {
        for relation in SourceRelation::ALL {
            let cols = semantics_for(relation);
            assert_eq!(cols.relation, relation);
            assert!(!cols.time_column.is_empty());
        }
    }

    #[test]
    fn interval_relations_have_end_columns() {
        for relation in SourceRelation::ALL {
            let cols = semantics_for(relation);
            assert_eq!(cols.end_column.is_some(), relation.is_interval(), "{relation}");
            let expected_time = if relation.is_interval() { "starttime" } else { "charttime" };
            assert_eq!(cols.time_column, expected_time, "{relation}");
        }
    }

    #[test]
    fn only_labs_prefer_numeric_values() {
        for relation in SourceRelation::ALL {
            let cols = semantics_for(relation);
            let numeric = cols.value_rule == ValueRule::NumericPreferred;
            assert_eq!(numeric, relation == SourceRelation::Lab);
            assert_eq!(cols.numeric_column.is_some(), numeric);
        }
    }

    #[test]
    fn prescriptions_use_stoptime_and_dose() {
        let cols = semantics_for(SourceRelation::Prescription);
        assert_eq!(cols.end_column, Some("stoptime"));
        assert_eq!(cols.value_column, "dose_val_rx");
        assert_eq!(cols.value_rule, ValueRule::Dose);
    }
}
