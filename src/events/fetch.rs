use chrono::NaiveDateTime;
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::Connection;

use crate::catalog::{prescription_pairs, PrescriptionPair, SourceRelation};
use crate::db::{store_access, DatabaseError};
use super::columns::*;
use super::types::*;

/// Shown in place of a prescription dose that was never recorded.
pub const UNKNOWN_DOSE: &str = "Unknown dose";

const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Helper: builds a parameter-bound WHERE clause.
///
/// Column expressions come from the static column table; every caller value
/// goes through a numbered parameter.
pub(super) struct BoundQuery {
    clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl BoundQuery {
    pub(super) fn new() -> Self {
        Self {
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    pub(super) fn eq(mut self, column: &str, value: impl ToSql + 'static) -> Self {
        self.params.push(Box::new(value));
        self.clauses
            .push(format!("{} = ?{}", column, self.params.len()));
        self
    }

    /// NULL-safe equality: a `None` only matches NULL.
    pub(super) fn is(mut self, column: &str, value: Option<String>) -> Self {
        self.params.push(Box::new(value));
        self.clauses
            .push(format!("{} IS ?{}", column, self.params.len()));
        self
    }

    /// Inclusive on both ends. The column goes through SQLite `datetime()`
    /// so stored `T` separators and fractional seconds compare correctly.
    pub(super) fn within(
        mut self,
        column: &str,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Self {
        self.params
            .push(Box::new(start.format(SQL_TIMESTAMP_FORMAT).to_string()));
        self.clauses
            .push(format!("datetime({}) >= ?{}", column, self.params.len()));
        self.params
            .push(Box::new(end.format(SQL_TIMESTAMP_FORMAT).to_string()));
        self.clauses
            .push(format!("datetime({}) <= ?{}", column, self.params.len()));
        self
    }

    pub(super) fn sql_where(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(super) fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

fn format_number(n: f64) -> String {
    format!("{n}")
}

/// Renders whatever storage class the store used as display text.
fn value_as_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(format_number(f)),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Only stored numbers count as a numeric reading; empty or textual cells
/// in a REAL column are treated as missing.
fn numeric_value(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Null | ValueRef::Text(_) | ValueRef::Blob(_) => None,
    }
}

/// Timestamp columns are read through `datetime()`, which yields NULL for
/// empty or unparsable cells.
fn timestamp_expr(column: Option<&str>) -> String {
    match column {
        Some(column) => format!("datetime({column})"),
        None => "NULL".to_string(),
    }
}

pub(super) fn dose_display(dose: Option<String>, unit: Option<&str>) -> String {
    match (dose, unit.map(str::trim).filter(|u| !u.is_empty())) {
        (Some(d), Some(u)) => format!("{d} {u}"),
        (Some(d), None) => d,
        (None, _) => UNKNOWN_DOSE.to_string(),
    }
}

pub(super) fn fetch_relation_events(
    conn: &Connection,
    request: &EventRequest,
    cols: &ColumnSemantics,
) -> Result<Vec<EventSample>, DatabaseError> {
    let relation = cols.relation.as_str();
    let query = BoundQuery::new()
        .eq("subject_id", request.subject_id)
        .eq("hadm_id", request.hadm_id)
        .eq("itemid", request.item_id)
        .within(cols.time_column, &request.start_time, &request.end_time);

    let sql = format!(
        "SELECT {time} AS time_anchor, {end} AS end_time, {value} AS value,
                {numeric} AS value_num, {unit} AS unit
         FROM {table}{filter}",
        time = timestamp_expr(Some(cols.time_column)),
        end = timestamp_expr(cols.end_column),
        value = cols.value_column,
        numeric = cols.numeric_column.unwrap_or("NULL"),
        unit = cols.unit_column.unwrap_or("NULL"),
        table = relation,
        filter = query.sql_where(),
    );

    let mut stmt = conn.prepare(&sql).map_err(store_access(relation))?;
    let rows = stmt
        .query_map(query.param_refs().as_slice(), |row| {
            let raw = value_as_text(row.get_ref("value")?);
            let numeric = numeric_value(row.get_ref("value_num")?);

            let (value, value_text) = match cols.value_rule {
                ValueRule::NumericPreferred => {
                    (numeric.map(format_number).or_else(|| raw.clone()), raw)
                }
                ValueRule::Raw | ValueRule::Dose => (raw, None),
            };

            Ok(EventSample {
                time_anchor: row.get("time_anchor")?,
                end_time: row.get("end_time")?,
                value,
                value_text,
                unit: row.get("unit")?,
            })
        })
        .map_err(store_access(relation))?;

    rows.collect::<Result<Vec<_>, _>>().map_err(store_access(relation))
}

/// Prescriptions are addressed by surrogate id: resolve it back to the
/// (drug, route) pairs currently recorded for the admission that hash to it.
pub(super) fn fetch_prescription_events(
    conn: &Connection,
    request: &EventRequest,
) -> Result<Vec<EventSample>, DatabaseError> {
    let pairs: Vec<PrescriptionPair> = prescription_pairs(conn, request.subject_id, request.hadm_id)?
        .into_iter()
        .filter(|p| p.item_id() == request.item_id)
        .collect();

    if pairs.is_empty() {
        tracing::warn!(
            subject_id = request.subject_id,
            hadm_id = request.hadm_id,
            item_id = request.item_id,
            "Prescription surrogate does not match any drug/route for this admission"
        );
        return Ok(Vec::new());
    }

    fetch_pair_events(conn, request, pairs)
}

/// Rows of every given pair in the window, merged in start-time order.
/// More than one pair only happens on a surrogate collision, which the
/// catalog folds into a single entry.
fn fetch_pair_events(
    conn: &Connection,
    request: &EventRequest,
    pairs: Vec<PrescriptionPair>,
) -> Result<Vec<EventSample>, DatabaseError> {
    let cols = semantics_for(SourceRelation::Prescription);
    let relation = cols.relation.as_str();
    let merged = pairs.len() > 1;

    let mut samples = Vec::new();
    for pair in pairs {
        let query = BoundQuery::new()
            .eq("subject_id", request.subject_id)
            .eq("hadm_id", request.hadm_id)
            .eq("TRIM(drug)", pair.drug)
            .is("TRIM(route)", pair.route)
            .within(cols.time_column, &request.start_time, &request.end_time);

        let sql = format!(
            "SELECT {time} AS time_anchor, {end} AS end_time, {value} AS dose, {unit} AS unit
             FROM {table}{filter}
             ORDER BY time_anchor ASC",
            time = timestamp_expr(Some(cols.time_column)),
            end = timestamp_expr(cols.end_column),
            value = cols.value_column,
            unit = cols.unit_column.unwrap_or("NULL"),
            table = relation,
            filter = query.sql_where(),
        );

        let mut stmt = conn.prepare(&sql).map_err(store_access(relation))?;
        let rows = stmt
            .query_map(query.param_refs().as_slice(), |row| {
                let dose = value_as_text(row.get_ref("dose")?);
                let unit: Option<String> = row.get("unit")?;
                Ok(EventSample {
                    time_anchor: row.get("time_anchor")?,
                    end_time: row.get("end_time")?,
                    value: Some(dose_display(dose, unit.as_deref())),
                    value_text: None,
                    unit,
                })
            })
            .map_err(store_access(relation))?;

        for row in rows {
            samples.push(row.map_err(store_access(relation))?);
        }
    }

    if merged {
        super::sort_samples(&mut samples);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dose_display_joins_value_and_unit() {
        assert_eq!(dose_display(Some("81".into()), Some("mg")), "81 mg");
        assert_eq!(dose_display(Some("1-2".into()), Some("TAB")), "1-2 TAB");
    }

    #[test]
    fn dose_display_without_unit_is_bare_value() {
        assert_eq!(dose_display(Some("5".into()), None), "5");
        assert_eq!(dose_display(Some("5".into()), Some("  ")), "5");
    }

    #[test]
    fn missing_dose_uses_sentinel() {
        assert_eq!(dose_display(None, Some("mg")), UNKNOWN_DOSE);
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(format_number(7.4), "7.4");
        assert_eq!(format_number(88.0), "88");
        assert_eq!(value_as_text(ValueRef::Real(250.0)).as_deref(), Some("250"));
        assert_eq!(value_as_text(ValueRef::Integer(12)).as_deref(), Some("12"));
        assert_eq!(value_as_text(ValueRef::Null), None);
    }

    #[test]
    fn bound_query_numbers_params_in_order() {
        let start = NaiveDateTime::parse_from_str("2180-07-23 00:00:00", SQL_TIMESTAMP_FORMAT).unwrap();
        let end = NaiveDateTime::parse_from_str("2180-07-24 00:00:00", SQL_TIMESTAMP_FORMAT).unwrap();
        let query = BoundQuery::new()
            .eq("subject_id", 1i64)
            .is("route", None)
            .within("charttime", &start, &end);

        assert_eq!(
            query.sql_where(),
            " WHERE subject_id = ?1 AND route IS ?2 AND datetime(charttime) >= ?3 AND datetime(charttime) <= ?4"
        );
        assert_eq!(query.param_refs().len(), 4);
    }

    #[test]
    fn empty_bound_query_has_no_where() {
        assert_eq!(BoundQuery::new().sql_where(), "");
    }

    #[test]
    fn only_stored_numbers_are_numeric() {
        assert_eq!(numeric_value(ValueRef::Real(7.4)), Some(7.4));
        assert_eq!(numeric_value(ValueRef::Integer(88)), Some(88.0));
        assert_eq!(numeric_value(ValueRef::Text(b"")), None);
        assert_eq!(numeric_value(ValueRef::Text(b"7.4")), None);
        assert_eq!(numeric_value(ValueRef::Null), None);
    }

    #[test]
    fn timestamp_expr_wraps_column_or_is_null() {
        assert_eq!(timestamp_expr(Some("endtime")), "datetime(endtime)");
        assert_eq!(timestamp_expr(None), "NULL");
    }

    #[test]
    fn colliding_pairs_are_merged_in_start_order() {
        let conn = crate::db::open_memory_database().unwrap();
        let rows = [
            ("Heparin", Some("IV"), "2180-07-25 08:00:00", "5000"),
            ("Heparin", None, "2180-07-23 08:00:00", "1000"),
            ("Heparin", Some("IV"), "2180-07-24 08:00:00", "2500"),
            ("Insulin", Some("SC"), "2180-07-23 09:00:00", "4"),
        ];
        for (drug, route, start, dose) in rows {
            conn.execute(
                "INSERT INTO prescriptions (subject_id, hadm_id, drug, route, starttime, dose_val_rx, dose_unit_rx)
                 VALUES (123, 456, ?1, ?2, ?3, ?4, 'UNIT')",
                rusqlite::params![drug, route, start, dose],
            )
            .unwrap();
        }

        let ts = |s: &str| NaiveDateTime::parse_from_str(s, SQL_TIMESTAMP_FORMAT).unwrap();
        let request = EventRequest {
            subject_id: 123,
            hadm_id: 456,
            item_id: 1,
            source_relation: SourceRelation::Prescription,
            start_time: ts("2180-07-20 00:00:00"),
            end_time: ts("2180-07-30 00:00:00"),
        };
        let pair = |route: Option<&str>| PrescriptionPair {
            drug: "Heparin".into(),
            route: route.map(String::from),
            count: 0,
        };

        let samples = fetch_pair_events(&conn, &request, vec![pair(Some("IV")), pair(None)]).unwrap();

        let values: Vec<_> = samples.iter().map(|s| s.value.as_deref().unwrap()).collect();
        assert_eq!(values, ["1000 UNIT", "2500 UNIT", "5000 UNIT"]);
        assert_eq!(samples[0].time_anchor, ts("2180-07-23 08:00:00"));
        assert!(samples.iter().all(|s| s.end_time.is_none()));
    }
}
