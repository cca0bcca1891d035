use std::collections::HashMap;

use rusqlite::{params, Connection};

use crate::db::{store_access, DatabaseError};
use super::surrogate::{surrogate_item_id, UNSPECIFIED_ROUTE};
use super::types::*;

/// Builds the unified item catalog for one admission.
///
/// Three streams are concatenated: the six ICU event tables joined with
/// `d_items`, lab results joined with `d_labitems`, and prescriptions keyed
/// by surrogate ids. The result is unsorted. A failure on any relation fails
/// the whole call.
pub fn unify_catalog(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<ItemDescriptor>, DatabaseError> {
    let mut items: Vec<ItemDescriptor> = Vec::new();

    for relation in SourceRelation::EVENT_RELATIONS {
        items.extend(fetch_event_items(conn, relation, subject_id, hadm_id)?);
    }
    items.extend(fetch_lab_items(conn, subject_id, hadm_id)?);
    items.extend(fetch_prescription_items(conn, subject_id, hadm_id)?);

    tracing::debug!(subject_id, hadm_id, items = items.len(), "Catalog unified");
    Ok(items)
}

fn count_from_sql(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

pub(super) fn fetch_event_items(
    conn: &Connection,
    relation: SourceRelation,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<ItemDescriptor>, DatabaseError> {
    // Table name comes from the closed SourceRelation set, never from input.
    let sql = format!(
        "SELECT e.itemid AS itemid, COUNT(*) AS observation_count,
                d.label AS label, d.category AS category, d.abbreviation AS abbreviation
         FROM {} e
         JOIN d_items d ON d.itemid = e.itemid
         WHERE e.subject_id = ?1 AND e.hadm_id = ?2
         GROUP BY e.itemid, d.label, d.category, d.abbreviation",
        relation.as_str()
    );

    let relation_name = relation.as_str();
    let mut stmt = conn.prepare(&sql).map_err(store_access(relation_name))?;
    let rows = stmt
        .query_map(params![subject_id, hadm_id], |row| {
            Ok(ItemDescriptor {
                item_id: row.get("itemid")?,
                source_relation: relation,
                label: row.get("label")?,
                category: row.get("category")?,
                abbreviation: row.get("abbreviation")?,
                observation_count: count_from_sql(row.get("observation_count")?),
            })
        })
        .map_err(store_access(relation_name))?;

    let items = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(store_access(relation_name))?;
    tracing::debug!(relation = relation_name, items = items.len(), "Relation aggregated");
    Ok(items)
}

pub(super) fn fetch_lab_items(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<ItemDescriptor>, DatabaseError> {
    let relation = SourceRelation::Lab;
    let mut stmt = conn
        .prepare(
            "SELECT l.itemid AS itemid, COUNT(*) AS observation_count,
                    d.label AS label, d.category AS category, d.fluid AS fluid
             FROM labevents l
             JOIN d_labitems d ON d.itemid = l.itemid
             WHERE l.subject_id = ?1 AND l.hadm_id = ?2
             GROUP BY l.itemid, d.label, d.category, d.fluid",
        )
        .map_err(store_access(relation.as_str()))?;

    let rows = stmt
        .query_map(params![subject_id, hadm_id], |row| {
            Ok(ItemDescriptor {
                item_id: row.get("itemid")?,
                source_relation: relation,
                label: row.get("label")?,
                category: row.get("category")?,
                abbreviation: row.get("fluid")?,
                observation_count: count_from_sql(row.get("observation_count")?),
            })
        })
        .map_err(store_access(relation.as_str()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(store_access(relation.as_str()))
}

/// A distinct (drug, route) pair recorded for an admission.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PrescriptionPair {
    pub drug: String,
    pub route: Option<String>,
    pub count: u64,
}

impl PrescriptionPair {
    pub fn item_id(&self) -> i64 {
        surrogate_item_id(&self.drug, self.route.as_deref())
    }
}

/// Distinct normalized (drug, route) pairs with their row counts.
///
/// Grouping uses the same space-trimming as the surrogate hash, so two pairs
/// differing only in padding collapse into one key.
pub(crate) fn prescription_pairs(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<PrescriptionPair>, DatabaseError> {
    let relation = SourceRelation::Prescription.as_str();
    let mut stmt = conn
        .prepare(
            "SELECT TRIM(drug) AS drug, TRIM(route) AS route, COUNT(*) AS observation_count
             FROM prescriptions
             WHERE subject_id = ?1 AND hadm_id = ?2
             GROUP BY TRIM(drug), TRIM(route)",
        )
        .map_err(store_access(relation))?;

    let rows = stmt
        .query_map(params![subject_id, hadm_id], |row| {
            Ok(PrescriptionPair {
                drug: row.get("drug")?,
                route: row.get("route")?,
                count: count_from_sql(row.get("observation_count")?),
            })
        })
        .map_err(store_access(relation))?;

    rows.collect::<Result<Vec<_>, _>>().map_err(store_access(relation))
}

pub(super) fn fetch_prescription_items(
    conn: &Connection,
    subject_id: i64,
    hadm_id: i64,
) -> Result<Vec<ItemDescriptor>, DatabaseError> {
    let pairs = prescription_pairs(conn, subject_id, hadm_id)?;

    let mut items: Vec<ItemDescriptor> = Vec::with_capacity(pairs.len());
    let mut by_id: HashMap<i64, usize> = HashMap::new();

    for pair in pairs {
        let item_id = pair.item_id();
        if let Some(&existing) = by_id.get(&item_id) {
            // Surrogate collision between distinct pairs: keep one catalog
            // entry per key and fold the counts into it.
            tracing::warn!(
                item_id,
                drug = %pair.drug,
                kept = ?items[existing].label,
                "Prescription surrogate collision"
            );
            items[existing].observation_count += pair.count;
            continue;
        }

        by_id.insert(item_id, items.len());
        items.push(ItemDescriptor {
            item_id,
            source_relation: SourceRelation::Prescription,
            label: Some(pair.drug),
            category: Some(
                pair.route
                    .unwrap_or_else(|| UNSPECIFIED_ROUTE.to_string()),
            ),
            abbreviation: Some(String::new()),
            observation_count: pair.count,
        });
    }

    Ok(items)
}
